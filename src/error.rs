//! Error types for buildreq operations.
//!
//! This module defines [`BuildreqError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BuildreqError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `BuildreqError::Other`) for unexpected errors
//! - Every failure during a check pass is fatal for that configuration run

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for buildreq operations.
#[derive(Debug, Error)]
pub enum BuildreqError {
    /// A requirement was declared with an ambiguous or malformed call shape.
    #[error("Invalid requirement declaration: {message}")]
    Usage { message: String },

    /// The environment provides a version below (or different from) the required one.
    #[error("Requirement '{package}' not satisfied: found {found}, expected {required}")]
    Unsatisfied {
        package: String,
        found: String,
        required: String,
    },

    /// Two origins pinned different exact versions of the same package.
    #[error(
        "Conflicting pinned versions for {language}/{package}: \
         '{first_origin}' pins {first_version}, '{second_origin}' pins {second_version}"
    )]
    PinConflict {
        language: String,
        package: String,
        first_origin: String,
        first_version: String,
        second_origin: String,
        second_version: String,
    },

    /// A checker or membership pattern is not a valid regular expression.
    #[error("Invalid package pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A program needed to check a requirement could not be found.
    #[error("Program '{program}' not found")]
    ToolNotFound { program: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Failed to parse a flat requirements manifest.
    #[error("Failed to parse requirements manifest at line {line}: {message}")]
    ManifestParseError { line: usize, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for buildreq operations.
pub type Result<T> = std::result::Result<T, BuildreqError>;
