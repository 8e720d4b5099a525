//! The configuration environment handed to requirement checkers.
//!
//! Checkers never talk to the host directly: they go through an
//! [`Environment`], which can find programs, run them, and record
//! discovered values (compiler versions, program paths, flags) for the
//! build steps that follow.
//!
//! # Modules
//!
//! - [`host`] - [`HostEnvironment`], backed by `PATH` and real processes

pub mod host;

pub use host::{is_executable, parse_system_path, resolve_tool_path, HostEnvironment};

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Platform the configuration runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Whether this is Windows.
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Name of the variable a program's resolved path is recorded under.
///
/// Upper-cased, with anything that is not alphanumeric replaced by `_`:
/// `g++` becomes `G__`, `node` becomes `NODE`.
pub fn program_var(program: &str) -> String {
    program
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Variables recorded during configuration.
///
/// Each key maps to a list of values, mirroring how build engines store
/// tool paths and flag lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    values: BTreeMap<String, Vec<String>>,
}

impl EnvVars {
    /// Create an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable's values.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(|v| v.as_slice())
    }

    /// First value of a variable.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(|s| s.as_str())
    }

    /// Whether a variable is set.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Replace a variable's values.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        self.values.insert(key.to_string(), values);
    }

    /// Append values not already present.
    pub fn append_unique(&mut self, key: &str, values: &[String]) {
        let entry = self.values.entry(key.to_string()).or_default();
        for value in values {
            if !entry.contains(value) {
                entry.push(value.clone());
            }
        }
    }

    /// Iterate over all variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Everything a checker may do to the configuration host.
pub trait Environment {
    /// The platform being configured.
    fn platform(&self) -> Platform;

    /// Load build support for a language before its packages are checked.
    fn load_language(&mut self, language: &str) -> Result<()>;

    /// Locate a program, failing with `ToolNotFound` when absent.
    fn find_program(&mut self, program: &str) -> Result<PathBuf>;

    /// Run a command and return its captured output.
    fn run(&mut self, argv: &[String]) -> Result<String>;

    /// Recorded variables.
    fn vars(&self) -> &EnvVars;

    /// Mutable access to recorded variables.
    fn vars_mut(&mut self) -> &mut EnvVars;
}
