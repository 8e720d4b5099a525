//! Configuration schema definitions for buildreq.
//!
//! This module contains the struct definitions that map to the
//! `buildreq.yml` file format.

use crate::requirements::store::Requirement;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure for buildreq.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildreqConfig {
    /// Global settings
    pub settings: Settings,

    /// Flat manifest to declare from, relative to the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    /// Modules and the requirements each one declares
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,

    /// Program checkers, keyed by language then package, in file order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checkers: BTreeMap<String, IndexMap<String, CheckerConfig>>,
}

/// Global settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output mode: verbose, normal, quiet
    #[serde(default)]
    pub default_output: OutputMode,

    /// Modules to load when `--modules` is not given (all when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
}

/// A module's declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Language -> package -> version
    pub requires: BTreeMap<String, BTreeMap<String, VersionSpec>>,
}

impl ModuleConfig {
    /// Flatten into requirements, sorted by language then package.
    pub fn requirements(&self) -> Vec<Requirement> {
        self.requires
            .iter()
            .flat_map(|(language, packages)| {
                packages.iter().map(move |(package, spec)| Requirement {
                    language: Some(language.clone()),
                    package: Some(package.clone()),
                    version: spec.version(),
                    runtime: spec.runtime(),
                })
            })
            .collect()
    }
}

/// A version as written in YAML.
///
/// ```yaml
/// numpy: "1.18"                         # runtime, at least 1.18
/// python: "=3.6"                        # pinned
/// pybind11: ~                           # any version
/// boost_system: { version: "1.60", runtime: false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionSpec {
    Detailed {
        #[serde(default)]
        version: Option<VersionValue>,
        #[serde(default = "default_true")]
        runtime: bool,
    },
    Plain(Option<VersionValue>),
}

impl VersionSpec {
    /// The version text, if any.
    pub fn version(&self) -> Option<String> {
        match self {
            VersionSpec::Detailed { version, .. } | VersionSpec::Plain(version) => {
                version.as_ref().map(|v| v.to_string())
            }
        }
    }

    /// Whether the package is needed at runtime.
    pub fn runtime(&self) -> bool {
        match self {
            VersionSpec::Detailed { runtime, .. } => *runtime,
            VersionSpec::Plain(_) => true,
        }
    }
}

/// Versions may be quoted or bare numbers (`3.6`).
///
/// Bare numbers lose trailing zeros (`1.10` reads as `1.1`), so quote those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionValue {
    Text(String),
    Number(serde_yaml::Number),
}

impl fmt::Display for VersionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionValue::Text(text) => write!(f, "{}", text),
            VersionValue::Number(number) => write!(f, "{}", number),
        }
    }
}

/// Checker backed by a program's `--version` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Program to run (defaults to the package name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Text identifying the output line with the version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Fail the check when the program is missing or too old
    #[serde(default = "default_true")]
    pub mandatory: bool,

    /// Treat the package key as a regex over package names
    #[serde(skip_serializing_if = "is_false")]
    pub regex: bool,
}

fn default_true() -> bool {
    true
}

fn is_false(v: &bool) -> bool {
    !v
}
