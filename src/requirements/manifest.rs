//! Flat `REQUIRE` manifest files.
//!
//! ```text
//! # comments and blank lines are ignored
//! [python]
//! python      3.6
//! numpy       1.18
//! pybind11    =2.2.1   build
//!
//! [cpp]
//! boost_system 1.60    build
//! ```
//!
//! Each `[language]` header opens a section; every following line is
//! `<package> <version> [runtime|build]`. Entries default to runtime.

use crate::error::{BuildreqError, Result};
use crate::requirements::declare::Declare;
use crate::requirements::store::{normalize_language, RequirementStore};
use std::fs;
use std::path::Path;

/// Origin recorded for manifest entries unless told otherwise.
pub const MANIFEST_ORIGIN: &str = "manifest";

/// One `<package> <version>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub language: String,
    pub package: String,
    pub version: String,
    pub runtime: bool,
    /// 1-based line number in the source text.
    pub line: usize,
}

/// A parsed manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    origin: String,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut language: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| parse_error(
                    line_number,
                    format!("unterminated section header '{}'", line),
                ))?;
                let name = normalize_language(name);
                if name.is_empty() {
                    return Err(parse_error(line_number, "empty section name".to_string()));
                }
                language = Some(name);
                continue;
            }

            let Some(language) = &language else {
                return Err(parse_error(
                    line_number,
                    "entry outside of a [language] section".to_string(),
                ));
            };

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let (package, version, runtime) = match tokens.as_slice() {
                [package, version] => (*package, *version, true),
                [package, version, "runtime"] => (*package, *version, true),
                [package, version, "build"] => (*package, *version, false),
                [_, _, flag] => {
                    return Err(parse_error(
                        line_number,
                        format!("unknown flag '{}', expected 'runtime' or 'build'", flag),
                    ));
                }
                _ => {
                    return Err(parse_error(
                        line_number,
                        format!("expected '<package> <version> [runtime|build]', got '{}'", line),
                    ));
                }
            };

            entries.push(ManifestEntry {
                language: language.clone(),
                package: package.to_lowercase(),
                version: version.to_string(),
                runtime,
                line: line_number,
            });
        }

        Ok(Self {
            origin: origin.to_string(),
            entries,
        })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path, origin: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, origin)
    }

    /// Parsed entries in file order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }
}

fn parse_error(line: usize, message: String) -> BuildreqError {
    BuildreqError::ManifestParseError { line, message }
}

impl Declare for Manifest {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn declare(&self, store: &mut RequirementStore) -> Result<()> {
        for entry in &self.entries {
            store.require(
                &entry.language,
                Some(&entry.package),
                Some(&entry.version),
                entry.runtime,
                &self.origin,
            )?;
        }
        Ok(())
    }
}
