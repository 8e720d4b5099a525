//! buildreq - Build requirement reconciliation and checking.
//!
//! Build modules declare the packages they need per language, each with a
//! minimum or pinned version and a runtime-or-build-only flag. buildreq
//! merges those declarations across modules, answers queries about them,
//! and checks them against the tools installed on the host.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `buildreq.yml` loading and store construction
//! - [`environment`] - Host environment probing
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - The requirement store, checkers and reports
//! - [`ui`] - Terminal output
//! - [`version`] - Permissive version ordering
//!
//! # Example
//!
//! ```
//! use buildreq::{LooseVersion, RequirementStore};
//!
//! let mut store = RequirementStore::new();
//! store.require("python", Some("numpy"), Some("1.18"), true, "core").unwrap();
//! store.require("python", Some("numpy"), Some("1.16"), true, "viewer").unwrap();
//! store.require("python", None, Some("=3.6"), true, "core").unwrap();
//!
//! let numpy = store.version("python", "numpy").unwrap();
//! assert_eq!(numpy.version, Some(LooseVersion::parse("1.18")));
//! assert_eq!(store.pinned("python"), vec!["python"]);
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod requirements;
pub mod ui;
pub mod version;

pub use environment::{Environment, HostEnvironment};
pub use error::{BuildreqError, Result};
pub use requirements::{
    checker, Checker, Declare, Manifest, ModuleFn, RequiredVersion, Requirement, RequirementStore,
};
pub use version::LooseVersion;
