//! Configuration loading for buildreq.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Store construction in [`modules`]
//!
//! # Example
//!
//! ```
//! use buildreq::config::{load_merged_config, load_store};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("buildreq.yml"),
//!     "modules:\n  core:\n    requires:\n      python:\n        numpy: \"1.18\"\n",
//! )
//! .unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! let store = load_store(&config, temp.path(), None).unwrap();
//! assert!(store.contains("python", "numpy"));
//! ```
//!
//! # Configuration File Locations
//!
//! 1. Project config (`buildreq.yml`)
//! 2. Local overrides (`buildreq.local.yml`)

pub mod loader;
pub mod merger;
pub mod modules;
pub mod schema;

pub use schema::{
    BuildreqConfig, CheckerConfig, ModuleConfig, OutputMode, Settings, VersionSpec, VersionValue,
};

pub use loader::{
    config_base_dir, find_project_root, load_config, load_config_file, load_config_value,
    load_merged_config, parse_config, ConfigPaths, CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{deep_merge, merge_configs};

pub use modules::{load_store, register_config_checkers, select_modules, ConfiguredModule};
