//! Build and runtime requirements.
//!
//! Modules declare which packages they need, per language, at which
//! minimum (or pinned) version. The [`RequirementStore`] reconciles those
//! declarations and checks them against an [`Environment`](crate::environment::Environment).
//!
//! # Modules
//!
//! - [`store`] - The requirement store and effective version rules
//! - [`checker`] - Checker callbacks and their lookup registry
//! - [`program`] - Version probing of installed programs
//! - [`builtin`] - Checkers for the languages supported out of the box
//! - [`declare`] - Sources of declarations used when reloading
//! - [`manifest`] - Flat `REQUIRE` manifest files
//! - [`report`] - Text and JSON views of a store

pub mod builtin;
pub mod checker;
pub mod declare;
pub mod manifest;
pub mod program;
pub mod report;
pub mod store;

pub use builtin::register_builtin_checkers;
pub use checker::{checker, CheckFn, Checker, CheckerRegistry, DEFAULT_CHECKER};
pub use declare::{Declare, ModuleFn};
pub use manifest::{Manifest, ManifestEntry, MANIFEST_ORIGIN};
pub use program::{extract_version, probe_program_version, program_version};
pub use report::{render_report, summarize, PackageSummary};
pub use store::{
    normalize_language, Declaration, Origins, RequiredVersion, Requirement, RequirementStore,
};
