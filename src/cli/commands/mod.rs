//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that need requirements
//! load them through a shared [`ProjectContext`].

pub mod check;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod project;
pub mod query;
pub mod show;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use project::ProjectContext;
