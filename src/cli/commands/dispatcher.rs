//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, ShowArgs};
use crate::error::Result;
use crate::ui::UserInterface;

use super::project::ProjectContext;
use super::query::Partition;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let context = ProjectContext::new(&self.project_root)
            .with_config(cli.config.clone())
            .with_modules(cli.module_selection().map(<[String]>::to_vec));

        match &cli.command {
            Some(Commands::Show(args)) => {
                super::show::ShowCommand::new(context, args.clone()).execute(ui)
            }
            Some(Commands::Check) => super::check::CheckCommand::new(context).execute(ui),
            Some(Commands::Version(args)) => {
                super::query::VersionCommand::new(context, args.clone()).execute(ui)
            }
            Some(Commands::Pinned(args)) => {
                super::query::PinnedCommand::new(context, args.clone()).execute(ui)
            }
            Some(Commands::Runtime(args)) => {
                super::query::PartitionCommand::new(context, Partition::Runtime, args.clone())
                    .execute(ui)
            }
            Some(Commands::BuildOnly(args)) => {
                super::query::PartitionCommand::new(context, Partition::BuildOnly, args.clone())
                    .execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(context, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::show::ShowCommand::new(context, ShowArgs::default()).execute(ui),
        }
    }
}
