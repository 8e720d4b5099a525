//! Shell completions generation.
//!
//! The `buildreq completions` command generates shell completion scripts.

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::{BuildreqError, Result};
use crate::ui::UserInterface;
use clap::CommandFactory;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut cmd = Cli::command();
        let mut script = Vec::new();
        clap_complete::generate(self.args.shell, &mut cmd, "buildreq", &mut script);
        let script = String::from_utf8(script).map_err(|e| BuildreqError::Other(e.into()))?;
        ui.data(&script);
        Ok(CommandResult::success())
    }
}
