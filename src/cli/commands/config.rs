//! Config command implementation.
//!
//! The `buildreq config` command shows the resolved configuration.

use crate::cli::args::ConfigArgs;
use crate::config::ConfigPaths;
use crate::error::{BuildreqError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::ProjectContext;

/// The config command implementation.
pub struct ConfigCommand {
    context: ProjectContext,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(context: ProjectContext, args: ConfigArgs) -> Self {
        Self { context, args }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.context.load_config(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        for path in ConfigPaths::discover(self.context.project_root()).all_existing() {
            ui.message(&format!("# {}", path.display()));
        }

        let text = if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| BuildreqError::Other(e.into()))?;
            format!("{}\n", json)
        } else {
            serde_yaml::to_string(&config).map_err(|e| BuildreqError::Other(e.into()))?
        };
        ui.data(&text);

        Ok(CommandResult::success())
    }
}
