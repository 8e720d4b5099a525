//! Check command implementation.
//!
//! The `buildreq check` command validates every requirement against the
//! programs installed on this machine.

use crate::environment::{Environment, HostEnvironment};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::ProjectContext;

/// The check command implementation.
pub struct CheckCommand {
    context: ProjectContext,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(context: ProjectContext) -> Self {
        Self { context }
    }

    /// Check against a given environment.
    pub fn run(&self, ui: &mut dyn UserInterface, env: &mut dyn Environment) -> Result<CommandResult> {
        let Some(mut store) = self.context.load_store(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        if store.is_empty() {
            ui.message("No requirements declared.");
            return Ok(CommandResult::success());
        }

        if let Err(e) = store.check(env) {
            ui.error(&e.to_string());
            return Ok(CommandResult::failure(1));
        }

        for (name, values) in env.vars().iter() {
            ui.detail(&format!("{} = {}", name, values.join(" ")));
        }
        ui.success("All requirements satisfied");
        Ok(CommandResult::success())
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut env = HostEnvironment::new();
        self.run(ui, &mut env)
    }
}
