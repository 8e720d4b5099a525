//! Show command implementation.
//!
//! The `buildreq show` command prints every declared requirement.

use crate::cli::args::ShowArgs;
use crate::error::{BuildreqError, Result};
use crate::requirements::{render_report, summarize};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::ProjectContext;

/// The show command implementation.
pub struct ShowCommand {
    context: ProjectContext,
    args: ShowArgs,
}

impl ShowCommand {
    /// Create a new show command.
    pub fn new(context: ProjectContext, args: ShowArgs) -> Self {
        Self { context, args }
    }
}

impl Command for ShowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(store) = self.context.load_store(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&summarize(&store))
                .map_err(|e| BuildreqError::Other(e.into()))?;
            ui.data(&format!("{}\n", json));
            return Ok(CommandResult::success());
        }

        if store.is_empty() {
            ui.message("No requirements declared.");
        } else {
            ui.data(&render_report(&store));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn project(yaml: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("buildreq.yml"), yaml).unwrap();
        temp
    }

    #[test]
    fn prints_text_report() {
        let temp = project(
            "modules:\n  core:\n    requires:\n      cpp:\n        boost_system: { version: \"1.60\", runtime: false }\n",
        );
        let mut ui = MockUI::new();
        let cmd = ShowCommand::new(ProjectContext::new(temp.path()), ShowArgs::default());

        assert!(cmd.execute(&mut ui).unwrap().success);
        assert_eq!(
            ui.data_output(),
            "=============== cpp\n -boost_system        1.60                build\n\n"
        );
    }

    #[test]
    fn prints_json_summary() {
        let temp = project("modules:\n  core:\n    requires:\n      python:\n        python: \"=3.6\"\n");
        let mut ui = MockUI::new();
        let cmd = ShowCommand::new(ProjectContext::new(temp.path()), ShowArgs { json: true });
        cmd.execute(&mut ui).unwrap();

        let json: serde_json::Value = serde_json::from_str(ui.data_output()).unwrap();
        assert_eq!(json["python"]["python"]["version"], "3.6");
        assert_eq!(json["python"]["python"]["pinned"], true);
        assert_eq!(json["python"]["python"]["origins"]["core"]["pinned"], true);
    }

    #[test]
    fn empty_store_prints_message() {
        let temp = project("modules: {}\n");
        let mut ui = MockUI::new();
        let cmd = ShowCommand::new(ProjectContext::new(temp.path()), ShowArgs::default());
        cmd.execute(&mut ui).unwrap();

        assert!(ui.data_output().is_empty());
        assert!(ui.has_output("No requirements"));
    }
}
