//! Query commands: `version`, `pinned`, `runtime` and `build-only`.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::cli::args::{PartitionArgs, PinnedArgs, VersionArgs};
use crate::error::{BuildreqError, Result};
use crate::requirements::{RequiredVersion, RequirementStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::ProjectContext;

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| BuildreqError::Other(e.into()))?;
    Ok(format!("{}\n", json))
}

fn version_lines(versions: &BTreeMap<String, RequiredVersion>) -> String {
    let mut out = String::new();
    for (name, required) in versions {
        writeln!(out, "{:<20}{}", name, required).ok();
    }
    out
}

/// The version command implementation.
pub struct VersionCommand {
    context: ProjectContext,
    args: VersionArgs,
}

impl VersionCommand {
    /// Create a new version command.
    pub fn new(context: ProjectContext, args: VersionArgs) -> Self {
        Self { context, args }
    }

    fn render(&self, store: &RequirementStore) -> Result<Option<String>> {
        let language = &self.args.language;

        let Some(package) = &self.args.package else {
            if self.args.all_origins {
                let Some(packages) = store.packages(language) else {
                    return Ok(None);
                };
                if self.args.json {
                    return to_json(packages).map(Some);
                }
                let mut out = String::new();
                for (name, origins) in packages {
                    for (origin, declaration) in origins {
                        writeln!(out, "{:<20}{}", name, origin_line(origin, declaration)).ok();
                    }
                }
                return Ok(Some(out));
            }

            return match store.versions(language) {
                Some(versions) if self.args.json => to_json(&versions).map(Some),
                Some(versions) => Ok(Some(version_lines(&versions))),
                None => Ok(None),
            };
        };

        if self.args.all_origins {
            let Some(origins) = store.origins(language, package) else {
                return Ok(None);
            };
            if self.args.json {
                return to_json(origins).map(Some);
            }
            let mut out = String::new();
            for (origin, declaration) in origins {
                writeln!(out, "{}", origin_line(origin, declaration)).ok();
            }
            return Ok(Some(out));
        }

        match store.version(language, package) {
            Some(required) if self.args.json => to_json(&required).map(Some),
            Some(required) => Ok(Some(format!("{}\n", required))),
            None => Ok(None),
        }
    }
}

fn origin_line(origin: &str, declaration: &crate::requirements::Declaration) -> String {
    let required = RequiredVersion {
        version: declaration.version.clone(),
        pinned: declaration.pinned,
    };
    let tag = if declaration.runtime { "runtime" } else { "build" };
    format!("{:<20}{:<20}{}", origin, required.to_string(), tag)
}

impl Command for VersionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(store) = self.context.load_store(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        match self.render(&store)? {
            Some(text) => {
                ui.data(&text);
                Ok(CommandResult::success())
            }
            None => {
                let target = match &self.args.package {
                    Some(package) => format!("{}/{}", self.args.language, package),
                    None => self.args.language.clone(),
                };
                ui.error(&format!("No requirements declared for {}", target));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

/// The pinned command implementation.
pub struct PinnedCommand {
    context: ProjectContext,
    args: PinnedArgs,
}

impl PinnedCommand {
    /// Create a new pinned command.
    pub fn new(context: ProjectContext, args: PinnedArgs) -> Self {
        Self { context, args }
    }
}

impl Command for PinnedCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(store) = self.context.load_store(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        let pinned = match &self.args.language {
            Some(language) => store.pinned(language),
            None => store.pinned_all(),
        };
        for name in pinned {
            ui.data(&format!("{}\n", name));
        }
        Ok(CommandResult::success())
    }
}

/// Which side of the runtime/build split to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Runtime,
    BuildOnly,
}

/// The runtime and build-only command implementation.
pub struct PartitionCommand {
    context: ProjectContext,
    partition: Partition,
    args: PartitionArgs,
}

impl PartitionCommand {
    /// Create a new partition command.
    pub fn new(context: ProjectContext, partition: Partition, args: PartitionArgs) -> Self {
        Self {
            context,
            partition,
            args,
        }
    }

    fn render(&self, store: &RequirementStore) -> Result<String> {
        let Some(language) = &self.args.language else {
            let all = match self.partition {
                Partition::Runtime => store.runtime_all(),
                Partition::BuildOnly => store.build_only_all(),
            };
            if self.args.json {
                return to_json(&all);
            }
            let mut out = String::new();
            for (language, versions) in &all {
                for (name, required) in versions {
                    writeln!(out, "{:<20}{:<20}{}", language, name, required).ok();
                }
            }
            return Ok(out);
        };

        let versions = match self.partition {
            Partition::Runtime => store.runtime(language),
            Partition::BuildOnly => store.build_only(language),
        };
        if self.args.json {
            to_json(&versions)
        } else {
            Ok(version_lines(&versions))
        }
    }
}

impl Command for PartitionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(store) = self.context.load_store(ui)? else {
            return Ok(CommandResult::failure(2));
        };

        ui.data(&self.render(&store)?);
        Ok(CommandResult::success())
    }
}
