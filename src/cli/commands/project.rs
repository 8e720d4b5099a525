//! Loading the project's configuration and store for a command.

use std::path::{Path, PathBuf};

use crate::config::{config_base_dir, load_config, load_store, BuildreqConfig};
use crate::error::{BuildreqError, Result};
use crate::requirements::RequirementStore;
use crate::ui::{OutputMode, UserInterface};

/// Where a command finds its configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    modules: Option<Vec<String>>,
}

impl ProjectContext {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: None,
            modules: None,
        }
    }

    /// Use this config file instead of discovering one.
    pub fn with_config(mut self, config: Option<PathBuf>) -> Self {
        self.config_override = config;
        self
    }

    /// Declare only these modules.
    pub fn with_modules(mut self, modules: Option<Vec<String>>) -> Self {
        self.modules = modules;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load the configuration.
    ///
    /// Returns `None` after reporting when there is none. The config's
    /// `default_output` applies when no CLI flag changed the output mode.
    pub fn load_config(&self, ui: &mut dyn UserInterface) -> Result<Option<BuildreqConfig>> {
        let config = match load_config(&self.project_root, self.config_override.as_deref()) {
            Ok(config) => config,
            Err(BuildreqError::ConfigNotFound { path }) => {
                ui.error(&format!("No configuration found at {}", path.display()));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if ui.output_mode() == OutputMode::Normal {
            ui.set_output_mode(config.settings.default_output.into());
        }
        Ok(Some(config))
    }

    /// Load the configuration and declare its requirements.
    pub fn load_store(&self, ui: &mut dyn UserInterface) -> Result<Option<RequirementStore>> {
        let Some(config) = self.load_config(ui)? else {
            return Ok(None);
        };
        let base_dir = config_base_dir(&self.project_root, self.config_override.as_deref());
        let store = load_store(&config, &base_dir, self.modules.as_deref())?;
        tracing::debug!("Loaded requirements for {:?}", store.languages());
        Ok(Some(store))
    }
}
