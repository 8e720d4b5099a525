//! Turning a loaded configuration into a populated requirement store.

use crate::config::schema::{BuildreqConfig, CheckerConfig, ModuleConfig};
use crate::error::{BuildreqError, Result};
use crate::requirements::builtin::register_builtin_checkers;
use crate::requirements::checker::{checker, Checker};
use crate::requirements::declare::Declare;
use crate::requirements::manifest::{Manifest, MANIFEST_ORIGIN};
use crate::requirements::program::program_version;
use crate::requirements::store::RequirementStore;
use std::path::Path;

/// A module from `buildreq.yml`, declaring under its own name.
#[derive(Debug, Clone)]
pub struct ConfiguredModule {
    name: String,
    config: ModuleConfig,
}

impl ConfiguredModule {
    pub fn new(name: impl Into<String>, config: ModuleConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

impl Declare for ConfiguredModule {
    fn origin(&self) -> &str {
        &self.name
    }

    fn declare(&self, store: &mut RequirementStore) -> Result<()> {
        for requirement in self.config.requirements() {
            store.declare(&requirement, &self.name)?;
        }
        Ok(())
    }
}

/// Pick the modules to load.
///
/// An explicit selection wins, then `settings.modules`, then every module.
/// Naming a module the config doesn't define is a usage error.
pub fn select_modules(
    config: &BuildreqConfig,
    selection: Option<&[String]>,
) -> Result<Vec<ConfiguredModule>> {
    let selection = selection.or_else(|| {
        if config.settings.modules.is_empty() {
            None
        } else {
            Some(config.settings.modules.as_slice())
        }
    });

    match selection {
        None => Ok(config
            .modules
            .iter()
            .map(|(name, module)| ConfiguredModule::new(name.clone(), module.clone()))
            .collect()),
        Some(names) => names
            .iter()
            .map(|name| {
                config
                    .modules
                    .get(name)
                    .map(|module| ConfiguredModule::new(name.clone(), module.clone()))
                    .ok_or_else(|| BuildreqError::Usage {
                        message: format!("unknown module '{}'", name),
                    })
            })
            .collect(),
    }
}

/// Register the program checkers configured under `checkers:`.
pub fn register_config_checkers(store: &mut RequirementStore, config: &BuildreqConfig) -> Result<()> {
    for (language, packages) in &config.checkers {
        for (package, settings) in packages {
            let check = program_checker(settings);
            if settings.regex {
                store.register_pattern_checker(language, package, check)?;
            } else {
                store.register_checker(language, &[package.as_str()], check);
            }
        }
    }
    Ok(())
}

/// Without an explicit `program`, the checked package name is run.
fn program_checker(settings: &CheckerConfig) -> Checker {
    let program = settings.program.clone();
    let marker = settings.pattern.clone();
    let mandatory = settings.mandatory;

    checker(move |env, package, required| {
        let program = program.as_deref().unwrap_or(package);
        program_version(env, program, required, marker.as_deref(), mandatory).map(|_| ())
    })
}

/// Build a store from a configuration.
///
/// Registers the built-in and configured checkers, then declares the
/// manifest (if any) and the selected modules.
pub fn load_store(
    config: &BuildreqConfig,
    base_dir: &Path,
    selection: Option<&[String]>,
) -> Result<RequirementStore> {
    let mut store = RequirementStore::new();
    register_builtin_checkers(&mut store);
    register_config_checkers(&mut store, config)?;

    let manifest = match &config.manifest {
        Some(path) => Some(Manifest::load(&base_dir.join(path), MANIFEST_ORIGIN)?),
        None => None,
    };
    let modules = select_modules(config, selection)?;

    let mut sources: Vec<&dyn Declare> = Vec::new();
    if let Some(manifest) = &manifest {
        sources.push(manifest);
    }
    sources.extend(modules.iter().map(|m| m as &dyn Declare));

    tracing::debug!("Declaring requirements from {} sources", sources.len());
    store.reload(&sources)?;
    Ok(store)
}
