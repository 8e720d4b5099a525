//! Requirement storage, merging, and the check pass.
//!
//! The store keeps one [`Declaration`] per `(language, package, origin)`.
//! Several build modules can require the same package independently; their
//! declarations are merged into a single [`RequiredVersion`] on query.

use crate::environment::Environment;
use crate::error::{BuildreqError, Result};
use crate::requirements::checker::{compile_name_pattern, Checker, CheckerRegistry};
use crate::requirements::declare::Declare;
use crate::version::LooseVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declarations for one package, keyed by origin.
pub type Origins = BTreeMap<String, Declaration>;

/// Canonical form of a language name.
///
/// Lowercased, with the `cxx` alias rewritten to `cpp`.
pub fn normalize_language(language: &str) -> String {
    language.trim().to_lowercase().replace("cxx", "cpp")
}

/// What a single origin declared for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Minimum (or exact, when pinned) version; `None` when unset.
    pub version: Option<LooseVersion>,
    /// Needed when the built artifact runs, not just while building.
    pub runtime: bool,
    /// Exact version required.
    pub pinned: bool,
}

/// The merged requirement for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredVersion {
    /// Effective version; `None` when no origin cares.
    pub version: Option<LooseVersion>,
    /// Whether the version must match exactly.
    pub pinned: bool,
}

impl RequiredVersion {
    /// A minimum-version requirement.
    pub fn minimum(version: Option<LooseVersion>) -> Self {
        Self {
            version,
            pinned: false,
        }
    }

    /// An exact-version requirement.
    pub fn exact(version: LooseVersion) -> Self {
        Self {
            version: Some(version),
            pinned: true,
        }
    }

    /// Whether `found` meets this requirement.
    pub fn is_satisfied_by(&self, found: &LooseVersion) -> bool {
        match &self.version {
            None => true,
            Some(required) if self.pinned => found == required,
            Some(required) => found >= required,
        }
    }
}

impl fmt::Display for RequiredVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.version, self.pinned) {
            (None, _) => f.write_str("*"),
            (Some(v), true) => write!(f, "={}", v),
            (Some(v), false) => write!(f, "{}", v),
        }
    }
}

/// A requirement as written in configuration.
///
/// `language` is optional only so malformed input can be reported as a
/// usage error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_runtime")]
    pub runtime: bool,
}

fn default_runtime() -> bool {
    true
}

impl Default for Requirement {
    fn default() -> Self {
        Self {
            language: None,
            package: None,
            version: None,
            runtime: true,
        }
    }
}

/// Merge all origins into the effective requirement.
///
/// A pin is authoritative; otherwise the highest declared version wins.
fn effective(origins: &Origins) -> RequiredVersion {
    if let Some(pinned) = origins.values().find(|d| d.pinned) {
        return RequiredVersion {
            version: pinned.version.clone(),
            pinned: true,
        };
    }
    RequiredVersion::minimum(origins.values().filter_map(|d| d.version.clone()).max())
}

fn is_runtime(origins: &Origins) -> bool {
    origins.values().any(|d| d.runtime)
}

fn is_pinned(origins: &Origins) -> bool {
    origins.values().any(|d| d.pinned)
}

fn name_matches(pattern: &str, name: &str) -> bool {
    match compile_name_pattern(pattern) {
        Ok(regex) => regex.is_match(name),
        Err(_) => {
            tracing::debug!("Ignoring invalid name pattern '{}'", pattern);
            false
        }
    }
}

/// Per-language, per-package requirement declarations.
///
/// One store lives for one configuration run and is passed by reference to
/// every configuration function.
///
/// # Example
///
/// ```
/// use buildreq::{LooseVersion, RequirementStore};
///
/// let mut store = RequirementStore::new();
/// store.require("python", Some("numpy"), Some("1.18"), true, "core").unwrap();
/// store.require("python", Some("numpy"), Some("1.16"), true, "viewer").unwrap();
///
/// let required = store.version("python", "numpy").unwrap();
/// assert_eq!(required.version, Some(LooseVersion::parse("1.18")));
/// ```
#[derive(Debug, Default)]
pub struct RequirementStore {
    requirements: BTreeMap<String, BTreeMap<String, Origins>>,
    checkers: CheckerRegistry,
    checked: bool,
}

impl RequirementStore {
    /// Create an empty store with no checkers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a requirement.
    ///
    /// `package` defaults to the language itself (the interpreter or
    /// compiler). A version starting with `=` is pinned. Re-declaring from
    /// the same origin overwrites that origin's previous declaration.
    pub fn require(
        &mut self,
        language: &str,
        package: Option<&str>,
        version: Option<&str>,
        runtime: bool,
        origin: &str,
    ) -> Result<()> {
        let language = normalize_language(language);
        if language.is_empty() {
            return Err(BuildreqError::Usage {
                message: "language must not be empty".to_string(),
            });
        }

        let package = match package {
            None => language.clone(),
            Some(name) if name.trim().is_empty() => {
                return Err(BuildreqError::Usage {
                    message: format!("empty package name for language '{}'", language),
                });
            }
            Some(name) => name.trim().to_lowercase(),
        };

        let raw = version.map(str::trim).unwrap_or_default();
        let pinned = raw.starts_with('=');
        let cleaned = raw.replace('=', "");
        let declaration = Declaration {
            version: (!cleaned.trim().is_empty()).then(|| LooseVersion::parse(&cleaned)),
            runtime,
            pinned,
        };

        if pinned {
            self.ensure_no_pin_conflict(&language, &package, origin, &declaration)?;
        }

        tracing::debug!(
            "{} requires {}/{} {} ({})",
            origin,
            language,
            package,
            raw,
            if runtime { "runtime" } else { "build" }
        );

        self.requirements
            .entry(language)
            .or_default()
            .entry(package)
            .or_default()
            .insert(origin.to_string(), declaration);
        self.checked = false;
        Ok(())
    }

    /// Record the same requirement for several packages.
    pub fn require_many(
        &mut self,
        language: &str,
        packages: &[&str],
        version: Option<&str>,
        runtime: bool,
        origin: &str,
    ) -> Result<()> {
        for package in packages {
            self.require(language, Some(package), version, runtime, origin)?;
        }
        Ok(())
    }

    /// Record a requirement given as a configuration value.
    pub fn declare(&mut self, requirement: &Requirement, origin: &str) -> Result<()> {
        match &requirement.language {
            Some(language) => self.require(
                language,
                requirement.package.as_deref(),
                requirement.version.as_deref(),
                requirement.runtime,
                origin,
            ),
            None if requirement.package.is_some() || requirement.version.is_some() => {
                Err(BuildreqError::Usage {
                    message: "package or version given without a language".to_string(),
                })
            }
            None => Err(BuildreqError::Usage {
                message: "language must be given".to_string(),
            }),
        }
    }

    fn ensure_no_pin_conflict(
        &self,
        language: &str,
        package: &str,
        origin: &str,
        declaration: &Declaration,
    ) -> Result<()> {
        let Some(origins) = self
            .requirements
            .get(language)
            .and_then(|packages| packages.get(package))
        else {
            return Ok(());
        };

        let conflict = origins
            .iter()
            .filter(|(other, d)| other.as_str() != origin && d.pinned)
            .find(|(_, d)| d.version != declaration.version);

        match conflict {
            Some((other, existing)) => Err(BuildreqError::PinConflict {
                language: language.to_string(),
                package: package.to_string(),
                first_origin: other.clone(),
                first_version: display_version(existing.version.as_ref()),
                second_origin: origin.to_string(),
                second_version: display_version(declaration.version.as_ref()),
            }),
            None => Ok(()),
        }
    }

    /// Register a checker for literal package names (or `default`).
    pub fn register_checker(
        &mut self,
        language: &str,
        packages: &[&str],
        checker: Checker,
    ) -> Checker {
        self.checked = false;
        self.checkers.register(language, packages, checker)
    }

    /// Register a checker for package names matching a regex.
    pub fn register_pattern_checker(
        &mut self,
        language: &str,
        pattern: &str,
        checker: Checker,
    ) -> Result<Checker> {
        self.checked = false;
        self.checkers.register_pattern(language, pattern, checker)
    }

    /// The registered checkers.
    pub fn checkers(&self) -> &CheckerRegistry {
        &self.checkers
    }

    /// Validate every requirement against the environment.
    ///
    /// Does nothing when a previous call succeeded and nothing was declared
    /// since. Each language's own package (e.g. `python/python`) is checked
    /// before any other package. The first failing checker aborts the pass.
    pub fn check(&mut self, env: &mut dyn Environment) -> Result<()> {
        if self.checked {
            tracing::debug!("Requirements already checked");
            return Ok(());
        }

        for language in self.requirements.keys() {
            env.load_language(language)?;
        }

        for (language, packages) in &self.requirements {
            if let Some(origins) = packages.get(language) {
                self.dispatch(env, language, language, origins)?;
            }
        }

        for (language, packages) in &self.requirements {
            for (package, origins) in packages {
                if package != language {
                    self.dispatch(env, language, package, origins)?;
                }
            }
        }

        self.checked = true;
        Ok(())
    }

    fn dispatch(
        &self,
        env: &mut dyn Environment,
        language: &str,
        package: &str,
        origins: &Origins,
    ) -> Result<()> {
        let required = effective(origins);
        match self.checkers.lookup(language, package) {
            Some(checker) => {
                tracing::info!("Checking {}/{} {}", language, package, required);
                checker(env, package, &required)
            }
            None => {
                tracing::debug!("No checker for {}/{}", language, package);
                Ok(())
            }
        }
    }

    /// Whether the last check pass is still valid.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Effective requirement for one package.
    pub fn version(&self, language: &str, package: &str) -> Option<RequiredVersion> {
        self.origins(language, package).map(effective)
    }

    /// Effective requirements for every package of a language.
    pub fn versions(&self, language: &str) -> Option<BTreeMap<String, RequiredVersion>> {
        let packages = self.requirements.get(&normalize_language(language))?;
        Some(
            packages
                .iter()
                .map(|(name, origins)| (name.clone(), effective(origins)))
                .collect(),
        )
    }

    /// Raw per-origin declarations for one package.
    pub fn origins(&self, language: &str, package: &str) -> Option<&Origins> {
        self.requirements
            .get(&normalize_language(language))?
            .get(&package.trim().to_lowercase())
    }

    /// All packages of a language with their per-origin declarations.
    pub fn packages(&self, language: &str) -> Option<&BTreeMap<String, Origins>> {
        self.requirements.get(&normalize_language(language))
    }

    fn partition(&self, language: &str, runtime: bool) -> BTreeMap<String, RequiredVersion> {
        self.packages(language)
            .map(|packages| {
                packages
                    .iter()
                    .filter(|(_, origins)| is_runtime(origins) == runtime)
                    .map(|(name, origins)| (name.clone(), effective(origins)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Packages any origin needs at runtime.
    pub fn runtime(&self, language: &str) -> BTreeMap<String, RequiredVersion> {
        self.partition(language, true)
    }

    /// Packages no origin needs at runtime.
    pub fn build_only(&self, language: &str) -> BTreeMap<String, RequiredVersion> {
        self.partition(language, false)
    }

    /// [`runtime`](Self::runtime) for every language.
    pub fn runtime_all(&self) -> BTreeMap<String, BTreeMap<String, RequiredVersion>> {
        self.languages()
            .into_iter()
            .map(|language| (language.to_string(), self.runtime(language)))
            .collect()
    }

    /// [`build_only`](Self::build_only) for every language.
    pub fn build_only_all(&self) -> BTreeMap<String, BTreeMap<String, RequiredVersion>> {
        self.languages()
            .into_iter()
            .map(|language| (language.to_string(), self.build_only(language)))
            .collect()
    }

    /// Whether any origin pins the package.
    pub fn is_pinned(&self, language: &str, package: &str) -> bool {
        self.origins(language, package).is_some_and(is_pinned)
    }

    /// Pinned packages of a language.
    pub fn pinned(&self, language: &str) -> Vec<String> {
        self.packages(language)
            .map(|packages| {
                packages
                    .iter()
                    .filter(|(_, origins)| is_pinned(origins))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pinned packages across all languages.
    pub fn pinned_all(&self) -> Vec<String> {
        self.languages()
            .into_iter()
            .flat_map(|language| self.pinned(language))
            .collect()
    }

    /// Whether a language matching `pattern` has declarations.
    pub fn contains_language(&self, pattern: &str) -> bool {
        self.requirements.contains_key(pattern)
            || self.requirements.keys().any(|name| name_matches(pattern, name))
    }

    /// Whether `language` declares a package equal to or matching `pattern`.
    pub fn contains(&self, language: &str, pattern: &str) -> bool {
        let Some(packages) = self.packages(language) else {
            return false;
        };
        packages.contains_key(pattern) || packages.keys().any(|name| name_matches(pattern, name))
    }

    /// Declared languages, sorted.
    pub fn languages(&self) -> Vec<&str> {
        self.requirements.keys().map(|s| s.as_str()).collect()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Drop every declaration. Checkers stay registered.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing all requirements");
        self.requirements.clear();
        self.checked = false;
    }

    /// Clear, then let each module declare its requirements again.
    pub fn reload(&mut self, modules: &[&dyn Declare]) -> Result<()> {
        self.clear();
        for module in modules {
            tracing::debug!("Declaring requirements of {}", module.origin());
            module.declare(self)?;
        }
        Ok(())
    }
}

fn display_version(version: Option<&LooseVersion>) -> String {
    version.map_or_else(|| "*".to_string(), |v| v.to_string())
}
