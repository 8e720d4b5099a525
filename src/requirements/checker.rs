//! Checker registration and lookup.
//!
//! A checker validates that the environment provides a package at the
//! effective version. Lookup is two-level: exact package names first, then
//! regex patterns in registration order (first match wins), then the
//! language's `default` checker.

use crate::environment::Environment;
use crate::error::{BuildreqError, Result};
use crate::requirements::store::{normalize_language, RequiredVersion};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every checker.
pub type CheckFn = dyn Fn(&mut dyn Environment, &str, &RequiredVersion) -> Result<()> + Send + Sync;

/// A registered checker.
pub type Checker = Arc<CheckFn>;

/// Name under which a language's fallback checker is registered.
pub const DEFAULT_CHECKER: &str = "default";

/// Wrap a closure or function as a [`Checker`].
pub fn checker<F>(f: F) -> Checker
where
    F: Fn(&mut dyn Environment, &str, &RequiredVersion) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compile a pattern anchored at the start of the name.
///
/// Names match when the pattern matches a prefix, so `nump` matches
/// `numpy` while `umpy` does not.
pub(crate) fn compile_name_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| BuildreqError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[derive(Default)]
struct LanguageCheckers {
    exact: HashMap<String, Checker>,
    patterns: Vec<(Regex, Checker)>,
    default: Option<Checker>,
}

/// Checkers keyed by language and package.
#[derive(Default)]
pub struct CheckerRegistry {
    languages: HashMap<String, LanguageCheckers>,
}

impl CheckerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checker for one or more literal package names.
    ///
    /// The name [`DEFAULT_CHECKER`] sets the language's fallback. Returns the
    /// checker so one value can be registered in several places.
    pub fn register(&mut self, language: &str, packages: &[&str], checker: Checker) -> Checker {
        let language = normalize_language(language);
        let entry = self.languages.entry(language.clone()).or_default();
        for package in packages {
            let package = package.trim().to_lowercase();
            tracing::debug!("Registering checker for {}/{}", language, package);
            if package == DEFAULT_CHECKER {
                entry.default = Some(checker.clone());
            } else {
                entry.exact.insert(package, checker.clone());
            }
        }
        checker
    }

    /// Register a checker for every package whose name matches `pattern`.
    pub fn register_pattern(
        &mut self,
        language: &str,
        pattern: &str,
        checker: Checker,
    ) -> Result<Checker> {
        let regex = compile_name_pattern(pattern)?;
        let language = normalize_language(language);
        tracing::debug!("Registering checker for {}/{}", language, pattern);
        self.languages
            .entry(language)
            .or_default()
            .patterns
            .push((regex, checker.clone()));
        Ok(checker)
    }

    /// Find the checker responsible for a package.
    pub fn lookup(&self, language: &str, package: &str) -> Option<&Checker> {
        let checkers = self.languages.get(&normalize_language(language))?;
        let package = package.to_lowercase();

        if let Some(found) = checkers.exact.get(&package) {
            return Some(found);
        }
        checkers
            .patterns
            .iter()
            .find(|(regex, _)| regex.is_match(&package))
            .map(|(_, checker)| checker)
            .or(checkers.default.as_ref())
    }

    /// Whether any checker (including a default) covers the package.
    pub fn has_checker(&self, language: &str, package: &str) -> bool {
        self.lookup(language, package).is_some()
    }

    /// Languages with at least one registration, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.languages.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for language in self.languages() {
            let checkers = &self.languages[language];
            let mut names: Vec<String> = checkers.exact.keys().cloned().collect();
            names.sort_unstable();
            names.extend(checkers.patterns.iter().map(|(r, _)| r.as_str().to_string()));
            if checkers.default.is_some() {
                names.push(DEFAULT_CHECKER.to_string());
            }
            map.entry(&language, &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::HostEnvironment;
    use crate::version::LooseVersion;

    fn tagged(tag: &'static str) -> Checker {
        checker(move |env, _, _| {
            env.vars_mut().append_unique("CALLED", &[tag.to_string()]);
            Ok(())
        })
    }

    fn call(registry: &CheckerRegistry, language: &str, package: &str) -> Option<String> {
        let checker = registry.lookup(language, package)?;
        let mut env = HostEnvironment::with_path(vec![]);
        let required = RequiredVersion::minimum(Some(LooseVersion::parse("1.0")));
        checker(&mut env, package, &required).unwrap();
        env.vars().first("CALLED").map(String::from)
    }

    #[test]
    fn exact_name_wins_over_pattern_and_default() {
        let mut registry = CheckerRegistry::new();
        registry.register("python", &["default"], tagged("default"));
        registry
            .register_pattern("python", "num.*", tagged("pattern"))
            .unwrap();
        registry.register("python", &["numpy"], tagged("exact"));

        assert_eq!(call(&registry, "python", "numpy").as_deref(), Some("exact"));
        assert_eq!(call(&registry, "python", "numexpr").as_deref(), Some("pattern"));
        assert_eq!(call(&registry, "python", "scipy").as_deref(), Some("default"));
    }

    #[test]
    fn first_matching_pattern_wins() {
        let mut registry = CheckerRegistry::new();
        registry
            .register_pattern("cpp", "boost_.*", tagged("boost"))
            .unwrap();
        registry
            .register_pattern("cpp", "boost_system", tagged("system"))
            .unwrap();

        assert_eq!(call(&registry, "cpp", "boost_system").as_deref(), Some("boost"));
    }

    #[test]
    fn patterns_are_anchored_at_start() {
        let mut registry = CheckerRegistry::new();
        registry
            .register_pattern("python", "mpy", tagged("pattern"))
            .unwrap();
        assert!(registry.lookup("python", "numpy").is_none());
        assert!(registry.lookup("python", "mpyfoo").is_some());
    }

    #[test]
    fn one_checker_for_several_names() {
        let mut registry = CheckerRegistry::new();
        registry.register("nodejs", &["coffeelint", "TypeScript"], tagged("node"));
        assert!(registry.has_checker("nodejs", "coffeelint"));
        assert!(registry.has_checker("nodejs", "typescript"));
    }

    #[test]
    fn languages_are_normalized() {
        let mut registry = CheckerRegistry::new();
        registry.register("CXX", &["g++"], tagged("gxx"));
        assert!(registry.has_checker("cpp", "g++"));
        assert!(registry.has_checker("cxx", "G++"));
        assert_eq!(registry.languages(), vec!["cpp"]);
    }

    #[test]
    fn unknown_language_has_no_checker() {
        let registry = CheckerRegistry::new();
        assert!(registry.lookup("julia", "julia").is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut registry = CheckerRegistry::new();
        let err = registry
            .register_pattern("python", "num(", tagged("bad"))
            .err()
            .unwrap();
        assert!(matches!(err, BuildreqError::InvalidPattern { .. }));
    }

    #[test]
    fn register_returns_same_checker() {
        let mut registry = CheckerRegistry::new();
        let original = tagged("same");
        let returned = registry.register("julia", &["julia"], original.clone());
        assert!(Arc::ptr_eq(&original, &returned));
    }

    #[test]
    fn debug_lists_registered_names() {
        let mut registry = CheckerRegistry::new();
        registry.register("python", &["numpy", "default"], tagged("x"));
        let debug = format!("{:?}", registry);
        assert!(debug.contains("numpy"));
        assert!(debug.contains("default"));
    }
}
