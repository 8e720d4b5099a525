//! Checking installed program versions.
//!
//! Most checkers boil down to: find the program, run `<program> --version`,
//! pull a version out of the output, and compare it with the requirement.

use crate::environment::{program_var, Environment};
use crate::error::{BuildreqError, Result};
use crate::requirements::store::RequiredVersion;
use crate::version::LooseVersion;

/// Extract a version from `--version` output.
///
/// Uses the first non-empty line containing `marker` (or the last non-empty
/// line when none does), then the last token on it that contains a digit,
/// with commas and a leading `v` removed.
pub fn extract_version(output: &str, marker: &str) -> Option<LooseVersion> {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let line = lines
        .iter()
        .find(|l| l.contains(marker))
        .or(lines.last())?;

    let token = line
        .split_whitespace()
        .rev()
        .find(|t| t.chars().any(|c| c.is_ascii_digit()))?
        .replace(',', "");
    let token = token.trim_matches(|c: char| c == '(' || c == ')');
    let token = token.strip_prefix('v').unwrap_or(token);
    Some(LooseVersion::parse(token))
}

/// Find a program, run it with `--version`, and return what it reports.
///
/// The version is recorded as `<PROGRAM>_VERSION` in the environment.
pub fn probe_program_version(
    env: &mut dyn Environment,
    program: &str,
    marker: Option<&str>,
) -> Result<LooseVersion> {
    let path = env.find_program(program)?;
    let output = env.run(&[path.to_string_lossy().to_string(), "--version".to_string()])?;

    let found = extract_version(&output, marker.unwrap_or(program)).ok_or_else(|| {
        BuildreqError::Unsatisfied {
            package: program.to_string(),
            found: "an unreadable version".to_string(),
            required: "a version number".to_string(),
        }
    })?;

    env.vars_mut().set(
        &format!("{}_VERSION", program_var(program)),
        vec![found.to_string()],
    );
    Ok(found)
}

/// Check that a program satisfies a requirement.
///
/// `marker` selects the output line holding the version (defaults to the
/// program name); tools like `pylint` report several versions at once.
/// Returns `Ok(false)` instead of failing when `mandatory` is false.
pub fn program_version(
    env: &mut dyn Environment,
    program: &str,
    required: &RequiredVersion,
    marker: Option<&str>,
    mandatory: bool,
) -> Result<bool> {
    let found = match probe_program_version(env, program, marker) {
        Ok(found) => found,
        Err(e) if !mandatory => {
            tracing::warn!("Skipping optional {}: {}", program, e);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    if required.is_satisfied_by(&found) {
        tracing::debug!("{} {} satisfies {}", program, found, required);
        return Ok(true);
    }

    let package = match marker {
        Some(marker) => format!("{} ({})", program, marker),
        None => program.to_string(),
    };
    if !mandatory {
        tracing::warn!("{} {} does not satisfy {}", package, found, required);
        return Ok(false);
    }
    Err(BuildreqError::Unsatisfied {
        package,
        found: found.to_string(),
        required: required.to_string(),
    })
}
