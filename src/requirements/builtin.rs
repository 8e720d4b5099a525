//! Checkers for the languages the build plugin supports out of the box.
//!
//! | Language | Packages                                                    |
//! |----------|-------------------------------------------------------------|
//! | python   | `python`, `pylint`, `astroid`, `mypy`, `nodejs`, any module |
//! | nodejs   | `nodejs`, `typescript`, `coffeelint`                        |
//! | coffee   | `coffee`, `coffeelint`                                      |
//! | julia    | `julia`                                                     |
//! | cpp      | `g++`, `gcc`, `clang++`, `clang`                            |

use crate::environment::{program_var, Environment};
use crate::error::{BuildreqError, Result};
use crate::requirements::checker::{checker, DEFAULT_CHECKER};
use crate::requirements::program::{probe_program_version, program_version};
use crate::requirements::store::{RequiredVersion, RequirementStore};
use crate::version::LooseVersion;
use std::path::PathBuf;

/// Variable holding the python interpreter version once checked.
pub const PYTHON_VERSION_VAR: &str = "PYTHON_VERSION";

/// Register every built-in checker on `store`.
pub fn register_builtin_checkers(store: &mut RequirementStore) {
    register_python(store);
    register_nodejs(store);
    register_coffee(store);
    register_julia(store);
    register_cpp(store);
}

fn register_python(store: &mut RequirementStore) {
    store.register_checker("python", &["python"], checker(check_python));
    store.register_checker("python", &[DEFAULT_CHECKER], checker(check_python_module));
    store.register_checker(
        "python",
        &["pylint", "mypy"],
        checker(|env, package, required| {
            program_version(env, package, required, None, true).map(|_| ())
        }),
    );
    store.register_checker(
        "python",
        &["astroid"],
        checker(|env, package, required| {
            program_version(env, "pylint", required, Some(package), true).map(|_| ())
        }),
    );
    store.register_checker(
        "python",
        &["nodejs"],
        checker(|env, _, required| program_version(env, "node", required, None, true).map(|_| ())),
    );
}

fn register_nodejs(store: &mut RequirementStore) {
    store.register_checker(
        "nodejs",
        &["nodejs"],
        checker(|env, _, required| {
            let mandatory = !env.platform().is_windows();
            program_version(env, "node", required, None, mandatory).map(|_| ())
        }),
    );
    store.register_checker(
        "nodejs",
        &["typescript"],
        checker(|env, _, required| {
            let mandatory = !env.platform().is_windows();
            program_version(env, "tsc", required, None, mandatory).map(|_| ())
        }),
    );
    store.register_checker("nodejs", &["coffeelint"], checker(check_optional_program));
}

fn register_coffee(store: &mut RequirementStore) {
    store.register_checker("coffee", &["coffee", "coffeelint"], checker(check_optional_program));
}

fn register_julia(store: &mut RequirementStore) {
    store.register_checker(
        "julia",
        &["julia"],
        checker(|env, package, required| {
            program_version(env, "julia", required, Some(package), true).map(|_| ())
        }),
    );
}

fn register_cpp(store: &mut RequirementStore) {
    store.register_checker(
        "cpp",
        &["g++", "gcc"],
        checker(|env, package, required| {
            program_version(env, package, required, None, true).map(|_| ())
        }),
    );
    store.register_checker(
        "cpp",
        &["clang++", "clang"],
        checker(|env, package, required| {
            program_version(env, package, required, Some("clang version"), true).map(|_| ())
        }),
    );
    // Libraries are found by the build engine's own configure tests.
    store.register_checker(
        "cpp",
        &[DEFAULT_CHECKER],
        checker(|_, package, _| {
            tracing::debug!("Leaving {} to the build engine", package);
            Ok(())
        }),
    );
}

/// Program named after the package, optional on Windows.
fn check_optional_program(
    env: &mut dyn Environment,
    package: &str,
    required: &RequiredVersion,
) -> Result<()> {
    let mandatory = !env.platform().is_windows();
    program_version(env, package, required, None, mandatory).map(|_| ())
}

/// Find the python interpreter, preferring `python3`.
fn python_program(env: &mut dyn Environment) -> Result<(String, PathBuf)> {
    match env.find_program("python3") {
        Ok(path) => Ok(("python3".to_string(), path)),
        Err(BuildreqError::ToolNotFound { .. }) => {
            env.find_program("python").map(|path| ("python".to_string(), path))
        }
        Err(e) => Err(e),
    }
}

fn check_python(env: &mut dyn Environment, _package: &str, required: &RequiredVersion) -> Result<()> {
    if env.vars().contains(PYTHON_VERSION_VAR) {
        return Ok(());
    }

    let (program, _) = python_program(env)?;
    let found = probe_program_version(env, &program, Some("Python"))?;
    if !required.is_satisfied_by(&found) {
        return Err(BuildreqError::Unsatisfied {
            package: "python".to_string(),
            found: found.to_string(),
            required: required.to_string(),
        });
    }

    tracing::info!("Using {} {}", program, found);
    env.vars_mut()
        .set(PYTHON_VERSION_VAR, vec![found.to_string()]);
    Ok(())
}

/// Importable module version, read through `importlib.metadata`.
fn check_python_module(
    env: &mut dyn Environment,
    package: &str,
    required: &RequiredVersion,
) -> Result<()> {
    let module = package.strip_prefix("python-").unwrap_or(package);
    let (program, path) = python_program(env)?;
    let script = format!(
        "import importlib.metadata as m; print(m.version({:?}))",
        module
    );

    let output = env.run(&[
        path.to_string_lossy().to_string(),
        "-c".to_string(),
        script,
    ]);
    let found = match output {
        Ok(text) => LooseVersion::parse(text.trim()),
        Err(BuildreqError::CommandFailed { .. }) => {
            return Err(BuildreqError::Unsatisfied {
                package: package.to_string(),
                found: format!("no module in {}", program),
                required: required.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    if !required.is_satisfied_by(&found) {
        return Err(BuildreqError::Unsatisfied {
            package: package.to_string(),
            found: found.to_string(),
            required: required.to_string(),
        });
    }
    env.vars_mut().set(
        &format!("{}_VERSION", program_var(module)),
        vec![found.to_string()],
    );
    Ok(())
}
