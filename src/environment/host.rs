//! Host-backed environment.
//!
//! Programs are resolved by walking `PATH` entries directly and commands are
//! run with [`std::process::Command`], capturing their output.

use crate::environment::{program_var, EnvVars, Environment, Platform};
use crate::error::{BuildreqError, Result};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Check if a file has any executable permission bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a program's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. On Windows an
/// `.exe` suffix is tried as well.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
        if cfg!(windows) {
            let candidate = dir.join(format!("{}.exe", tool));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Split the process `PATH` into entries.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Environment that inspects the machine buildreq runs on.
#[derive(Debug)]
pub struct HostEnvironment {
    path_entries: Vec<PathBuf>,
    vars: EnvVars,
    loaded_languages: BTreeSet<String>,
    platform: Platform,
}

impl HostEnvironment {
    /// Create an environment searching the process `PATH`.
    pub fn new() -> Self {
        Self::with_path(parse_system_path())
    }

    /// Create an environment searching the given directories.
    pub fn with_path(path_entries: Vec<PathBuf>) -> Self {
        Self {
            path_entries,
            vars: EnvVars::new(),
            loaded_languages: BTreeSet::new(),
            platform: Platform::current(),
        }
    }

    /// Languages whose build support has been loaded, in sorted order.
    pub fn loaded_languages(&self) -> Vec<&str> {
        self.loaded_languages.iter().map(|s| s.as_str()).collect()
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for HostEnvironment {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn load_language(&mut self, language: &str) -> Result<()> {
        if self.loaded_languages.insert(language.to_string()) {
            tracing::debug!("Loading {} build support", language);
        }
        Ok(())
    }

    fn find_program(&mut self, program: &str) -> Result<PathBuf> {
        let var = program_var(program);
        if let Some(found) = self.vars.first(&var) {
            return Ok(PathBuf::from(found));
        }

        let path = resolve_tool_path(program, &self.path_entries).ok_or_else(|| {
            BuildreqError::ToolNotFound {
                program: program.to_string(),
            }
        })?;
        tracing::debug!("Found {} at {}", program, path.display());
        self.vars
            .set(&var, vec![path.to_string_lossy().to_string()]);
        Ok(path)
    }

    fn run(&mut self, argv: &[String]) -> Result<String> {
        let Some((program, args)) = argv.split_first() else {
            return Err(BuildreqError::Other(anyhow::anyhow!("empty command line")));
        };

        let command_line = argv.join(" ");
        tracing::debug!("Running: {}", command_line);

        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BuildreqError::ToolNotFound {
                    program: program.clone(),
                }
            } else {
                BuildreqError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(BuildreqError::CommandFailed {
                command: command_line,
                code: output.status.code(),
            });
        }

        // Some tools print their version on stderr.
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if stdout.trim().is_empty() {
            Ok(String::from_utf8_lossy(&output.stderr).to_string())
        } else {
            Ok(stdout)
        }
    }

    fn vars(&self) -> &EnvVars {
        &self.vars
    }

    fn vars_mut(&mut self) -> &mut EnvVars {
        &mut self.vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_script(path: &Path, body: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        create_script(&first.path().join("node"), "exit 0");
        create_script(&second.path().join("node"), "exit 0");

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = resolve_tool_path("node", &entries).unwrap();
        assert_eq!(found, first.path().join("node"));
    }

    #[test]
    fn resolve_tool_path_returns_none_when_missing() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_tool_path("nope", &[temp.path().to_path_buf()]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tsc");
        fs::write(&path, "not a program").unwrap();
        assert!(!is_executable(&path));
        assert!(resolve_tool_path("tsc", &[temp.path().to_path_buf()]).is_none());
    }

    #[test]
    fn find_program_records_path_variable() {
        let temp = TempDir::new().unwrap();
        create_script(&temp.path().join("julia"), "exit 0");

        let mut env = HostEnvironment::with_path(vec![temp.path().to_path_buf()]);
        let path = env.find_program("julia").unwrap();
        assert_eq!(path, temp.path().join("julia"));
        let expected = temp.path().join("julia").to_string_lossy().to_string();
        assert_eq!(env.vars().first("JULIA"), Some(expected.as_str()));
    }

    #[test]
    fn find_program_prefers_recorded_variable() {
        let mut env = HostEnvironment::with_path(vec![]);
        env.vars_mut()
            .set("COFFEE", vec!["/opt/coffee/bin/coffee".to_string()]);
        let path = env.find_program("coffee").unwrap();
        assert_eq!(path, PathBuf::from("/opt/coffee/bin/coffee"));
    }

    #[test]
    fn find_program_missing_is_tool_not_found() {
        let mut env = HostEnvironment::with_path(vec![]);
        let err = env.find_program("definitely-not-here").unwrap_err();
        assert!(matches!(err, BuildreqError::ToolNotFound { program } if program == "definitely-not-here"));
    }

    #[cfg(unix)]
    #[test]
    fn run_captures_stdout() {
        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("tool");
        create_script(&tool, "echo \"tool 1.2.3\"");

        let mut env = HostEnvironment::with_path(vec![]);
        let out = env
            .run(&[tool.to_string_lossy().to_string(), "--version".to_string()])
            .unwrap();
        assert_eq!(out.trim(), "tool 1.2.3");
    }

    #[cfg(unix)]
    #[test]
    fn run_falls_back_to_stderr() {
        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("python2");
        create_script(&tool, "echo \"Python 2.7.18\" 1>&2");

        let mut env = HostEnvironment::with_path(vec![]);
        let out = env.run(&[tool.to_string_lossy().to_string()]).unwrap();
        assert_eq!(out.trim(), "Python 2.7.18");
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("broken");
        create_script(&tool, "exit 3");

        let mut env = HostEnvironment::with_path(vec![]);
        let err = env.run(&[tool.to_string_lossy().to_string()]).unwrap_err();
        assert!(matches!(err, BuildreqError::CommandFailed { code: Some(3), .. }));
    }

    #[test]
    fn run_missing_program_is_tool_not_found() {
        let mut env = HostEnvironment::with_path(vec![]);
        let err = env
            .run(&["/nonexistent/path/to/tool".to_string()])
            .unwrap_err();
        assert!(matches!(err, BuildreqError::ToolNotFound { .. }));
    }

    #[test]
    fn run_empty_command_fails() {
        let mut env = HostEnvironment::with_path(vec![]);
        assert!(env.run(&[]).is_err());
    }

    #[test]
    fn load_language_is_recorded_once() {
        let mut env = HostEnvironment::with_path(vec![]);
        env.load_language("python").unwrap();
        env.load_language("cpp").unwrap();
        env.load_language("python").unwrap();
        assert_eq!(env.loaded_languages(), vec!["cpp", "python"]);
    }
}
