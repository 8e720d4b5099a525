//! Configuration file discovery and loading.

use crate::config::merger::merge_configs;
use crate::config::schema::BuildreqConfig;
use crate::error::{BuildreqError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name.
pub const CONFIG_FILE: &str = "buildreq.yml";

/// Local overrides file name, usually left out of version control.
pub const LOCAL_CONFIG_FILE: &str = "buildreq.local.yml";

/// Paths to configuration files in priority order (later overrides earlier).
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: buildreq.yml
    pub project: Option<PathBuf>,

    /// Local overrides: buildreq.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_FILE)),
            project_local: existing(project_root.join(LOCAL_CONFIG_FILE)),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if a project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for `buildreq.yml` first, then a `.git` directory.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<BuildreqConfig> {
    let content = read(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into a config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BuildreqConfig> {
    serde_yaml::from_str(content).map_err(|e| BuildreqError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value, for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| BuildreqError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BuildreqError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BuildreqError::Io(e)
        }
    })
}

/// Load `buildreq.yml` with `buildreq.local.yml` layered on top.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no project config exists.
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<BuildreqConfig> {
    let paths = ConfigPaths::discover(project_root);

    if !paths.has_project_config() {
        return Err(BuildreqError::ConfigNotFound {
            path: project_root.join(CONFIG_FILE),
        });
    }

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading config from {}", path.display());
        configs.push(load_config_value(path)?);
    }

    let merged = merge_configs(&configs);

    serde_yaml::from_value(merged).map_err(|e| BuildreqError::ConfigParseError {
        path: project_root.join(CONFIG_FILE),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<BuildreqConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

/// Directory that relative paths in the config are resolved against.
pub fn config_base_dir(project_root: &Path, config_override: Option<&Path>) -> PathBuf {
    config_override
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OutputMode;
    use tempfile::TempDir;

    #[test]
    fn discover_finds_project_and_local() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "").unwrap();
        fs::write(temp.path().join(LOCAL_CONFIG_FILE), "").unwrap();

        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(paths.all_existing().len(), 2);
        assert!(paths.all_existing()[0].ends_with(CONFIG_FILE));
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(!paths.has_project_config());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn find_project_root_finds_config_file() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("src").join("core");
        fs::create_dir_all(&subdir).unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "").unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_prefers_config_over_git() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("nested");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(subdir.join(CONFIG_FILE), "").unwrap();

        assert_eq!(find_project_root(&subdir), Some(subdir));
    }

    #[test]
    fn find_project_root_falls_back_to_git() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("lib");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/buildreq.yml"));
        assert!(matches!(result, Err(BuildreqError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let result = parse_config("modules: [", Path::new("buildreq.yml"));
        assert!(matches!(result, Err(BuildreqError::ConfigParseError { .. })));
    }

    #[test]
    fn parse_config_rejects_wrong_shapes() {
        let result = parse_config("modules:\n  core:\n    requires: [numpy]\n", Path::new("x.yml"));
        assert!(matches!(result, Err(BuildreqError::ConfigParseError { .. })));
    }

    #[test]
    fn empty_file_is_an_empty_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "").unwrap();

        let config = load_config_file(&path).unwrap();
        assert!(config.modules.is_empty());
    }

    #[test]
    fn load_merged_config_layers_local_overrides() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"
settings:
  default_output: verbose
modules:
  core:
    requires:
      python:
        numpy: "1.16"
  viewer:
    requires:
      nodejs:
        typescript: "3.1"
"#,
        )
        .unwrap();
        fs::write(
            temp.path().join(LOCAL_CONFIG_FILE),
            r#"
settings:
  default_output: quiet
modules:
  core:
    requires:
      python:
        numpy: "1.18"
  viewer: ~
"#,
        )
        .unwrap();

        let config = load_merged_config(temp.path()).unwrap();

        assert_eq!(config.settings.default_output, OutputMode::Quiet);
        assert!(!config.modules.contains_key("viewer"));
        let numpy = &config.modules["core"].requires["python"]["numpy"];
        assert_eq!(numpy.version().as_deref(), Some("1.18"));
    }

    #[test]
    fn load_merged_config_fails_without_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LOCAL_CONFIG_FILE), "").unwrap();
        let result = load_merged_config(temp.path());
        assert!(matches!(result, Err(BuildreqError::ConfigNotFound { .. })));
    }

    #[test]
    fn load_config_with_override_skips_merge() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LOCAL_CONFIG_FILE), "manifest: OTHER\n").unwrap();
        let override_path = temp.path().join("custom.yml");
        fs::write(&override_path, "manifest: REQUIRE\n").unwrap();

        let config = load_config(temp.path(), Some(&override_path)).unwrap();
        assert_eq!(config.manifest, Some(PathBuf::from("REQUIRE")));
    }

    #[test]
    fn base_dir_follows_override() {
        let root = Path::new("/project");
        assert_eq!(config_base_dir(root, None), PathBuf::from("/project"));
        assert_eq!(
            config_base_dir(root, Some(Path::new("/etc/buildreq/ci.yml"))),
            PathBuf::from("/etc/buildreq")
        );
        assert_eq!(
            config_base_dir(root, Some(Path::new("ci.yml"))),
            PathBuf::from("/project")
        );
    }
}
