//! Configuration file management
//!
//! Handles finding and loading configuration files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::AppConfig;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory name under the user configuration directory
const APP_DIR: &str = "crdp";

/// Result of configuration discovery. Never an error: problems are
/// reported through `warning` and defaults are used instead.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: Option<PathBuf>,
    pub warning: Option<String>,
}

impl LoadedConfig {
    fn defaults() -> Self {
        Self {
            config: AppConfig::default(),
            path: None,
            warning: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json_file(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))
        }
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Configuration file locations, in order of precedence
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR).join(CONFIG_FILE_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{APP_DIR}")).join(CONFIG_FILE_NAME));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(CONFIG_FILE_NAME));
    }

    paths
}

/// Find configuration file in standard locations
pub fn find() -> Option<PathBuf> {
    candidate_paths().into_iter().find(|path| path.is_file())
}

/// Load the explicit file if given, otherwise the first discovered one.
pub fn load_config(explicit: Option<&Path>) -> LoadedConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find() {
            Some(path) => path,
            None => return LoadedConfig::defaults(),
        },
    };

    match AppConfig::load(&path) {
        Ok(config) => LoadedConfig {
            config,
            path: Some(path),
            warning: None,
        },
        Err(e) => LoadedConfig {
            warning: Some(format!("{e:#}. Using defaults.")),
            ..LoadedConfig::defaults()
        },
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "api:\n  host: 127.0.0.1\n  port: 8080\nexecution:\n  iterations: 3\n",
        )
        .unwrap();

        let loaded = load_config(Some(path.as_path()));
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.api.host, "127.0.0.1");
        assert_eq!(loaded.config.api.port, 8080);
        assert_eq!(loaded.config.execution.iterations, 3);
        assert_eq!(loaded.config.execution.start_data, "1234567890123");
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"protection": {"policy": "P07"}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.protection.policy, "P07");
    }

    #[test]
    fn test_missing_explicit_file_falls_back() {
        let dir = tempdir().unwrap();
        let loaded = load_config(Some(dir.path().join("absent.yaml").as_path()));

        assert!(loaded.path.is_none());
        assert!(loaded.warning.unwrap().contains("Failed to read config file"));
        assert_eq!(loaded.config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api: [unclosed").unwrap();

        let loaded = load_config(Some(path.as_path()));
        assert!(loaded.warning.unwrap().contains("Failed to parse YAML config"));
        assert_eq!(loaded.config, AppConfig::default());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_candidate_order() {
        let paths = candidate_paths();
        assert_eq!(paths[0], PathBuf::from("config.yaml"));
        assert!(paths.iter().all(|p| p.ends_with("config.yaml")));
    }
}
