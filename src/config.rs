//! Configuration for the aim-materials host.

use materials_search::{LocalConfig, RemoteConfig, SearchConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HostError, Result};

/// Top-level host configuration, loaded from TOML.
///
/// ```toml
/// [local]
/// dataset_path = "data/local_materials.json"
///
/// [remote]
/// base_url = "https://api.materialsproject.org"
/// summary_path = "/materials/summary"
///
/// [log]
/// filter = "info,materials_search=debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local dataset settings.
    pub local: LocalConfig,
    /// Remote property service settings. Prefer `MATERIALS_API_KEY` over
    /// writing the key into this file.
    pub remote: RemoteConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| HostError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HostError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if given, else from [`default_config_path`] when that
    /// file exists, else defaults.
    ///
    /// [`default_config_path`]: Self::default_config_path
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed. An
    /// explicit `path` that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Search core settings with `MATERIALS_API_*` environment overrides applied.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            local: self.local.clone(),
            remote: self.remote.clone(),
        }
        .with_env_overrides()
    }

    /// Returns the default config file path: `~/.config/aim-materials/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("aim-materials").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("aim-materials")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/aim-materials-config/config.toml")
        }
    }
}
