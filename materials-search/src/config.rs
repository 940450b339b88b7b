//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] names the local dataset file and the remote service
//! endpoint. A missing remote API key is a supported state: the remote
//! provider then contributes nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::SearchError;

/// Default location of the local bulk dataset.
pub const DEFAULT_DATASET_PATH: &str = "data/local_materials.json";

/// Default remote service base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.materialsproject.org";

/// Default remote summary endpoint path.
pub const DEFAULT_SUMMARY_PATH: &str = "/materials/summary";

/// Environment variable overriding [`RemoteConfig::base_url`].
pub const ENV_BASE_URL: &str = "MATERIALS_API_BASE_URL";
/// Environment variable overriding [`RemoteConfig::summary_path`].
pub const ENV_SUMMARY_PATH: &str = "MATERIALS_API_SUMMARY_PATH";
/// Environment variable supplying [`RemoteConfig::api_key`].
pub const ENV_API_KEY: &str = "MATERIALS_API_KEY";

/// Configuration for both providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub local: LocalConfig,
    pub remote: RemoteConfig,
}

/// Local dataset settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// JSON array of material entries, read once per process.
    pub dataset_path: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

/// Remote property service settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub summary_path: String,
    /// Access credential. `None` disables the remote provider.
    pub api_key: Option<String>,
    /// Optional per-request deadline. The core sets none by default.
    pub timeout_seconds: Option<u64>,
    /// Custom User-Agent string. Defaults to `materials-search/<version>`.
    pub user_agent: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            summary_path: DEFAULT_SUMMARY_PATH.to_owned(),
            api_key: None,
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("summary_path", &self.summary_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RemoteConfig {
    /// Full URL of the summary endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.summary_path
        )
    }

    /// Whether an access credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl SearchConfig {
    /// Apply `MATERIALS_API_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(base) = get(ENV_BASE_URL) {
            self.remote.base_url = base;
        }
        if let Some(path) = get(ENV_SUMMARY_PATH) {
            self.remote.summary_path = path;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.remote.api_key = Some(key);
        }
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `local.dataset_path` must not be empty
    /// - `remote.base_url` must be an absolute http(s) URL
    /// - `remote.summary_path` must start with `/`
    /// - `remote.timeout_seconds`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.local.dataset_path.as_os_str().is_empty() {
            return Err(SearchError::Config(
                "local.dataset_path must not be empty".into(),
            ));
        }
        let base = url::Url::parse(&self.remote.base_url)
            .map_err(|e| SearchError::Config(format!("remote.base_url is invalid: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "remote.base_url must use http or https, got {}",
                base.scheme()
            )));
        }
        if !self.remote.summary_path.starts_with('/') {
            return Err(SearchError::Config(
                "remote.summary_path must start with '/'".into(),
            ));
        }
        if self.remote.timeout_seconds == Some(0) {
            return Err(SearchError::Config(
                "remote.timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
