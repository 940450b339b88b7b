//! Shared HTTP client for the remote property service.

use std::time::Duration;

use crate::config::RemoteConfig;
use crate::error::SearchError;

/// Default User-Agent sent to the remote service.
pub const DEFAULT_USER_AGENT: &str = concat!("materials-search/", env!("CARGO_PKG_VERSION"));

/// Header carrying the remote access credential.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Build a [`reqwest::Client`] for the remote service.
///
/// The client has:
/// - The configured User-Agent (or [`DEFAULT_USER_AGENT`])
/// - A request timeout only when `timeout_seconds` is set
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &RemoteConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    let mut builder = reqwest::Client::builder()
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5));
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        assert!(build_client(&RemoteConfig::default()).is_ok());
    }

    #[test]
    fn build_client_with_timeout_and_custom_ua() {
        let config = RemoteConfig {
            timeout_seconds: Some(5),
            user_agent: Some("CustomBot/1.0".into()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(DEFAULT_USER_AGENT.starts_with("materials-search/"));
    }
}
