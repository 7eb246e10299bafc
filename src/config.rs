//! Runtime configuration assembled once at startup.
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::{error::Result, github::retry::RetryConfig};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default timeout applied to each individual HTTP attempt.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything needed to request a page build for one repository.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token used for the `Authorization` header.
    pub token: SecretString,
    /// API base URL, e.g. `https://api.github.com`.
    pub api_url: Url,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Timeout for a single HTTP attempt.
    pub request_timeout: Duration,
}

impl Config {
    /// Config for github.com with default retry and timeout settings.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: SecretString,
    ) -> Result<Self> {
        Ok(Self {
            owner: owner.into(),
            repo: repo.into(),
            token,
            api_url: Url::parse(DEFAULT_API_URL)?,
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_github_defaults() {
        let config =
            Config::new("acme", "docs", SecretString::from("abc123".to_string()))
                .unwrap();

        assert_eq!(config.api_url.as_str(), "https://api.github.com/");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_output_hides_token() {
        let config =
            Config::new("acme", "docs", SecretString::from("abc123".to_string()))
                .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("acme"));
    }
}
