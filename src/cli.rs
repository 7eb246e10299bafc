//! CLI argument parsing and configuration assembly.
use clap::Parser;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::{
    config::{Config, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS},
    credentials,
    error::{PagesError, Result},
    github::retry::{DEFAULT_MAX_ATTEMPTS, RetryConfig},
};

/// Requests a GitHub Pages build for a repository.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        long,
        env = "ESTAFETTE_CREDENTIALS_GITHUB_API_TOKEN",
        hide_env_values = true
    )]
    /// Github api token credentials configured at the CI server, as a JSON
    /// array. The token of the first entry is used.
    pub credentials: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    /// Github personal access token. Used when no credentials are injected.
    pub token: Option<String>,

    #[arg(long, env = "ESTAFETTE_GIT_OWNER")]
    /// The owner of the Github repository.
    pub git_repo_owner: String,

    #[arg(long, env = "ESTAFETTE_GIT_NAME")]
    /// The name of the Github repository.
    pub git_repo_name: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    /// Github api base url. Set this for Github Enterprise.
    pub api_url: String,

    #[arg(long, env = "PAGES_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    /// Total number of attempts for the api call.
    pub max_attempts: u32,

    #[arg(long, env = "PAGES_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    /// Timeout in seconds for each attempt.
    pub timeout_secs: u64,

    #[arg(long, env = "PAGES_DEBUG", default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Validate the arguments and build the runtime configuration.
    pub fn get_config(&self) -> Result<Config> {
        let owner = required("git-repo-owner", &self.git_repo_owner)?;
        let repo = required("git-repo-name", &self.git_repo_name)?;
        let token = self.resolve_token()?;

        if self.max_attempts == 0 {
            return Err(PagesError::invalid_config(
                "max-attempts must be at least 1",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(PagesError::invalid_config(
                "timeout-secs must be at least 1",
            ));
        }

        let api_url = Url::parse(&self.api_url)?;
        validate_scheme(&api_url)?;

        let mut config = Config::new(owner, repo, token)?;
        config.api_url = api_url;
        config.retry = RetryConfig {
            max_attempts: self.max_attempts,
            ..RetryConfig::default()
        };
        config.request_timeout = Duration::from_secs(self.timeout_secs);

        Ok(config)
    }

    /// Injected credentials take precedence over a direct token.
    fn resolve_token(&self) -> Result<SecretString> {
        if let Some(payload) = self.credentials.as_deref() {
            return credentials::token_from_json(payload);
        }

        if let Some(token) = self.token.as_deref()
            && !token.trim().is_empty()
        {
            return Ok(SecretString::from(token.trim().to_string()));
        }

        Err(PagesError::invalid_config(
            "must set github credentials or token",
        ))
    }
}

fn required(flag: &str, value: &str) -> Result<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(PagesError::invalid_config(format!("must set {flag}")));
    }

    Ok(value.to_string())
}

/// Only http and https api urls are supported.
fn validate_scheme(url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PagesError::invalid_config(format!(
            "only http and https schemes are supported for api urls: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI argument parsing and configuration assembly.
    use super::*;
    use secrecy::ExposeSecret;

    const ENV_VARS: [&str; 8] = [
        "ESTAFETTE_CREDENTIALS_GITHUB_API_TOKEN",
        "GITHUB_TOKEN",
        "ESTAFETTE_GIT_OWNER",
        "ESTAFETTE_GIT_NAME",
        "GITHUB_API_URL",
        "PAGES_MAX_ATTEMPTS",
        "PAGES_TIMEOUT_SECS",
        "PAGES_DEBUG",
    ];

    fn args() -> Args {
        Args {
            credentials: None,
            token: Some("abc123".into()),
            git_repo_owner: "acme".into(),
            git_repo_name: "docs".into(),
            api_url: DEFAULT_API_URL.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debug: false,
        }
    }

    #[test]
    fn builds_config_from_direct_token() {
        let config = args().get_config().unwrap();

        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "docs");
        assert_eq!(config.token.expose_secret(), "abc123");
        assert_eq!(config.api_url.as_str(), "https://api.github.com/");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn credentials_take_precedence_over_token() {
        let mut args = args();
        args.credentials = Some(
            r#"[{"name":"gh","type":"github-api-token","additionalProperties":{"token":"injected"}}]"#
                .into(),
        );

        let config = args.get_config().unwrap();
        assert_eq!(config.token.expose_secret(), "injected");
    }

    #[test]
    fn empty_credentials_list_is_fatal() {
        let mut args = args();
        args.credentials = Some("[]".into());

        let err = args.get_config().unwrap_err();
        assert!(matches!(err, PagesError::NoCredentials));
    }

    #[test]
    fn empty_credentials_payload_does_not_fall_back_to_token() {
        for payload in ["", "   "] {
            let mut args = args();
            args.credentials = Some(payload.into());
            args.token = Some("fallback".into());

            let err = args.get_config().unwrap_err();
            assert!(matches!(err, PagesError::InvalidCredentials(_)));
            assert!(err.is_config_error());
        }
    }

    #[test]
    fn malformed_credentials_are_fatal() {
        let mut args = args();
        args.credentials = Some("{not json".into());

        let err = args.get_config().unwrap_err();
        assert!(matches!(err, PagesError::InvalidCredentials(_)));
    }

    #[test]
    fn requires_some_token() {
        let mut args = args();
        args.token = None;

        let err = args.get_config().unwrap_err();
        assert!(err.is_config_error());

        let mut args = self::args();
        args.token = Some("  ".into());
        assert!(args.get_config().is_err());
    }

    #[test]
    fn requires_owner_and_name() {
        let mut args = args();
        args.git_repo_owner = "".into();
        assert!(args.get_config().unwrap_err().is_config_error());

        let mut args = self::args();
        args.git_repo_name = " ".into();
        assert!(args.get_config().unwrap_err().is_config_error());
    }

    #[test]
    fn rejects_zero_attempts_and_timeout() {
        let mut args = args();
        args.max_attempts = 0;
        assert!(args.get_config().is_err());

        let mut args = self::args();
        args.timeout_secs = 0;
        assert!(args.get_config().is_err());
    }

    #[test]
    fn only_supports_http_and_https_schemes() {
        let mut args = args();
        args.api_url = "ftp://github.example.com".into();
        assert!(args.get_config().is_err());

        let mut args = self::args();
        args.api_url = "http://github.example.com/api/v3".into();
        assert!(args.get_config().is_ok());
    }

    #[test]
    fn parses_flags() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let args = Args::try_parse_from([
                "gh-pages-trigger",
                "--token",
                "abc123",
                "--git-repo-owner",
                "acme",
                "--git-repo-name",
                "docs",
                "--max-attempts",
                "5",
                "--debug",
            ])
            .unwrap();

            assert!(args.debug);
            assert!(args.credentials.is_none());

            let config = args.get_config().unwrap();
            assert_eq!(config.retry.max_attempts, 5);
            assert_eq!(config.token.expose_secret(), "abc123");
        });
    }

    #[test]
    fn reads_estafette_environment() {
        let credentials = r#"[{"additionalProperties":{"token":"from-env"}}]"#;
        let vars = ENV_VARS.map(|key| {
            let value = match key {
                "ESTAFETTE_CREDENTIALS_GITHUB_API_TOKEN" => Some(credentials),
                "ESTAFETTE_GIT_OWNER" => Some("acme"),
                "ESTAFETTE_GIT_NAME" => Some("docs"),
                _ => None,
            };
            (key, value)
        });

        temp_env::with_vars(vars, || {
            let args = Args::try_parse_from(["gh-pages-trigger"]).unwrap();
            let config = args.get_config().unwrap();

            assert_eq!(config.owner, "acme");
            assert_eq!(config.repo, "docs");
            assert_eq!(config.token.expose_secret(), "from-env");
        });
    }

    #[test]
    fn missing_owner_fails_to_parse() {
        temp_env::with_vars_unset(ENV_VARS, || {
            let result = Args::try_parse_from([
                "gh-pages-trigger",
                "--token",
                "abc123",
                "--git-repo-name",
                "docs",
            ]);
            assert!(result.is_err());
        });
    }
}
