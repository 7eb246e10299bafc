//! Error types for requesting page builds.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Main error type for gh-pages-trigger operations.
#[derive(Error, Debug)]
pub enum PagesError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No credentials have been injected")]
    NoCredentials,

    #[error("Failed unmarshalling injected credentials: {0}")]
    InvalidCredentials(#[source] serde_json::Error),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error(
        "Status code {status} for '{method} {url}' is not one of the valid status codes {valid:?} for this request. Body: {body}"
    )]
    UnexpectedStatus {
        method: Method,
        url: String,
        status: u16,
        valid: Vec<u16>,
        body: String,
    },

    #[error(
        "Deserializing response for '{url}' Github api call failed. Body: {body}. Error: {source}"
    )]
    MalformedResponse {
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using PagesError
pub type Result<T> = std::result::Result<T, PagesError>;

impl PagesError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unexpected status error carrying the full response context
    pub fn unexpected_status(
        method: Method,
        url: impl Into<String>,
        status: StatusCode,
        valid: &[StatusCode],
        body: &[u8],
    ) -> Self {
        Self::UnexpectedStatus {
            method,
            url: url.into(),
            status: status.as_u16(),
            valid: valid.iter().map(|s| s.as_u16()).collect(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// True for configuration problems detected before any network call.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_)
                | Self::NoCredentials
                | Self::InvalidCredentials(_)
        )
    }
}

impl From<reqwest::Error> for PagesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkError(format!("request timed out: {err}"))
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}
