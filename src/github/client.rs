//! Authenticated GitHub REST client for requesting page builds.
use log::*;
use reqwest::{
    Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::{
    config::Config,
    error::{PagesError, Result},
    github::{
        request::{ApiCall, ApiResponse, PAGE_BUILD_VALID_STATUS},
        retry::{self, Attempt, RetryConfig},
        transport::{ReqwestTransport, Transport},
    },
};

/// Media type pinned for every request.
pub const PREVIEW_MEDIA_TYPE: &str =
    "application/vnd.github.machine-man-preview+json";

/// GitHub client bound to a single access token.
pub struct GithubClient {
    api_url: Url,
    token: SecretString,
    retry: RetryConfig,
    transport: Box<dyn Transport>,
}

impl GithubClient {
    /// Create a client that talks to the network through reqwest.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Create a client on top of an arbitrary transport.
    pub fn with_transport(
        config: &Config,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            retry: config.retry,
            transport,
        }
    }

    /// Request a GitHub Pages build for `owner/repo`.
    ///
    /// https://docs.github.com/en/rest/pages/pages#request-a-github-pages-build
    pub async fn request_page_build(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<()> {
        info!("Requesting github pages build for {owner}/{repo}...");

        let url = self.page_builds_url(owner, repo)?;
        self.call_api(ApiCall::post(url, &PAGE_BUILD_VALID_STATUS))
            .await?;

        Ok(())
    }

    /// `{api_url}/repos/{owner}/{repo}/pages/builds`
    pub fn page_builds_url(&self, owner: &str, repo: &str) -> Result<Url> {
        validate_segment("repository owner", owner)?;
        validate_segment("repository name", repo)?;

        let base = self.api_url.as_str().trim_end_matches('/');
        let url =
            Url::parse(&format!("{base}/repos/{owner}/{repo}/pages/builds"))?;

        let tail: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.rev().take(5).collect())
            .unwrap_or_default();

        if tail != ["builds", "pages", repo, owner, "repos"] {
            return Err(PagesError::invalid_config(format!(
                "{owner}/{repo} does not map onto a page builds url: {url}"
            )));
        }

        Ok(url)
    }

    /// Send `call` with bounded retry and validate the response.
    ///
    /// A non-empty response body has to be valid JSON; the parsed value
    /// itself is discarded.
    pub async fn call_api(&self, mut call: ApiCall) -> Result<ApiResponse> {
        call.headers.extend(self.headers()?);

        let response = retry::with_backoff(self.retry, |attempt| {
            let call = call.clone();
            async move {
                debug!("attempt {attempt}: {} {}", call.method, call.url);
                match self.transport.execute(call).await {
                    Ok(response) if response.is_retryable() => {
                        Attempt::Retry(Ok(response))
                    }
                    Ok(response) => Attempt::Done(response),
                    Err(err @ PagesError::NetworkError(_)) => {
                        Attempt::Retry(Err(err))
                    }
                    Err(err) => Attempt::Fail(err),
                }
            }
        })
        .await?;

        if !call.accepts(response.status) {
            return Err(PagesError::unexpected_status(
                call.method,
                call.url.as_str(),
                response.status,
                &call.valid_status_codes,
                &response.body,
            ));
        }

        if response.body.is_empty() {
            info!(
                "Received successful response without body for '{} {}' with status code {}",
                call.method,
                call.url,
                response.status.as_u16()
            );
            return Ok(response);
        }

        if let Err(source) = serde_json::from_slice::<Value>(&response.body) {
            let body = response.body_text();
            error!(
                "Deserializing response for '{}' Github api call failed. Body: {body}. Error: {source}",
                call.url
            );
            return Err(PagesError::MalformedResponse {
                url: call.url.to_string(),
                body,
                source,
            });
        }

        debug!(
            "'{} {}' succeeded with status code {}",
            call.method,
            call.url,
            response.status.as_u16()
        );

        Ok(response)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut token_value = HeaderValue::from_str(
            format!("token {}", self.token.expose_secret()).as_str(),
        )?;
        token_value.set_sensitive(true);

        headers.insert(AUTHORIZATION, token_value);
        headers.insert(ACCEPT, HeaderValue::from_static(PREVIEW_MEDIA_TYPE));

        Ok(headers)
    }
}

/// Owner and repo are interpolated into the URL path, so they must be a
/// single non-empty path segment that url parsing leaves untouched.
fn validate_segment(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PagesError::invalid_config(format!("{what} is empty")));
    }

    if value == "." || value == ".." {
        return Err(PagesError::invalid_config(format!(
            "{what} cannot be a dot segment: {value}"
        )));
    }

    if value.contains(['/', '\\', '?', '#', '%']) {
        return Err(PagesError::invalid_config(format!(
            "{what} contains invalid characters: {value}"
        )));
    }

    Ok(())
}
