//! HTTP transport seam between the API client and the network.
use async_trait::async_trait;
use log::*;
use reqwest::Client;
use std::time::Duration;

use crate::{
    error::Result,
    github::request::{ApiCall, ApiResponse},
};

/// User agent sent with every request; the GitHub API rejects requests
/// without one.
pub const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Sends one prepared request and returns the raw response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, call: ApiCall) -> Result<ApiResponse>;
}

/// Transport backed by a reqwest client with a per-attempt timeout.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    fn build_request(&self, call: ApiCall) -> Result<reqwest::Request> {
        let mut builder = self
            .client
            .request(call.method, call.url)
            .headers(call.headers);

        if let Some(body) = call.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&body)?);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, call: ApiCall) -> Result<ApiResponse> {
        let request = self.build_request(call)?;
        debug!("sending {} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!("received status {status} with {} byte body", body.len());

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{
        Method, StatusCode, Url,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
    };
    use serde_json::{Value, json};

    fn request(body: Option<Value>) -> ApiCall {
        let url =
            Url::parse("https://api.github.com/repos/acme/docs/pages/builds")
                .unwrap();
        let mut call = ApiCall::post(url, &[StatusCode::OK]);
        call.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("token abc"));
        call.headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        call.body = body;
        call
    }

    #[test]
    fn builds_request_with_headers() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let built = transport.build_request(request(None)).unwrap();

        assert_eq!(built.method(), Method::POST);
        assert_eq!(
            built.url().as_str(),
            "https://api.github.com/repos/acme/docs/pages/builds"
        );
        assert_eq!(built.headers()[AUTHORIZATION], "token abc");
        assert_eq!(built.headers()[ACCEPT], "application/json");
        assert!(built.headers().get(CONTENT_TYPE).is_none());
        assert!(built.body().is_none());
    }

    #[test]
    fn json_body_sets_content_type() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let built = transport
            .build_request(request(Some(json!({"a": 1}))))
            .unwrap();

        assert_eq!(built.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            built.body().and_then(|b| b.as_bytes()),
            Some(&b"{\"a\":1}"[..])
        );
    }
}
