use reqwest::{Method, StatusCode, Url, header::HeaderMap};
use serde_json::Value;

/// Status codes accepted for a page build request.
pub const PAGE_BUILD_VALID_STATUS: [StatusCode; 2] =
    [StatusCode::OK, StatusCode::CREATED];

#[derive(Debug, Clone)]
/// A single API call and the statuses that count as success for it.
pub struct ApiCall {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub valid_status_codes: Vec<StatusCode>,
}

impl ApiCall {
    pub fn post(url: Url, valid_status_codes: &[StatusCode]) -> Self {
        Self {
            method: Method::POST,
            url,
            headers: HeaderMap::new(),
            body: None,
            valid_status_codes: valid_status_codes.to_vec(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn accepts(&self, status: StatusCode) -> bool {
        self.valid_status_codes.contains(&status)
    }
}

#[derive(Debug, Clone)]
/// Raw response of one attempt.
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Server errors are worth another attempt. 429 is retried as well,
    /// since secondary rate limits on the API clear within seconds.
    pub fn is_retryable(&self) -> bool {
        self.status.is_server_error()
            || self.status == StatusCode::TOO_MANY_REQUESTS
    }
}
