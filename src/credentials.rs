//! Parsing of the credentials payload injected by the CI server.
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{PagesError, Result};

/// A single injected API token credential.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTokenCredentials {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub additional_properties: ApiTokenAdditionalProperties,
}

/// Credential specific fields of an injected API token.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTokenAdditionalProperties {
    pub token: String,
}

/// Extract the token of the first credential in a JSON credentials array.
pub fn token_from_json(payload: &str) -> Result<SecretString> {
    let credentials: Vec<ApiTokenCredentials> = serde_json::from_str(payload)
        .map_err(PagesError::InvalidCredentials)?;

    let first = credentials
        .into_iter()
        .next()
        .ok_or(PagesError::NoCredentials)?;

    if first.additional_properties.token.is_empty() {
        return Err(PagesError::invalid_config(format!(
            "credential '{}' has an empty token",
            first.name
        )));
    }

    Ok(SecretString::from(first.additional_properties.token))
}
