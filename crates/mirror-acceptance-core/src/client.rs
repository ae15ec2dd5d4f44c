// crates/mirror-acceptance-core/src/client.rs
// ============================================================================
// Module: Mirror REST Client
// Description: Bounded JSON GET client for the mirror REST API.
// Purpose: Turn every transport, status and decode failure into a typed error.
// Dependencies: mirror-acceptance-config, reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`MirrorClient`] issues GET requests against a base URL and decodes JSON
//! bodies. Requests are bounded by the configured timeout, redirects are not
//! followed, and bodies larger than `max_response_bytes` are rejected while
//! streaming.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use mirror_acceptance_config::AcceptanceConfig;
use mirror_acceptance_config::ClientConfig;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one REST API base URL.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Underlying HTTP client.
    client: Client,
    /// Response body size limit in bytes.
    max_response_bytes: usize,
}

impl MirrorClient {
    /// Builds a client for `base_url` using the given client settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Build`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| FetchError::Build(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Builds a client from a full harness configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Build`] when the HTTP client cannot be built.
    pub fn from_config(config: &AcceptanceConfig) -> Result<Self, FetchError> {
        Self::new(&config.client, &config.api.base_url)
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path_and_query` onto the base URL.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.base_url)
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, a non-success status, an
    /// oversized body or invalid JSON.
    pub async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = read_body_with_limit(response, self.max_response_bytes).await?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

// ============================================================================
// SECTION: Envelope Helpers
// ============================================================================

/// Takes the array stored under `field` out of a list envelope.
///
/// # Errors
///
/// Returns [`FetchError::Shape`] when the field is missing or not an array.
pub fn list_field(mut envelope: Value, field: &str) -> Result<Vec<Value>, FetchError> {
    match envelope.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(FetchError::Shape(format!("`{field}` is not an array"))),
        None => Err(FetchError::Shape(format!("response is missing `{field}`"))),
    }
}

/// Returns the top-level `timestamp` of a list envelope.
///
/// # Errors
///
/// Returns [`FetchError::Shape`] when the field is missing.
pub fn envelope_timestamp(envelope: &Value) -> Result<&Value, FetchError> {
    envelope
        .get("timestamp")
        .ok_or_else(|| FetchError::Shape("response is missing `timestamp`".to_string()))
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(length) = response.content_length()
        && usize::try_from(length).unwrap_or(usize::MAX) > limit
    {
        return Err(FetchError::TooLarge {
            limit,
        });
    }
    let mut body = Vec::new();
    while let Some(chunk) =
        response.chunk().await.map_err(|err| FetchError::Transport(err.to_string()))?
    {
        if body.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::TooLarge {
                limit,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP fetch failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    Build(String),
    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-success HTTP status.
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },
    /// Body exceeded the configured limit.
    #[error("response exceeds {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Body was not valid JSON.
    #[error("invalid json response: {0}")]
    Decode(String),
    /// JSON did not have the expected envelope shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
