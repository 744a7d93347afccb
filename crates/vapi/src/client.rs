//! Blocking HTTP client for the Vapi API.
//!
//! Every call carries a bearer token. Status codes are never turned into
//! errors here; the lifecycle controller interprets them.

use crate::multipart;
use declarative::{Error, Method, RemoteClient, RemoteResponse, Result, Upload};
use log::debug;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.vapi.ai";

/// Upper bound for a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("vapi-sync/", env!("CARGO_PKG_VERSION"));

/// Maximum response body size (file metadata and assistants are small).
const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

/// Authenticated API client.
///
/// # Example
///
/// ```no_run
/// use declarative::{Method, RemoteClient};
/// use vapi::ApiClient;
///
/// let client = ApiClient::new("https://api.vapi.ai", "token");
/// let response = client.send(Method::Get, "assistant/abc", None).unwrap();
/// println!("HTTP {}", response.status);
/// ```
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a client for a base URL and token.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl RemoteClient for ApiClient {
    fn send(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<RemoteResponse> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let result = match method {
            Method::Get => self
                .agent
                .get(&url)
                .header("Authorization", self.bearer())
                .header("User-Agent", USER_AGENT)
                .call(),
            Method::Delete => self
                .agent
                .delete(&url)
                .header("Authorization", self.bearer())
                .header("User-Agent", USER_AGENT)
                .call(),
            Method::Post | Method::Patch => {
                let request = if method == Method::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.patch(&url)
                };
                request
                    .header("Authorization", self.bearer())
                    .header("User-Agent", USER_AGENT)
                    .header("Content-Type", "application/json")
                    .send(body.unwrap_or(b"{}"))
            }
        };

        finish(result)
    }

    fn upload(&self, path: &str, upload: &Upload) -> Result<RemoteResponse> {
        let url = self.url(path);
        let encoded = multipart::encode(upload);
        debug!("POST {} (multipart, {} bytes)", url, encoded.body.len());

        let result = self
            .agent
            .post(&url)
            .header("Authorization", self.bearer())
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", encoded.content_type.as_str())
            .send(&encoded.body[..]);

        finish(result)
    }
}

fn finish(
    result: std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<RemoteResponse> {
    let mut response = result.map_err(Error::transport)?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_BODY_SIZE)
        .read_to_vec()
        .map_err(Error::transport)?;
    debug!("HTTP {} ({} bytes)", status, body.len());
    Ok(RemoteResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("https://api.vapi.ai/", "t");
        assert_eq!(client.base_url(), "https://api.vapi.ai");
        assert_eq!(client.url("assistant"), "https://api.vapi.ai/assistant");
        assert_eq!(client.url("/file/f-1"), "https://api.vapi.ai/file/f-1");
    }

    #[test]
    fn test_bearer_header() {
        let client = ApiClient::new(DEFAULT_BASE_URL, "secret");
        assert_eq!(client.bearer(), "Bearer secret");
    }

    #[test]
    fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let client = ApiClient::new("http://127.0.0.1:9", "t");
        let err = client.send(Method::Get, "assistant/a-1", None).unwrap_err();
        assert!(err.is_retryable());
    }
}
