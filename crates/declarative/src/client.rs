//! Remote client seam.
//!
//! The engine talks to the remote API through the [`RemoteClient`] trait.
//! It issues one logical operation per call and gets back a status code and
//! raw body bytes. Connection-level failures are the only `Err` a client
//! returns; every received status, including 404 and 5xx, is an `Ok`.
//!
//! # Testing
//!
//! Use [`MockClient`] to script responses without network access:
//!
//! ```
//! use declarative::{Method, MockClient, RemoteClient};
//!
//! let mock = MockClient::new();
//! mock.expect(Method::Get, "assistant/a-1", 200, r#"{"id":"a-1"}"#);
//!
//! let response = mock.send(Method::Get, "assistant/a-1", None).unwrap();
//! assert!(response.is_success());
//! assert_eq!(mock.call_count(), 1);
//! ```

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// HTTP method of a logical remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multipart upload of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Form field carrying the content.
    pub field_name: String,
    /// File name reported to the remote side.
    pub file_name: String,
    /// Raw artifact bytes.
    pub content: Vec<u8>,
}

/// Status code and body of a completed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl RemoteResponse {
    /// Create a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Body as lossy UTF-8, for diagnostics.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends logical operations to the remote API.
///
/// Implementations own authentication, base URL handling and any retry
/// policy. The engine never retries.
pub trait RemoteClient: Send + Sync {
    /// Send a request with an optional JSON body.
    fn send(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<RemoteResponse>;

    /// Upload an artifact as a multipart form `POST`.
    fn upload(&self, path: &str, upload: &Upload) -> Result<RemoteResponse>;
}

impl<C: RemoteClient + ?Sized> RemoteClient for &C {
    fn send(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<RemoteResponse> {
        (**self).send(method, path, body)
    }

    fn upload(&self, path: &str, upload: &Upload) -> Result<RemoteResponse> {
        (**self).upload(path, upload)
    }
}

/// A call observed by [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    /// JSON body, or the uploaded content for multipart calls.
    pub body: Option<Vec<u8>>,
    /// Set for multipart uploads.
    pub file_name: Option<String>,
}

impl RecordedCall {
    /// Decode the recorded body as JSON.
    ///
    /// Returns `Value::Null` when there was no body or it was not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
            .unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond {
        method: Method,
        path: String,
        response: RemoteResponse,
    },
    Fail {
        method: Method,
        path: String,
        message: String,
    },
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    calls: Vec<RecordedCall>,
}

/// In-memory client for tests.
///
/// Responses are consumed in the order they were queued. A call whose
/// method or path differs from the next expectation, or a call with nothing
/// queued, is a transport error, so the engine surfaces it as a failure.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    /// Create an empty mock client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response for the next call.
    pub fn expect(&self, method: Method, path: &str, status: u16, body: &str) {
        self.lock().queue.push_back(Scripted::Respond {
            method,
            path: path.to_string(),
            response: RemoteResponse::new(status, body.as_bytes().to_vec()),
        });
    }

    /// Queue a transport failure for the next call.
    pub fn expect_transport_error(&self, method: Method, path: &str, message: &str) {
        self.lock().queue.push_back(Scripted::Fail {
            method,
            path: path.to_string(),
            message: message.to_string(),
        });
    }

    /// All calls observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of calls observed so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of queued responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lock().queue.len()
    }

    /// Forget observed calls, keeping the queue.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn answer(&self, call: RecordedCall) -> Result<RemoteResponse> {
        let mut state = self.lock();
        let method = call.method;
        let path = call.path.clone();
        state.calls.push(call);

        let Some(next) = state.queue.pop_front() else {
            return Err(Error::transport(format!(
                "mock: unexpected {} {}",
                method, path
            )));
        };

        let (want_method, want_path) = match &next {
            Scripted::Respond { method, path, .. } | Scripted::Fail { method, path, .. } => {
                (*method, path.as_str())
            }
        };
        if want_method != method || want_path != path {
            return Err(Error::transport(format!(
                "mock: expected {} {}, got {} {}",
                want_method, want_path, method, path
            )));
        }

        match next {
            Scripted::Respond { response, .. } => Ok(response),
            Scripted::Fail { message, .. } => Err(Error::transport(message)),
        }
    }
}

impl RemoteClient for MockClient {
    fn send(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<RemoteResponse> {
        self.answer(RecordedCall {
            method,
            path: path.to_string(),
            body: body.map(<[u8]>::to_vec),
            file_name: None,
        })
    }

    fn upload(&self, path: &str, upload: &Upload) -> Result<RemoteResponse> {
        self.answer(RecordedCall {
            method: Method::Post,
            path: path.to_string(),
            body: Some(upload.content.clone()),
            file_name: Some(upload.file_name.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status_classes() {
        assert!(RemoteResponse::new(200, "").is_success());
        assert!(RemoteResponse::new(204, "").is_success());
        assert!(!RemoteResponse::new(404, "").is_success());
        assert!(RemoteResponse::new(404, "").is_not_found());
        assert!(!RemoteResponse::new(500, "").is_not_found());
    }

    #[test]
    fn test_mock_answers_in_order() {
        let mock = MockClient::new();
        mock.expect(Method::Delete, "tool/t-1", 200, "{}");
        mock.expect(Method::Post, "tool", 201, r#"{"id":"t-2"}"#);

        let first = mock.send(Method::Delete, "tool/t-1", None).unwrap();
        assert_eq!(first.status, 200);
        let second = mock.send(Method::Post, "tool", Some(b"{}")).unwrap();
        assert_eq!(second.body_text(), r#"{"id":"t-2"}"#);
        assert_eq!(mock.remaining(), 0);
        assert_eq!(mock.calls()[1].json(), serde_json::json!({}));
    }

    #[test]
    fn test_mock_rejects_unexpected_call() {
        let mock = MockClient::new();
        let err = mock.send(Method::Get, "file/f-1", None).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_mock_rejects_mismatched_path() {
        let mock = MockClient::new();
        mock.expect(Method::Get, "file/f-1", 200, "{}");
        let err = mock.send(Method::Get, "file/f-2", None).unwrap_err();
        assert!(err.to_string().contains("file/f-1"));
    }

    #[test]
    fn test_mock_records_uploads() {
        let mock = MockClient::new();
        mock.expect(Method::Post, "file", 201, r#"{"id":"f-1"}"#);
        let upload = Upload {
            field_name: "file".into(),
            file_name: "notes.txt".into(),
            content: b"content-1".to_vec(),
        };
        mock.upload("file", &upload).unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].file_name.as_deref(), Some("notes.txt"));
        assert_eq!(calls[0].body.as_deref(), Some(&b"content-1"[..]));
    }

    #[test]
    fn test_mock_transport_failure() {
        let mock = MockClient::new();
        mock.expect_transport_error(Method::Post, "assistant", "connection refused");
        let err = mock.send(Method::Post, "assistant", Some(b"{}")).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
