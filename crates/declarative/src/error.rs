//! Error types for reconciliation operations.
//!
//! Errors are grouped into categories so callers can tell local mistakes
//! apart from remote rejections and from expected drift (not-found).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unreadable artifact or malformed local configuration.
    Local,
    /// Connection-level failure, no status was received.
    Transport,
    /// The remote side answered with a non-2xx status.
    Remote,
    /// The remote side reported the resource does not exist.
    NotFound,
    /// The response body did not have the expected shape.
    Decode,
}

impl ErrorCategory {
    /// Whether a retry by the caller could plausibly succeed.
    ///
    /// The engine itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Local => "Local precondition failed",
            Self::Transport => "Could not reach the remote API",
            Self::Remote => "Remote API rejected the request",
            Self::NotFound => "Remote resource not found",
            Self::Decode => "Unexpected response from the remote API",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Local => "Check the manifest and any referenced local files",
            Self::Transport => "Check your network connection and the API URL, then try again",
            Self::Remote => "Inspect the status code and response body for details",
            Self::NotFound => "The resource was removed out of band; apply will recreate it",
            Self::Decode => "The API may have changed shape; report the response body",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while reconciling a resource.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A local artifact could not be read.
    #[error("failed to read artifact {}: {source}", .path.display())]
    Artifact {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The locally held model cannot be turned into a request.
    #[error("invalid {kind} configuration: {message}")]
    InvalidModel {
        /// Resource kind.
        kind: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The operation needs a remote identifier but the resource has none.
    #[error("{kind} has not been created remotely")]
    Unbound {
        /// Resource kind.
        kind: &'static str,
    },

    /// The request never produced a status code.
    #[error("transport error: {message}")]
    Transport {
        /// Error message from the client.
        message: String,
    },

    /// Non-2xx status with the raw body for diagnosis.
    #[error("{kind} request rejected with HTTP {status}: {body}")]
    Remote {
        /// Resource kind.
        kind: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body (lossy UTF-8).
        body: String,
    },

    /// HTTP 404 on a path addressed by identifier.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Resource kind.
        kind: &'static str,
        /// Identifier that was not found.
        id: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode {kind} response: {source}")]
    Decode {
        /// Resource kind.
        kind: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be encoded.
    #[error("failed to encode {kind} request: {source}")]
    Encode {
        /// Resource kind.
        kind: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A successful create or update response carried no identifier.
    #[error("{kind} response did not include an identifier")]
    MissingIdentifier {
        /// Resource kind.
        kind: &'static str,
    },

    /// Delete succeeded but the following create failed.
    ///
    /// The deleted identifier no longer exists and must not be reused.
    #[error("{kind} {deleted_id} was deleted but could not be recreated: {source}")]
    ReplaceIncomplete {
        /// Resource kind.
        kind: &'static str,
        /// Identifier that was deleted.
        deleted_id: String,
        /// Error from the create step.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an artifact error with path context.
    pub fn artifact(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Artifact {
            path: path.into(),
            source,
        }
    }

    /// Create a transport error from any displayable client error.
    pub fn transport(message: impl fmt::Display) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Create an invalid-model error.
    pub fn invalid(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            kind,
            message: message.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Artifact { .. } | Error::InvalidModel { .. } | Error::Unbound { .. } => {
                ErrorCategory::Local
            }
            Error::Encode { .. } => ErrorCategory::Local,
            Error::Transport { .. } => ErrorCategory::Transport,
            Error::Remote { .. } => ErrorCategory::Remote,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Decode { .. } | Error::MissingIdentifier { .. } => ErrorCategory::Decode,
            Error::ReplaceIncomplete { source, .. } => source.category(),
        }
    }

    /// Whether this error is worth retrying by the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Whether this error is the not-found signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::Transport.is_retryable());
        assert!(!ErrorCategory::Local.is_retryable());
        assert!(!ErrorCategory::Remote.is_retryable());
        assert!(!ErrorCategory::NotFound.is_retryable());
        assert!(!ErrorCategory::Decode.is_retryable());
    }

    #[test]
    fn test_error_category_advice() {
        assert!(!ErrorCategory::Local.advice().is_empty());
        assert!(!ErrorCategory::Transport.advice().is_empty());
        assert!(!ErrorCategory::NotFound.advice().is_empty());
    }

    #[test]
    fn test_error_category_display() {
        let display = format!("{}", ErrorCategory::Transport);
        assert!(display.contains("remote API"));
    }

    #[test]
    fn test_artifact_error_is_local() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = Error::artifact("/tmp/missing.txt", io_err);
        assert_eq!(err.category(), ErrorCategory::Local);
        assert!(err.to_string().contains("/tmp/missing.txt"));
    }

    #[test]
    fn test_remote_error_display_includes_status_and_body() {
        let err = Error::Remote {
            kind: "assistant",
            status: 422,
            body: "{\"message\":\"bad\"}".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("422"));
        assert!(display.contains("bad"));
        assert_eq!(err.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_replace_incomplete_inherits_category() {
        let err = Error::ReplaceIncomplete {
            kind: "assistant",
            deleted_id: "a-1".to_string(),
            source: Box::new(Error::transport("connection reset")),
        };
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.to_string().contains("a-1"));
    }

    #[test]
    fn test_not_found_predicate() {
        let err = Error::NotFound {
            kind: "file",
            id: "f-1".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!Error::transport("x").is_not_found());
    }
}
