//! Resource trait for remote reconciliation
//!
//! A Resource is a typed tree that can be mapped to a remote API request
//! and repopulated from a remote API response. One generic
//! [`Lifecycle`](crate::Lifecycle) drives every kind; a kind only supplies
//! its mapper pair and its [`Mutability`] class.

use crate::client::Upload;
use crate::error::Result;
use crate::types::Mutability;
use serde::de::DeserializeOwned;
use std::fmt;

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON document
    Json(serde_json::Value),
    /// Multipart artifact upload
    Upload(Upload),
}

impl Payload {
    /// Serialize a wire DTO into a JSON payload
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if serialization fails.
    pub fn json<T: serde::Serialize>(kind: &'static str, dto: &T) -> Result<Self> {
        serde_json::to_value(dto)
            .map(Self::Json)
            .map_err(|source| crate::Error::Encode { kind, source })
    }

    /// Borrow the JSON document, if this is a JSON payload
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Upload(_) => None,
        }
    }
}

/// Core trait for reconcilable resources
///
/// # Example
///
/// ```ignore
/// use declarative::{Mutability, Payload, Resource, Result};
///
/// #[derive(Debug, Clone, Default)]
/// struct Note { id: String, text: String }
///
/// #[derive(serde::Deserialize)]
/// struct NoteResponse { id: String, text: Option<String> }
///
/// impl Resource for Note {
///     const KIND: &'static str = "note";
///     const COLLECTION: &'static str = "note";
///     const MUTABILITY: Mutability = Mutability::InPlace;
///     type Response = NoteResponse;
///
///     fn id(&self) -> &str { &self.id }
///     fn set_id(&mut self, id: String) { self.id = id }
///
///     fn to_request(&self) -> Result<Payload> {
///         Ok(Payload::Json(serde_json::json!({ "text": self.text })))
///     }
///
///     fn apply_response(&mut self, response: NoteResponse) {
///         self.id = response.id;
///         self.text = response.text.unwrap_or_default();
///     }
/// }
/// ```
pub trait Resource: Clone + fmt::Debug + Send + Sync {
    /// Resource kind, used in errors and logs
    const KIND: &'static str;

    /// Collection path relative to the API base URL
    ///
    /// Create posts here; read, update and delete address `{COLLECTION}/{id}`.
    const COLLECTION: &'static str;

    /// How the kind reacts to a change in desired state
    const MUTABILITY: Mutability;

    /// Wire shape of the remote response
    type Response: DeserializeOwned;

    /// Remote identifier, empty if never created
    fn id(&self) -> &str;

    /// Replace the remote identifier
    fn set_id(&mut self, id: String);

    /// Request mapper: build the create body from this model
    ///
    /// Content-gated kinds return [`Payload::Upload`] and read their
    /// artifact here.
    fn to_request(&self) -> Result<Payload>;

    /// Request mapper for an in-place update
    ///
    /// Defaults to the create body. Override when the patch shape differs.
    fn to_update_request(&self) -> Result<Payload> {
        self.to_request()
    }

    /// Response mapper: repopulate every remote-echoed field
    ///
    /// This is a full overwrite. Sub-trees missing from the response must
    /// be cleared. Local-only inputs are left untouched.
    fn apply_response(&mut self, response: Self::Response);

    /// Recorded content digest, for content-gated kinds
    fn checksum(&self) -> Option<&str> {
        None
    }

    /// Record a content digest, for content-gated kinds
    fn set_checksum(&mut self, _checksum: String) {}

    /// Request payload last sent for this resource
    ///
    /// Kinds compared by payload keep this in their persisted model so a
    /// declared field that was later removed still shows up as drift.
    /// Content-gated kinds compare digests instead and may leave it unset.
    fn applied(&self) -> Option<&serde_json::Value> {
        None
    }

    /// Record the request payload that was just applied
    fn set_applied(&mut self, _payload: Option<serde_json::Value>) {}

    /// Copy local-only inputs from a desired model
    ///
    /// Used when a content-gated update is skipped, so the kept model
    /// reflects the caller's current inputs.
    fn adopt_local_inputs(&mut self, _desired: &Self) {}

    /// Human-readable label for plans and logs
    fn label(&self) -> String {
        if self.id().is_empty() {
            format!("{} (new)", Self::KIND)
        } else {
            format!("{} {}", Self::KIND, self.id())
        }
    }

    /// Path addressing this instance
    fn instance_path(&self) -> String {
        format!("{}/{}", Self::COLLECTION, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Dto {
        name: &'static str,
    }

    #[test]
    fn test_payload_json() {
        let payload = Payload::json("demo", &Dto { name: "demo" }).unwrap();
        assert_eq!(payload.as_json(), Some(&serde_json::json!({ "name": "demo" })));
    }

    #[test]
    fn test_upload_payload_has_no_json() {
        let payload = Payload::Upload(Upload {
            field_name: "file".into(),
            file_name: "a.txt".into(),
            content: vec![],
        });
        assert!(payload.as_json().is_none());
    }
}
