//! Uploaded file resource.
//!
//! Content is gated by a digest of the local artifact: an unchanged file is
//! never re-uploaded, a changed one is deleted and uploaded again.

use declarative::{
    deserialize_byte_size, read_artifact, Error, Mutability, Payload, Resource, Result, Upload,
    Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Multipart field carrying the artifact.
const UPLOAD_FIELD: &str = "file";

/// Declared or observed file.
///
/// `file_path` and `checksum` are local: the API never reports them.
/// Everything else is computed remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub file_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    pub name: Value<String>,
    pub original_name: Value<String>,
    pub bytes: Value<i64>,
    pub mimetype: Value<String>,
    pub path: Value<String>,
    pub url: Value<String>,
    pub status: Value<String>,
    pub purpose: Value<String>,
    pub bucket: Value<String>,
    pub created_at: Value<String>,
    pub updated_at: Value<String>,
    pub org_id: Value<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl File {
    /// A file declared by its local path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
            ..Default::default()
        }
    }

    fn upload_name(&self) -> Result<String> {
        self.file_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::invalid(
                    Self::KIND,
                    format!("{} has no file name", self.file_path.display()),
                )
            })
    }
}

/// Response body for `file`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileWire {
    pub id: String,
    pub name: Value<String>,
    pub original_name: Value<String>,
    #[serde(deserialize_with = "deserialize_byte_size")]
    pub bytes: Value<i64>,
    pub mimetype: Value<String>,
    pub path: Value<String>,
    pub url: Value<String>,
    pub status: Value<String>,
    pub purpose: Value<String>,
    pub bucket: Value<String>,
    pub created_at: Value<String>,
    pub updated_at: Value<String>,
    pub org_id: Value<String>,
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl Resource for File {
    const KIND: &'static str = "file";
    const COLLECTION: &'static str = "file";
    const MUTABILITY: Mutability = Mutability::ContentGated;
    type Response = FileWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        let file_name = self.upload_name()?;
        let content = read_artifact(&self.file_path)?;
        Ok(Payload::Upload(Upload {
            field_name: UPLOAD_FIELD.to_string(),
            file_name,
            content,
        }))
    }

    fn apply_response(&mut self, w: FileWire) {
        self.id = w.id;
        self.name = w.name;
        self.original_name = w.original_name;
        self.bytes = w.bytes;
        self.mimetype = w.mimetype;
        self.path = w.path;
        self.url = w.url;
        self.status = w.status;
        self.purpose = w.purpose;
        self.bucket = w.bucket;
        self.created_at = w.created_at;
        self.updated_at = w.updated_at;
        self.org_id = w.org_id;
        self.metadata = w.metadata.unwrap_or_default();
    }

    fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    fn set_checksum(&mut self, checksum: String) {
        self.checksum = Some(checksum);
    }

    fn adopt_local_inputs(&mut self, desired: &Self) {
        self.file_path = desired.file_path.clone();
    }

    fn label(&self) -> String {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.id.is_empty() {
            format!("file {name} (new)")
        } else {
            format!("file {name} ({})", self.id)
        }
    }
}
