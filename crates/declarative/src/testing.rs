//! Small resource kinds used by the engine's own tests.

use crate::client::Upload;
use crate::error::{Error, Result};
use crate::resource::{Payload, Resource};
use crate::types::Mutability;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub max: Value<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetWire {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_absent")]
    pub name: Value<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitsWire {
    #[serde(default, skip_serializing_if = "Value::is_absent")]
    pub max: Value<i64>,
}

/// Patchable kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Widget {
    pub id: String,
    pub name: Value<String>,
    pub limits: Option<Limits>,
    pub applied: Option<serde_json::Value>,
}

impl Widget {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn wire(&self) -> WidgetWire {
        WidgetWire {
            id: String::new(),
            name: self.name.clone(),
            limits: self.limits.as_ref().map(|l| LimitsWire { max: l.max.clone() }),
        }
    }

    fn absorb(&mut self, response: WidgetWire) {
        self.id = response.id;
        self.name = response.name;
        self.limits = response.limits.map(|l| Limits { max: l.max });
    }
}

impl Resource for Widget {
    const KIND: &'static str = "widget";
    const COLLECTION: &'static str = "widget";
    const MUTABILITY: Mutability = Mutability::InPlace;
    type Response = WidgetWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        Payload::json(Self::KIND, &self.wire())
    }

    fn apply_response(&mut self, response: WidgetWire) {
        self.absorb(response);
    }

    fn applied(&self) -> Option<&serde_json::Value> {
        self.applied.as_ref()
    }

    fn set_applied(&mut self, payload: Option<serde_json::Value>) {
        self.applied = payload;
    }
}

/// Replace-only kind with the same shape as [`Widget`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gadget(pub Widget);

impl Resource for Gadget {
    const KIND: &'static str = "gadget";
    const COLLECTION: &'static str = "gadget";
    const MUTABILITY: Mutability = Mutability::ReplaceOnly;
    type Response = WidgetWire;

    fn id(&self) -> &str {
        &self.0.id
    }

    fn set_id(&mut self, id: String) {
        self.0.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        Payload::json(Self::KIND, &self.0.wire())
    }

    fn apply_response(&mut self, response: WidgetWire) {
        self.0.absorb(response);
    }

    fn applied(&self) -> Option<&serde_json::Value> {
        self.0.applied.as_ref()
    }

    fn set_applied(&mut self, payload: Option<serde_json::Value>) {
        self.0.applied = payload;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlobWire {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Value<String>,
}

/// Content-gated kind backed by a local file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blob {
    pub id: String,
    pub path: PathBuf,
    pub checksum: Option<String>,
    pub name: Value<String>,
}

impl Blob {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

impl Resource for Blob {
    const KIND: &'static str = "blob";
    const COLLECTION: &'static str = "blob";
    const MUTABILITY: Mutability = Mutability::ContentGated;
    type Response = BlobWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        let content = crate::checksum::read_artifact(&self.path)?;
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::invalid(Self::KIND, "path has no file name"))?
            .to_string();
        Ok(Payload::Upload(Upload {
            field_name: "file".to_string(),
            file_name,
            content,
        }))
    }

    fn apply_response(&mut self, response: BlobWire) {
        self.id = response.id;
        self.name = response.name;
    }

    fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    fn set_checksum(&mut self, checksum: String) {
        self.checksum = Some(checksum);
    }

    fn adopt_local_inputs(&mut self, desired: &Self) {
        self.path = desired.path.clone();
    }
}
