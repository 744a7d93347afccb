//! Sub-trees shared by several resource kinds.

use declarative::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Webhook target for server events and tool calls.
///
/// `secret` is write-only: the API never echoes it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub url: Value<String>,
    pub secret: Value<String>,
    pub timeout_seconds: Value<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub url: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub secret: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub timeout_seconds: Value<i64>,
}

impl From<&Server> for ServerWire {
    fn from(s: &Server) -> Self {
        Self {
            url: s.url.clone(),
            secret: s.secret.clone(),
            timeout_seconds: s.timeout_seconds.clone(),
        }
    }
}

impl Server {
    /// Map a response block, keeping the locally supplied secret.
    pub fn from_wire(wire: ServerWire, local: Option<&Server>) -> Self {
        Self {
            url: wire.url,
            secret: local.map(|s| s.secret.clone()).unwrap_or_default(),
            timeout_seconds: wire.timeout_seconds,
        }
    }
}

/// One named parameter in a JSON-schema-like property bag.
///
/// Keys outside the documented set are kept in `extra` and sent back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    #[serde(rename = "type")]
    pub kind: Value<String>,
    pub description: Value<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyWire {
    #[serde(rename = "type", skip_serializing_if = "Value::is_absent")]
    pub kind: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub description: Value<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl From<&Property> for PropertyWire {
    fn from(p: &Property) -> Self {
        Self {
            kind: p.kind.clone(),
            description: p.description.clone(),
            allowed: declarative::list_to_wire(&p.allowed),
            extra: p.extra.clone(),
        }
    }
}

impl From<PropertyWire> for Property {
    fn from(w: PropertyWire) -> Self {
        Self {
            kind: w.kind,
            description: w.description,
            allowed: declarative::list_from_wire(w.allowed),
            extra: w.extra,
        }
    }
}

/// Map a keyed property bag to its wire form.
pub fn properties_to_wire(props: &BTreeMap<String, Property>) -> BTreeMap<String, PropertyWire> {
    props.iter().map(|(k, v)| (k.clone(), v.into())).collect()
}

/// Map a wire property bag back, entry by entry.
pub fn properties_from_wire(props: BTreeMap<String, PropertyWire>) -> BTreeMap<String, Property> {
    props.into_iter().map(|(k, v)| (k, v.into())).collect()
}

/// Empty bags are omitted from requests.
pub(crate) fn is_empty_map<K, V>(map: &BTreeMap<K, V>) -> bool {
    map.is_empty()
}
