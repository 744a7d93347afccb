//! Function and DTMF tools.
//!
//! Replace-only. A `dtmf` tool never carries a server block.

use crate::common::{
    is_empty_map, properties_from_wire, properties_to_wire, Property, PropertyWire, Server,
    ServerWire,
};
use declarative::{list_from_wire, list_to_wire, Mutability, Payload, Resource, Result, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tool type sent when none is declared.
pub const DEFAULT_TOOL_TYPE: &str = "function";

/// Tool type that takes no server.
pub const DTMF_TOOL_TYPE: &str = "dtmf";

/// Declared or observed tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tool {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Request payload last applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<serde_json::Value>,

    #[serde(rename = "type")]
    pub kind: Value<String>,
    #[serde(rename = "async")]
    pub async_: Value<bool>,
    pub server: Option<Server>,
    pub function: Option<Function>,

    /// Computed
    pub org_id: Value<String>,
    /// Computed
    pub created_at: Value<String>,
    /// Computed
    pub updated_at: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Function {
    pub name: Value<String>,
    pub description: Value<String>,
    #[serde(rename = "async")]
    pub async_: Value<bool>,
    pub parameters: Option<Parameters>,
}

/// JSON-schema-like argument description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    #[serde(rename = "type")]
    pub kind: Value<String>,
    pub properties: BTreeMap<String, Property>,
    pub required: Vec<String>,
}

impl Tool {
    fn is_dtmf(&self) -> bool {
        self.kind.as_deref() == Some(DTMF_TOOL_TYPE)
    }
}

/// Request and response body for `tool`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolWire {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing)]
    pub org_id: Value<String>,
    #[serde(skip_serializing)]
    pub created_at: Value<String>,
    #[serde(skip_serializing)]
    pub updated_at: Value<String>,

    #[serde(rename = "type", skip_serializing_if = "Value::is_absent")]
    pub kind: Value<String>,
    #[serde(rename = "async", skip_serializing_if = "Value::is_absent")]
    pub async_: Value<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub name: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub description: Value<String>,
    #[serde(rename = "async", skip_serializing_if = "Value::is_absent")]
    pub async_: Value<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersWire {
    #[serde(rename = "type", skip_serializing_if = "Value::is_absent")]
    pub kind: Value<String>,
    #[serde(skip_serializing_if = "is_empty_map")]
    pub properties: BTreeMap<String, PropertyWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl From<&Function> for FunctionWire {
    fn from(f: &Function) -> Self {
        Self {
            name: f.name.clone(),
            description: f.description.clone(),
            async_: f.async_.clone(),
            parameters: f.parameters.as_ref().map(|p| ParametersWire {
                kind: p.kind.clone(),
                properties: properties_to_wire(&p.properties),
                required: list_to_wire(&p.required),
            }),
        }
    }
}

impl From<FunctionWire> for Function {
    fn from(w: FunctionWire) -> Self {
        Self {
            name: w.name,
            description: w.description,
            async_: w.async_,
            parameters: w.parameters.map(|p| Parameters {
                kind: p.kind,
                properties: properties_from_wire(p.properties),
                required: list_from_wire(p.required),
            }),
        }
    }
}

impl Resource for Tool {
    const KIND: &'static str = "tool";
    const COLLECTION: &'static str = "tool";
    const MUTABILITY: Mutability = Mutability::ReplaceOnly;
    type Response = ToolWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        let server = if self.is_dtmf() {
            None
        } else {
            self.server.as_ref().map(Into::into)
        };
        let wire = ToolWire {
            kind: self.kind.clone().or(DEFAULT_TOOL_TYPE.into()),
            async_: self.async_.clone(),
            server,
            function: self.function.as_ref().map(Into::into),
            ..Default::default()
        };
        Payload::json(Self::KIND, &wire)
    }

    fn applied(&self) -> Option<&serde_json::Value> {
        self.applied.as_ref()
    }

    fn set_applied(&mut self, payload: Option<serde_json::Value>) {
        self.applied = payload;
    }

    fn apply_response(&mut self, w: ToolWire) {
        let local_server = self.server.take();

        self.id = w.id;
        self.org_id = w.org_id;
        self.created_at = w.created_at;
        self.updated_at = w.updated_at;
        self.kind = w.kind;
        self.async_ = w.async_;
        self.server = w.server.map(|s| Server::from_wire(s, local_server.as_ref()));
        self.function = w.function.map(Into::into);
    }

    fn label(&self) -> String {
        let name = self
            .function
            .as_ref()
            .and_then(|f| f.name.as_deref())
            .unwrap_or("?");
        if self.id.is_empty() {
            format!("tool {name} (new)")
        } else {
            format!("tool {name} ({})", self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Action, Lifecycle, Method, MockClient};
    use serde_json::json;

    fn weather() -> Tool {
        Tool {
            server: Some(Server {
                url: "https://hooks.example.com/weather".into(),
                secret: "s3cret".into(),
                ..Default::default()
            }),
            function: Some(Function {
                name: "get_weather".into(),
                description: "Current weather".into(),
                parameters: Some(Parameters {
                    kind: "object".into(),
                    properties: BTreeMap::from([
                        (
                            "city".to_string(),
                            Property {
                                kind: "string".into(),
                                description: "City".into(),
                                ..Default::default()
                            },
                        ),
                        (
                            "unit".to_string(),
                            Property {
                                kind: "string".into(),
                                allowed: vec!["celsius".into(), "fahrenheit".into()],
                                ..Default::default()
                            },
                        ),
                    ]),
                    required: vec!["city".into()],
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn request(tool: &Tool) -> serde_json::Value {
        tool.to_request().unwrap().as_json().cloned().unwrap()
    }

    #[test]
    fn test_request_shape() {
        let body = request(&weather());
        assert_eq!(
            body,
            json!({
                "type": "function",
                "server": { "url": "https://hooks.example.com/weather", "secret": "s3cret" },
                "function": {
                    "name": "get_weather",
                    "description": "Current weather",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "city": { "type": "string", "description": "City" },
                            "unit": { "type": "string", "enum": ["celsius", "fahrenheit"] }
                        },
                        "required": ["city"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_explicit_async_false_is_sent() {
        let mut tool = weather();
        tool.async_ = Value::Present(false);
        assert_eq!(request(&tool)["async"], json!(false));
        assert!(request(&weather()).get("async").is_none());
    }

    #[test]
    fn test_dtmf_omits_server() {
        let mut tool = weather();
        tool.kind = DTMF_TOOL_TYPE.into();
        let body = request(&tool);
        assert_eq!(body["type"], "dtmf");
        assert!(body.get("server").is_none());
    }

    #[test]
    fn test_response_keeps_secret_and_unknown_property_keys() {
        let mut observed = weather();
        let wire: ToolWire = serde_json::from_value(json!({
            "id": "t-1",
            "type": "function",
            "orgId": "org-1",
            "server": { "url": "https://hooks.example.com/weather" },
            "function": {
                "name": "get_weather",
                "description": "Current weather",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "city": { "type": "string", "description": "City", "minLength": 2 },
                        "unit": { "type": "string", "enum": ["celsius", "fahrenheit"] }
                    },
                    "required": ["city"]
                }
            }
        }))
        .unwrap();
        observed.apply_response(wire);

        assert_eq!(observed.id, "t-1");
        let server = observed.server.as_ref().unwrap();
        assert_eq!(server.secret.as_deref(), Some("s3cret"));
        let params = observed.function.as_ref().unwrap().parameters.as_ref().unwrap();
        assert_eq!(params.properties["city"].extra["minLength"], json!(2));
        assert_eq!(declarative::plan(Some(&observed), &weather()).unwrap(), Action::NoChange);
    }

    #[test]
    fn test_missing_function_block_clears() {
        let mut observed = weather();
        let wire: ToolWire =
            serde_json::from_value(json!({ "id": "t-1", "type": "dtmf" })).unwrap();
        observed.apply_response(wire);

        assert_eq!(observed.function, None);
        assert_eq!(observed.server, None);
    }

    #[test]
    fn test_description_change_replaces() {
        let mock = MockClient::new();
        mock.expect(Method::Post, "tool", 201, r#"{"id":"t-1","type":"function"}"#);
        let lifecycle = Lifecycle::new(&mock);
        let created = lifecycle.create(&weather()).unwrap();

        let mut desired = weather();
        desired.function.as_mut().unwrap().description = "Forecast".into();
        assert_eq!(declarative::plan(Some(&created), &desired).unwrap(), Action::Replace);

        mock.expect(Method::Delete, "tool/t-1", 200, "{}");
        mock.expect(
            Method::Post,
            "tool",
            201,
            r#"{"id":"t-2","type":"function","function":{"name":"get_weather","description":"Forecast"}}"#,
        );
        let (replaced, _) = lifecycle.reconcile(Some(&created), &desired).unwrap();
        assert_eq!(replaced.id, "t-2");
        assert_eq!(replaced.label(), "tool get_weather (t-2)");
    }
}
