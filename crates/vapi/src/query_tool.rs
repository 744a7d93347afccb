//! Knowledge-base query tool.
//!
//! Shares the `tool` collection with function tools but is patched in
//! place. The `type` discriminator is only sent on create.

use declarative::{list_from_wire, list_to_wire, Mutability, Payload, Resource, Result, Value};
use serde::{Deserialize, Serialize};

/// Tool type discriminator for query tools.
pub const QUERY_TOOL_TYPE: &str = "query";

/// Declared or observed query tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryTool {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Request payload last applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<serde_json::Value>,

    pub function: Option<QueryFunction>,
    pub knowledge_bases: Vec<KnowledgeBase>,

    /// Computed
    #[serde(rename = "type")]
    pub kind: Value<String>,
    /// Computed
    pub org_id: Value<String>,
    /// Computed
    pub created_at: Value<String>,
    /// Computed
    pub updated_at: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFunction {
    pub name: Value<String>,
    pub description: Value<String>,
}

/// One knowledge base the tool searches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    pub provider: Value<String>,
    pub name: Value<String>,
    pub model: Value<String>,
    pub description: Value<String>,
    pub file_ids: Vec<String>,
}

/// Request and response body for a query tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryToolWire {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<QueryFunctionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_bases: Option<Vec<KnowledgeBaseWire>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFunctionWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub name: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub description: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnowledgeBaseWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub provider: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub name: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub model: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub description: Value<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
}

impl QueryTool {
    fn wire(&self, kind: Value<String>) -> QueryToolWire {
        let knowledge_bases: Vec<KnowledgeBaseWire> = self
            .knowledge_bases
            .iter()
            .map(|kb| KnowledgeBaseWire {
                provider: kb.provider.clone(),
                name: kb.name.clone(),
                model: kb.model.clone(),
                description: kb.description.clone(),
                file_ids: list_to_wire(&kb.file_ids),
            })
            .collect();

        QueryToolWire {
            kind,
            function: self.function.as_ref().map(|f| QueryFunctionWire {
                name: f.name.clone(),
                description: f.description.clone(),
            }),
            knowledge_bases: (!knowledge_bases.is_empty()).then_some(knowledge_bases),
            ..Default::default()
        }
    }
}

impl Resource for QueryTool {
    const KIND: &'static str = "query_tool";
    const COLLECTION: &'static str = "tool";
    const MUTABILITY: Mutability = Mutability::InPlace;
    type Response = QueryToolWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        Payload::json(Self::KIND, &self.wire(QUERY_TOOL_TYPE.into()))
    }

    fn to_update_request(&self) -> Result<Payload> {
        Payload::json(Self::KIND, &self.wire(Value::Unset))
    }

    fn applied(&self) -> Option<&serde_json::Value> {
        self.applied.as_ref()
    }

    fn set_applied(&mut self, payload: Option<serde_json::Value>) {
        self.applied = payload;
    }

    fn apply_response(&mut self, w: QueryToolWire) {
        self.id = w.id;
        self.org_id = w.org_id;
        self.created_at = w.created_at;
        self.updated_at = w.updated_at;
        self.kind = w.kind;
        self.function = w.function.map(|f| QueryFunction {
            name: f.name,
            description: f.description,
        });
        self.knowledge_bases = w
            .knowledge_bases
            .unwrap_or_default()
            .into_iter()
            .map(|kb| KnowledgeBase {
                provider: kb.provider,
                name: kb.name,
                model: kb.model,
                description: kb.description,
                file_ids: list_from_wire(kb.file_ids),
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Action, ApplyResult, Lifecycle, Method, MockClient, ReadOutcome};
    use serde_json::json;

    fn faq() -> QueryTool {
        QueryTool {
            function: Some(QueryFunction {
                name: "search_faq".into(),
                description: "Answer product questions".into(),
            }),
            knowledge_bases: vec![KnowledgeBase {
                provider: "google".into(),
                name: "faq".into(),
                model: "gemini-1.5-flash".into(),
                description: "Product FAQ".into(),
                file_ids: vec!["f-2".into(), "f-1".into()],
            }],
            ..Default::default()
        }
    }

    fn echoed(id: &str, file_ids: &[&str]) -> String {
        json!({
            "id": id,
            "type": "query",
            "orgId": "org-1",
            "function": { "name": "search_faq", "description": "Answer product questions" },
            "knowledgeBases": [{
                "provider": "google",
                "name": "faq",
                "model": "gemini-1.5-flash",
                "description": "Product FAQ",
                "fileIds": file_ids
            }]
        })
        .to_string()
    }

    #[test]
    fn test_type_only_on_create() {
        let create = faq().to_request().unwrap().as_json().cloned().unwrap();
        assert_eq!(create["type"], QUERY_TOOL_TYPE);
        assert_eq!(create["knowledgeBases"][0]["fileIds"], json!(["f-2", "f-1"]));

        let update = faq().to_update_request().unwrap().as_json().cloned().unwrap();
        assert!(update.get("type").is_none());
        assert_eq!(update["function"]["name"], "search_faq");
    }

    #[test]
    fn test_file_order_change_patches_in_place() {
        let mock = MockClient::new();
        mock.expect(Method::Post, "tool", 201, &echoed("q-1", &["f-2", "f-1"]));
        mock.expect(Method::Patch, "tool/q-1", 200, &echoed("q-1", &["f-1", "f-2"]));

        let lifecycle = Lifecycle::new(&mock);
        let (created, result) = lifecycle.reconcile(None, &faq()).unwrap();
        assert_eq!(result, ApplyResult::Created);
        assert_eq!(created.kind.as_deref(), Some("query"));

        let mut desired = faq();
        desired.knowledge_bases[0].file_ids = vec!["f-1".into(), "f-2".into()];
        assert_eq!(
            declarative::plan(Some(&created), &desired).unwrap(),
            Action::UpdateInPlace
        );

        let (updated, result) = lifecycle.reconcile(Some(&created), &desired).unwrap();
        assert_eq!(result, ApplyResult::Updated);
        assert_eq!(updated.id, "q-1");
        assert_eq!(updated.knowledge_bases[0].file_ids, vec!["f-1", "f-2"]);
        assert!(mock.calls()[1].json().get("type").is_none());
    }

    #[test]
    fn test_unchanged_plans_no_change() {
        let mock = MockClient::new();
        mock.expect(Method::Post, "tool", 201, &echoed("q-1", &["f-2", "f-1"]));
        let created = Lifecycle::new(&mock).create(&faq()).unwrap();

        assert_eq!(declarative::plan(Some(&created), &faq()).unwrap(), Action::NoChange);
    }

    #[test]
    fn test_read_orphaned_and_empty_bases() {
        let mut held = faq();
        held.id = "q-1".into();

        let mock = MockClient::new();
        mock.expect(Method::Get, "tool/q-1", 200, r#"{"id":"q-1","type":"query","knowledgeBases":null}"#);
        mock.expect(Method::Get, "tool/q-1", 404, r#"{"message":"Not Found"}"#);

        let lifecycle = Lifecycle::new(&mock);
        let ReadOutcome::Found(observed) = lifecycle.read(&held).unwrap() else {
            panic!("expected query tool");
        };
        assert!(observed.knowledge_bases.is_empty());
        assert_eq!(observed.function, None);

        assert!(lifecycle.read(&held).unwrap().is_not_found());
    }
}
