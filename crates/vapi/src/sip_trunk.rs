//! SIP trunk credential.
//!
//! Patched in place under the `credential` collection. The outbound auth
//! password is write-only and kept from the declared model.

use declarative::{Mutability, Payload, Resource, Result, Value};
use serde::{Deserialize, Serialize};

/// Provider sent when none is declared.
pub const DEFAULT_PROVIDER: &str = "byo-sip-trunk";

/// Declared or observed SIP trunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipTrunk {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Request payload last applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<serde_json::Value>,

    pub provider: Value<String>,
    pub name: Value<String>,
    pub gateways: Vec<Gateway>,
    pub outbound_authentication_plan: Option<OutboundAuthenticationPlan>,
    pub outbound_leading_plus_enabled: Value<bool>,
    pub tech_prefix: Value<String>,
    pub sip_diversion_header: Value<String>,

    /// Computed
    pub org_id: Value<String>,
    /// Computed
    pub created_at: Value<String>,
    /// Computed
    pub updated_at: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gateway {
    pub ip: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboundAuthenticationPlan {
    pub auth_username: Value<String>,
    /// Write-only
    pub auth_password: Value<String>,
    pub sip_register_plan: Option<SipRegisterPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipRegisterPlan {
    pub domain: Value<String>,
    pub username: Value<String>,
    pub realm: Value<String>,
}

/// Request and response body for `credential`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SipTrunkWire {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing)]
    pub org_id: Value<String>,
    #[serde(skip_serializing)]
    pub created_at: Value<String>,
    #[serde(skip_serializing)]
    pub updated_at: Value<String>,

    #[serde(skip_serializing_if = "Value::is_absent")]
    pub provider: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub name: Value<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateways: Option<Vec<GatewayWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_authentication_plan: Option<OutboundAuthenticationPlanWire>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub outbound_leading_plus_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub tech_prefix: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub sip_diversion_header: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub ip: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutboundAuthenticationPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub auth_username: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub auth_password: Value<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_register_plan: Option<SipRegisterPlanWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipRegisterPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub domain: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub username: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub realm: Value<String>,
}

impl From<&SipTrunk> for SipTrunkWire {
    fn from(t: &SipTrunk) -> Self {
        let gateways: Vec<GatewayWire> = t
            .gateways
            .iter()
            .map(|g| GatewayWire { ip: g.ip.clone() })
            .collect();

        Self {
            provider: t
                .provider
                .clone()
                .or(Value::Present(DEFAULT_PROVIDER.to_string())),
            name: t.name.clone(),
            gateways: (!gateways.is_empty()).then_some(gateways),
            outbound_authentication_plan: t.outbound_authentication_plan.as_ref().map(|p| {
                OutboundAuthenticationPlanWire {
                    auth_username: p.auth_username.clone(),
                    auth_password: p.auth_password.clone(),
                    sip_register_plan: p.sip_register_plan.as_ref().map(|r| SipRegisterPlanWire {
                        domain: r.domain.clone(),
                        username: r.username.clone(),
                        realm: r.realm.clone(),
                    }),
                }
            }),
            outbound_leading_plus_enabled: t.outbound_leading_plus_enabled.clone(),
            tech_prefix: t.tech_prefix.clone(),
            sip_diversion_header: t.sip_diversion_header.clone(),
            ..Default::default()
        }
    }
}

impl Resource for SipTrunk {
    const KIND: &'static str = "sip_trunk";
    const COLLECTION: &'static str = "credential";
    const MUTABILITY: Mutability = Mutability::InPlace;
    type Response = SipTrunkWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        Payload::json(Self::KIND, &SipTrunkWire::from(self))
    }

    fn applied(&self) -> Option<&serde_json::Value> {
        self.applied.as_ref()
    }

    fn set_applied(&mut self, payload: Option<serde_json::Value>) {
        self.applied = payload;
    }

    fn apply_response(&mut self, w: SipTrunkWire) {
        let local_password = self
            .outbound_authentication_plan
            .take()
            .map(|p| p.auth_password)
            .unwrap_or_default();

        self.id = w.id;
        self.org_id = w.org_id;
        self.created_at = w.created_at;
        self.updated_at = w.updated_at;
        self.provider = w.provider;
        self.name = w.name;
        self.gateways = w
            .gateways
            .unwrap_or_default()
            .into_iter()
            .map(|g| Gateway { ip: g.ip })
            .collect();
        self.outbound_authentication_plan = w.outbound_authentication_plan.map(|p| {
            OutboundAuthenticationPlan {
                auth_username: p.auth_username,
                auth_password: local_password,
                sip_register_plan: p.sip_register_plan.map(|r| SipRegisterPlan {
                    domain: r.domain,
                    username: r.username,
                    realm: r.realm,
                }),
            }
        });
        self.outbound_leading_plus_enabled = w.outbound_leading_plus_enabled;
        self.tech_prefix = w.tech_prefix;
        self.sip_diversion_header = w.sip_diversion_header;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Action, ApplyResult, Lifecycle, Method, MockClient};
    use serde_json::json;

    fn trunk() -> SipTrunk {
        SipTrunk {
            name: "office".into(),
            gateways: vec![
                Gateway {
                    ip: "203.0.113.10".into(),
                },
                Gateway {
                    ip: "203.0.113.11".into(),
                },
            ],
            outbound_authentication_plan: Some(OutboundAuthenticationPlan {
                auth_username: "pbx".into(),
                auth_password: "hunter2".into(),
                sip_register_plan: None,
            }),
            ..Default::default()
        }
    }

    fn echoed(id: &str, name: &str) -> String {
        json!({
            "id": id,
            "provider": "byo-sip-trunk",
            "name": name,
            "gateways": [{ "ip": "203.0.113.10" }, { "ip": "203.0.113.11" }],
            "outboundAuthenticationPlan": { "authUsername": "pbx" },
            "orgId": "org-1"
        })
        .to_string()
    }

    #[test]
    fn test_request_defaults_provider_and_keeps_gateway_order() {
        let body = SipTrunk::to_request(&trunk()).unwrap().as_json().cloned().unwrap();
        assert_eq!(body["provider"], DEFAULT_PROVIDER);
        assert_eq!(body["gateways"][0]["ip"], "203.0.113.10");
        assert_eq!(body["gateways"][1]["ip"], "203.0.113.11");
        assert_eq!(body["outboundAuthenticationPlan"]["authPassword"], "hunter2");
        assert!(body.get("orgId").is_none());
        assert!(body.get("techPrefix").is_none());
    }

    #[test]
    fn test_update_in_place_keeps_identifier() {
        let mock = MockClient::new();
        mock.expect(Method::Post, "credential", 201, &echoed("c-1", "office"));
        mock.expect(Method::Patch, "credential/c-1", 200, &echoed("c-1", "hq"));

        let lifecycle = Lifecycle::new(&mock);
        let created = lifecycle.create(&trunk()).unwrap();
        assert_eq!(created.org_id.as_deref(), Some("org-1"));

        let mut desired = trunk();
        desired.name = "hq".into();
        assert_eq!(
            declarative::plan(Some(&created), &desired).unwrap(),
            Action::UpdateInPlace
        );

        let updated = lifecycle.update(&created, &desired).unwrap();
        assert_eq!(updated.id, "c-1");
        assert_eq!(updated.name.as_deref(), Some("hq"));

        let patch = &mock.calls()[1];
        assert_eq!(patch.json()["name"], "hq");
    }

    #[test]
    fn test_password_is_kept_from_declared_model() {
        let mock = MockClient::new();
        mock.expect(Method::Post, "credential", 201, &echoed("c-1", "office"));

        let created = Lifecycle::new(&mock).create(&trunk()).unwrap();
        let plan = created.outbound_authentication_plan.clone().unwrap();
        assert_eq!(plan.auth_password.as_deref(), Some("hunter2"));
        assert_eq!(declarative::plan(Some(&created), &trunk()).unwrap(), Action::NoChange);
    }

    #[test]
    fn test_absent_auth_plan_is_cleared() {
        let mut observed = trunk();
        observed.id = "c-1".into();
        observed.outbound_authentication_plan.as_mut().unwrap().sip_register_plan =
            Some(SipRegisterPlan {
                domain: "sip.example.com".into(),
                ..Default::default()
            });

        let wire: SipTrunkWire =
            serde_json::from_value(json!({ "id": "c-1", "name": "office", "gateways": [] }))
                .unwrap();
        observed.apply_response(wire);

        assert_eq!(observed.outbound_authentication_plan, None);
        assert!(observed.gateways.is_empty());
        assert_eq!(observed.provider, Value::Unset);
    }

    #[test]
    fn test_patch_clears_removed_values() {
        let mut declared = trunk();
        declared.tech_prefix = "99".into();

        let mut created_body: serde_json::Value =
            serde_json::from_str(&echoed("c-1", "office")).unwrap();
        created_body["techPrefix"] = json!("99");

        let mock = MockClient::new();
        mock.expect(Method::Post, "credential", 201, &created_body.to_string());
        mock.expect(
            Method::Patch,
            "credential/c-1",
            200,
            r#"{"id":"c-1","provider":"byo-sip-trunk","name":"office"}"#,
        );

        let lifecycle = Lifecycle::new(&mock);
        let created = lifecycle.create(&declared).unwrap();
        assert_eq!(declarative::plan(Some(&created), &declared).unwrap(), Action::NoChange);

        let desired = SipTrunk {
            name: "office".into(),
            ..Default::default()
        };
        let (updated, result) = lifecycle.reconcile(Some(&created), &desired).unwrap();
        assert_eq!(result, ApplyResult::Updated);

        let body = mock.calls()[1].json();
        assert_eq!(body.get("techPrefix"), Some(&serde_json::Value::Null));
        assert_eq!(body.get("outboundAuthenticationPlan"), Some(&serde_json::Value::Null));
        assert_eq!(body["gateways"], json!([]));
        assert_eq!(body["provider"], DEFAULT_PROVIDER);

        assert!(updated.gateways.is_empty());
        assert_eq!(declarative::plan(Some(&updated), &desired).unwrap(), Action::NoChange);
    }

    #[test]
    fn test_patch_of_deleted_trunk_is_not_found() {
        let mock = MockClient::new();
        mock.expect(Method::Patch, "credential/c-9", 404, "");

        let mut previous = trunk();
        previous.id = "c-9".into();
        let err = Lifecycle::new(&mock).update(&previous, &trunk()).unwrap_err();
        assert!(err.is_not_found());
    }
}
