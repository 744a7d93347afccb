//! Imported phone numbers.
//!
//! Two providers share the `phone-number` collection and both are
//! replace-only: a changed number is deleted and imported again.

use declarative::{Mutability, Payload, Resource, Result, Value};
use serde::{Deserialize, Serialize};

/// Provider tag for numbers imported from Twilio.
pub const TWILIO_PROVIDER: &str = "twilio";

/// Provider tag for numbers routed over a SIP trunk.
pub const SIP_TRUNK_PROVIDER: &str = "byo-phone-number";

const COLLECTION: &str = "phone-number";

// ============================================================================
// Twilio
// ============================================================================

/// Declared or observed Twilio number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioPhoneNumber {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Request payload last applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<serde_json::Value>,

    pub name: Value<String>,
    pub number: Value<String>,
    pub twilio_account_sid: Value<String>,
    /// Write-only
    pub twilio_auth_token: Value<String>,
    pub assistant_id: Value<String>,
    pub fallback_destination: Option<FallbackDestination>,

    /// Computed
    pub provider: Value<String>,
    /// Computed
    pub org_id: Value<String>,
    /// Computed
    pub created_at: Value<String>,
    /// Computed
    pub updated_at: Value<String>,
}

/// Where calls go when the assistant is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackDestination {
    #[serde(rename = "type")]
    pub kind: Value<String>,
    pub number: Value<String>,
    pub extension: Value<String>,
    pub message: Value<String>,
    pub description: Value<String>,
    pub number_e164_check_enabled: Value<bool>,
}

/// Request and response body for a Twilio import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwilioPhoneNumberWire {
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
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub number: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub twilio_account_sid: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub twilio_auth_token: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub assistant_id: Value<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_destination: Option<FallbackDestinationWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackDestinationWire {
    #[serde(rename = "type", skip_serializing_if = "Value::is_absent")]
    pub kind: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub number: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub extension: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub message: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub description: Value<String>,
    #[serde(rename = "numberE164CheckEnabled", skip_serializing_if = "Value::is_absent")]
    pub number_e164_check_enabled: Value<bool>,
}

impl From<&FallbackDestination> for FallbackDestinationWire {
    fn from(f: &FallbackDestination) -> Self {
        Self {
            kind: f.kind.clone(),
            number: f.number.clone(),
            extension: f.extension.clone(),
            message: f.message.clone(),
            description: f.description.clone(),
            number_e164_check_enabled: f.number_e164_check_enabled.clone(),
        }
    }
}

impl From<FallbackDestinationWire> for FallbackDestination {
    fn from(w: FallbackDestinationWire) -> Self {
        Self {
            kind: w.kind,
            number: w.number,
            extension: w.extension,
            message: w.message,
            description: w.description,
            number_e164_check_enabled: w.number_e164_check_enabled,
        }
    }
}

impl Resource for TwilioPhoneNumber {
    const KIND: &'static str = "twilio_phone_number";
    const COLLECTION: &'static str = COLLECTION;
    const MUTABILITY: Mutability = Mutability::ReplaceOnly;
    type Response = TwilioPhoneNumberWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        let wire = TwilioPhoneNumberWire {
            provider: TWILIO_PROVIDER.into(),
            name: self.name.clone(),
            number: self.number.clone(),
            twilio_account_sid: self.twilio_account_sid.clone(),
            twilio_auth_token: self.twilio_auth_token.clone(),
            assistant_id: self.assistant_id.clone(),
            fallback_destination: self.fallback_destination.as_ref().map(Into::into),
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

    fn apply_response(&mut self, w: TwilioPhoneNumberWire) {
        self.id = w.id;
        self.org_id = w.org_id;
        self.created_at = w.created_at;
        self.updated_at = w.updated_at;
        self.provider = w.provider;
        self.name = w.name;
        self.number = w.number;
        self.twilio_account_sid = w.twilio_account_sid;
        self.assistant_id = w.assistant_id;
        self.fallback_destination = w.fallback_destination.map(Into::into);
    }

    fn label(&self) -> String {
        let number = self.number.as_deref().unwrap_or("?");
        if self.id.is_empty() {
            format!("twilio number {number} (new)")
        } else {
            format!("twilio number {number} ({})", self.id)
        }
    }
}

// ============================================================================
// SIP trunk
// ============================================================================

/// Declared or observed number routed over a SIP trunk credential.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SipTrunkPhoneNumber {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Request payload last applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<serde_json::Value>,

    pub name: Value<String>,
    pub number: Value<String>,
    pub number_e164_check_enabled: Value<bool>,
    pub credential_id: Value<String>,

    /// Computed
    pub provider: Value<String>,
    /// Computed
    pub org_id: Value<String>,
    /// Computed
    pub created_at: Value<String>,
    /// Computed
    pub updated_at: Value<String>,
}

/// Request and response body for a SIP trunk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SipTrunkPhoneNumberWire {
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
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub number: Value<String>,
    #[serde(rename = "numberE164CheckEnabled", skip_serializing_if = "Value::is_absent")]
    pub number_e164_check_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub credential_id: Value<String>,
}

impl Resource for SipTrunkPhoneNumber {
    const KIND: &'static str = "sip_trunk_phone_number";
    const COLLECTION: &'static str = COLLECTION;
    const MUTABILITY: Mutability = Mutability::ReplaceOnly;
    type Response = SipTrunkPhoneNumberWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        let wire = SipTrunkPhoneNumberWire {
            provider: SIP_TRUNK_PROVIDER.into(),
            name: self.name.clone(),
            number: self.number.clone(),
            number_e164_check_enabled: self.number_e164_check_enabled.clone(),
            credential_id: self.credential_id.clone(),
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

    fn apply_response(&mut self, w: SipTrunkPhoneNumberWire) {
        self.id = w.id;
        self.org_id = w.org_id;
        self.created_at = w.created_at;
        self.updated_at = w.updated_at;
        self.provider = w.provider;
        self.name = w.name;
        self.number = w.number;
        self.number_e164_check_enabled = w.number_e164_check_enabled;
        self.credential_id = w.credential_id;
    }

    fn label(&self) -> String {
        let number = self.number.as_deref().unwrap_or("?");
        if self.id.is_empty() {
            format!("sip number {number} (new)")
        } else {
            format!("sip number {number} ({})", self.id)
        }
    }
}
