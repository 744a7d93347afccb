//! Assistant resource.
//!
//! The assistant endpoint has no usable partial update, so any change is a
//! delete and recreate. `artifactPlan.recordingFormat` is always sent,
//! defaulting to `mp3`.

use crate::common::{
    is_empty_map, properties_from_wire, properties_to_wire, Property, PropertyWire, Server,
    ServerWire,
};
use declarative::{list_from_wire, list_to_wire, Mutability, Payload, Resource, Result, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recording format sent when none is declared.
pub const DEFAULT_RECORDING_FORMAT: &str = "mp3";

/// Declared or observed assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assistant {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Request payload last applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<serde_json::Value>,

    pub name: Value<String>,
    pub first_message: Value<String>,
    pub first_message_mode: Value<String>,
    pub voicemail_message: Value<String>,
    pub end_call_message: Value<String>,
    pub language: Value<String>,
    pub background_sound: Value<String>,
    pub forwarding_phone_number: Value<String>,

    pub hipaa_enabled: Value<bool>,
    pub background_denoising_enabled: Value<bool>,
    pub model_output_in_messages_enabled: Value<bool>,
    pub interruptions_enabled: Value<bool>,
    pub end_call_function_enabled: Value<bool>,
    pub dial_keypad_function_enabled: Value<bool>,
    pub fillers_enabled: Value<bool>,
    pub live_transcripts_enabled: Value<bool>,
    pub recording_enabled: Value<bool>,

    pub silence_timeout_seconds: Value<i64>,
    pub max_duration_seconds: Value<i64>,
    pub num_words_to_interrupt_assistant: Value<i64>,
    pub response_delay_seconds: Value<f64>,

    pub client_messages: Vec<String>,
    pub server_messages: Vec<String>,
    pub end_call_phrases: Vec<String>,
    pub keywords: Vec<String>,

    pub transcriber: Option<Transcriber>,
    pub model: Option<Model>,
    pub voice: Option<Voice>,
    pub start_speaking_plan: Option<StartSpeakingPlan>,
    pub stop_speaking_plan: Option<StopSpeakingPlan>,
    pub analysis_plan: Option<AnalysisPlan>,
    pub message_plan: Option<MessagePlan>,
    pub server: Option<Server>,
    pub artifact_plan: Option<ArtifactPlan>,

    /// Computed
    pub org_id: Value<String>,
    /// Computed
    pub parent_id: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transcriber {
    pub provider: Value<String>,
    pub model: Value<String>,
    pub language: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub provider: Value<String>,
    pub model: Value<String>,
    pub system_prompt: Value<String>,
    pub max_tokens: Value<i64>,
    pub temperature: Value<f64>,
    pub tool_ids: Vec<String>,
    pub messages: Vec<Message>,
    pub knowledge_base: Option<KnowledgeBase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub role: Value<String>,
    pub content: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    pub provider: Value<String>,
    pub top_k: Value<i64>,
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Voice {
    pub provider: Value<String>,
    pub voice_id: Value<String>,
    pub model: Value<String>,
    pub stability: Value<f64>,
    pub similarity_boost: Value<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartSpeakingPlan {
    pub wait_seconds: Value<f64>,
    pub smart_endpointing_enabled: Value<bool>,
    pub transcription_endpointing_plan: Option<TranscriptionEndpointingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionEndpointingPlan {
    pub on_punctuation_seconds: Value<f64>,
    pub on_no_punctuation_seconds: Value<f64>,
    pub on_number_seconds: Value<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopSpeakingPlan {
    pub num_words: Value<i64>,
    pub voice_seconds: Value<f64>,
    pub backoff_seconds: Value<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPlan {
    pub summary_prompt: Value<String>,
    pub structured_data_prompt: Value<String>,
    pub success_evaluation_prompt: Value<String>,
    pub success_evaluation_rubric: Value<String>,
    pub structured_data_schema: Option<StructuredDataSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredDataSchema {
    #[serde(rename = "type")]
    pub kind: Value<String>,
    pub properties: BTreeMap<String, Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagePlan {
    pub idle_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPlan {
    pub recording_format: Value<String>,
}

// ============================================================================
// Wire shapes
// ============================================================================

/// Request and response body for `assistant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantWire {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing)]
    pub org_id: Value<String>,
    #[serde(skip_serializing)]
    pub parent_id: Value<String>,

    #[serde(skip_serializing_if = "Value::is_absent")]
    pub name: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub first_message: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub first_message_mode: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub voicemail_message: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub end_call_message: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub language: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub background_sound: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub forwarding_phone_number: Value<String>,

    #[serde(skip_serializing_if = "Value::is_absent")]
    pub hipaa_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub background_denoising_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub model_output_in_messages_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub interruptions_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub end_call_function_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub dial_keypad_function_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub fillers_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub live_transcripts_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub recording_enabled: Value<bool>,

    #[serde(skip_serializing_if = "Value::is_absent")]
    pub silence_timeout_seconds: Value<i64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub max_duration_seconds: Value<i64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub num_words_to_interrupt_assistant: Value<i64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub response_delay_seconds: Value<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_messages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_messages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_call_phrases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcriber: Option<TranscriberWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_speaking_plan: Option<StartSpeakingPlanWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_speaking_plan: Option<StopSpeakingPlanWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_plan: Option<AnalysisPlanWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_plan: Option<MessagePlanWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_plan: Option<ArtifactPlanWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranscriberWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub provider: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub model: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub language: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub provider: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub model: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub system_prompt: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub max_tokens: Value<i64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub temperature: Value<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<MessageWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<KnowledgeBaseWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub role: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub content: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnowledgeBaseWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub provider: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub top_k: Value<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub provider: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub voice_id: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub model: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub stability: Value<f64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub similarity_boost: Value<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartSpeakingPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub wait_seconds: Value<f64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub smart_endpointing_enabled: Value<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_endpointing_plan: Option<TranscriptionEndpointingPlanWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranscriptionEndpointingPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub on_punctuation_seconds: Value<f64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub on_no_punctuation_seconds: Value<f64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub on_number_seconds: Value<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StopSpeakingPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub num_words: Value<i64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub voice_seconds: Value<f64>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub backoff_seconds: Value<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub summary_prompt: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub structured_data_prompt: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub success_evaluation_prompt: Value<String>,
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub success_evaluation_rubric: Value<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data_schema: Option<StructuredDataSchemaWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredDataSchemaWire {
    #[serde(rename = "type", skip_serializing_if = "Value::is_absent")]
    pub kind: Value<String>,
    #[serde(skip_serializing_if = "is_empty_map")]
    pub properties: BTreeMap<String, PropertyWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessagePlanWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_messages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtifactPlanWire {
    #[serde(skip_serializing_if = "Value::is_absent")]
    pub recording_format: Value<String>,
}

// ============================================================================
// Request mapper
// ============================================================================

impl From<&Transcriber> for TranscriberWire {
    fn from(t: &Transcriber) -> Self {
        Self {
            provider: t.provider.clone(),
            model: t.model.clone(),
            language: t.language.clone(),
        }
    }
}

impl From<&Model> for ModelWire {
    fn from(m: &Model) -> Self {
        let messages: Vec<MessageWire> = m
            .messages
            .iter()
            .map(|msg| MessageWire {
                role: msg.role.clone(),
                content: msg.content.clone(),
            })
            .collect();
        Self {
            provider: m.provider.clone(),
            model: m.model.clone(),
            system_prompt: m.system_prompt.clone(),
            max_tokens: m.max_tokens.clone(),
            temperature: m.temperature.clone(),
            tool_ids: list_to_wire(&m.tool_ids),
            messages: (!messages.is_empty()).then_some(messages),
            knowledge_base: m.knowledge_base.as_ref().map(|kb| KnowledgeBaseWire {
                provider: kb.provider.clone(),
                top_k: kb.top_k.clone(),
                file_ids: list_to_wire(&kb.file_ids),
            }),
        }
    }
}

impl From<&Voice> for VoiceWire {
    fn from(v: &Voice) -> Self {
        Self {
            provider: v.provider.clone(),
            voice_id: v.voice_id.clone(),
            model: v.model.clone(),
            stability: v.stability.clone(),
            similarity_boost: v.similarity_boost.clone(),
        }
    }
}

impl From<&StartSpeakingPlan> for StartSpeakingPlanWire {
    fn from(p: &StartSpeakingPlan) -> Self {
        Self {
            wait_seconds: p.wait_seconds.clone(),
            smart_endpointing_enabled: p.smart_endpointing_enabled.clone(),
            transcription_endpointing_plan: p.transcription_endpointing_plan.as_ref().map(|t| {
                TranscriptionEndpointingPlanWire {
                    on_punctuation_seconds: t.on_punctuation_seconds.clone(),
                    on_no_punctuation_seconds: t.on_no_punctuation_seconds.clone(),
                    on_number_seconds: t.on_number_seconds.clone(),
                }
            }),
        }
    }
}

impl From<&StopSpeakingPlan> for StopSpeakingPlanWire {
    fn from(p: &StopSpeakingPlan) -> Self {
        Self {
            num_words: p.num_words.clone(),
            voice_seconds: p.voice_seconds.clone(),
            backoff_seconds: p.backoff_seconds.clone(),
        }
    }
}

impl From<&AnalysisPlan> for AnalysisPlanWire {
    fn from(p: &AnalysisPlan) -> Self {
        Self {
            summary_prompt: p.summary_prompt.clone(),
            structured_data_prompt: p.structured_data_prompt.clone(),
            success_evaluation_prompt: p.success_evaluation_prompt.clone(),
            success_evaluation_rubric: p.success_evaluation_rubric.clone(),
            structured_data_schema: p.structured_data_schema.as_ref().map(|s| {
                StructuredDataSchemaWire {
                    kind: s.kind.clone(),
                    properties: properties_to_wire(&s.properties),
                }
            }),
        }
    }
}

impl From<&Assistant> for AssistantWire {
    fn from(a: &Assistant) -> Self {
        let recording_format = a
            .artifact_plan
            .as_ref()
            .map(|p| p.recording_format.clone())
            .unwrap_or_default()
            .or(Value::Present(DEFAULT_RECORDING_FORMAT.to_string()));

        Self {
            id: String::new(),
            org_id: Value::Unset,
            parent_id: Value::Unset,
            name: a.name.clone(),
            first_message: a.first_message.clone(),
            first_message_mode: a.first_message_mode.clone(),
            voicemail_message: a.voicemail_message.clone(),
            end_call_message: a.end_call_message.clone(),
            language: a.language.clone(),
            background_sound: a.background_sound.clone(),
            forwarding_phone_number: a.forwarding_phone_number.clone(),
            hipaa_enabled: a.hipaa_enabled.clone(),
            background_denoising_enabled: a.background_denoising_enabled.clone(),
            model_output_in_messages_enabled: a.model_output_in_messages_enabled.clone(),
            interruptions_enabled: a.interruptions_enabled.clone(),
            end_call_function_enabled: a.end_call_function_enabled.clone(),
            dial_keypad_function_enabled: a.dial_keypad_function_enabled.clone(),
            fillers_enabled: a.fillers_enabled.clone(),
            live_transcripts_enabled: a.live_transcripts_enabled.clone(),
            recording_enabled: a.recording_enabled.clone(),
            silence_timeout_seconds: a.silence_timeout_seconds.clone(),
            max_duration_seconds: a.max_duration_seconds.clone(),
            num_words_to_interrupt_assistant: a.num_words_to_interrupt_assistant.clone(),
            response_delay_seconds: a.response_delay_seconds.clone(),
            client_messages: list_to_wire(&a.client_messages),
            server_messages: list_to_wire(&a.server_messages),
            end_call_phrases: list_to_wire(&a.end_call_phrases),
            keywords: list_to_wire(&a.keywords),
            transcriber: a.transcriber.as_ref().map(Into::into),
            model: a.model.as_ref().map(Into::into),
            voice: a.voice.as_ref().map(Into::into),
            start_speaking_plan: a.start_speaking_plan.as_ref().map(Into::into),
            stop_speaking_plan: a.stop_speaking_plan.as_ref().map(Into::into),
            analysis_plan: a.analysis_plan.as_ref().map(Into::into),
            message_plan: a.message_plan.as_ref().map(|p| MessagePlanWire {
                idle_messages: list_to_wire(&p.idle_messages),
            }),
            server: a.server.as_ref().map(Into::into),
            artifact_plan: Some(ArtifactPlanWire { recording_format }),
        }
    }
}

// ============================================================================
// Response mapper
// ============================================================================

impl From<TranscriberWire> for Transcriber {
    fn from(w: TranscriberWire) -> Self {
        Self {
            provider: w.provider,
            model: w.model,
            language: w.language,
        }
    }
}

impl From<ModelWire> for Model {
    fn from(w: ModelWire) -> Self {
        Self {
            provider: w.provider,
            model: w.model,
            system_prompt: w.system_prompt,
            max_tokens: w.max_tokens,
            temperature: w.temperature,
            tool_ids: list_from_wire(w.tool_ids),
            messages: w
                .messages
                .unwrap_or_default()
                .into_iter()
                .map(|m| Message {
                    role: m.role,
                    content: m.content,
                })
                .collect(),
            knowledge_base: w.knowledge_base.map(|kb| KnowledgeBase {
                provider: kb.provider,
                top_k: kb.top_k,
                file_ids: list_from_wire(kb.file_ids),
            }),
        }
    }
}

impl From<VoiceWire> for Voice {
    fn from(w: VoiceWire) -> Self {
        Self {
            provider: w.provider,
            voice_id: w.voice_id,
            model: w.model,
            stability: w.stability,
            similarity_boost: w.similarity_boost,
        }
    }
}

impl From<StartSpeakingPlanWire> for StartSpeakingPlan {
    fn from(w: StartSpeakingPlanWire) -> Self {
        Self {
            wait_seconds: w.wait_seconds,
            smart_endpointing_enabled: w.smart_endpointing_enabled,
            transcription_endpointing_plan: w.transcription_endpointing_plan.map(|t| {
                TranscriptionEndpointingPlan {
                    on_punctuation_seconds: t.on_punctuation_seconds,
                    on_no_punctuation_seconds: t.on_no_punctuation_seconds,
                    on_number_seconds: t.on_number_seconds,
                }
            }),
        }
    }
}

impl From<StopSpeakingPlanWire> for StopSpeakingPlan {
    fn from(w: StopSpeakingPlanWire) -> Self {
        Self {
            num_words: w.num_words,
            voice_seconds: w.voice_seconds,
            backoff_seconds: w.backoff_seconds,
        }
    }
}

impl From<AnalysisPlanWire> for AnalysisPlan {
    fn from(w: AnalysisPlanWire) -> Self {
        Self {
            summary_prompt: w.summary_prompt,
            structured_data_prompt: w.structured_data_prompt,
            success_evaluation_prompt: w.success_evaluation_prompt,
            success_evaluation_rubric: w.success_evaluation_rubric,
            structured_data_schema: w.structured_data_schema.map(|s| StructuredDataSchema {
                kind: s.kind,
                properties: properties_from_wire(s.properties),
            }),
        }
    }
}

impl Resource for Assistant {
    const KIND: &'static str = "assistant";
    const COLLECTION: &'static str = "assistant";
    const MUTABILITY: Mutability = Mutability::ReplaceOnly;
    type Response = AssistantWire;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn to_request(&self) -> Result<Payload> {
        Payload::json(Self::KIND, &AssistantWire::from(self))
    }

    fn applied(&self) -> Option<&serde_json::Value> {
        self.applied.as_ref()
    }

    fn set_applied(&mut self, payload: Option<serde_json::Value>) {
        self.applied = payload;
    }

    fn apply_response(&mut self, w: AssistantWire) {
        let local_server = self.server.take();

        self.id = w.id;
        self.org_id = w.org_id;
        self.parent_id = w.parent_id;
        self.name = w.name;
        self.first_message = w.first_message;
        self.first_message_mode = w.first_message_mode;
        self.voicemail_message = w.voicemail_message;
        self.end_call_message = w.end_call_message;
        self.language = w.language;
        self.background_sound = w.background_sound;
        self.forwarding_phone_number = w.forwarding_phone_number;
        self.hipaa_enabled = w.hipaa_enabled;
        self.background_denoising_enabled = w.background_denoising_enabled;
        self.model_output_in_messages_enabled = w.model_output_in_messages_enabled;
        self.interruptions_enabled = w.interruptions_enabled;
        self.end_call_function_enabled = w.end_call_function_enabled;
        self.dial_keypad_function_enabled = w.dial_keypad_function_enabled;
        self.fillers_enabled = w.fillers_enabled;
        self.live_transcripts_enabled = w.live_transcripts_enabled;
        self.recording_enabled = w.recording_enabled;
        self.silence_timeout_seconds = w.silence_timeout_seconds;
        self.max_duration_seconds = w.max_duration_seconds;
        self.num_words_to_interrupt_assistant = w.num_words_to_interrupt_assistant;
        self.response_delay_seconds = w.response_delay_seconds;
        self.client_messages = list_from_wire(w.client_messages);
        self.server_messages = list_from_wire(w.server_messages);
        self.end_call_phrases = list_from_wire(w.end_call_phrases);
        self.keywords = list_from_wire(w.keywords);
        self.transcriber = w.transcriber.map(Into::into);
        self.model = w.model.map(Into::into);
        self.voice = w.voice.map(Into::into);
        self.start_speaking_plan = w.start_speaking_plan.map(Into::into);
        self.stop_speaking_plan = w.stop_speaking_plan.map(Into::into);
        self.analysis_plan = w.analysis_plan.map(Into::into);
        self.message_plan = w.message_plan.map(|p| MessagePlan {
            idle_messages: list_from_wire(p.idle_messages),
        });
        self.server = w.server.map(|s| Server::from_wire(s, local_server.as_ref()));
        self.artifact_plan = w.artifact_plan.map(|p| ArtifactPlan {
            recording_format: p.recording_format,
        });
    }
}
