//! Realtime client events produced from routing outcomes.
//!
//! - A directive becomes `session.update` with the new instructions and tools.
//! - A tool result becomes `conversation.item.create` carrying a
//!   `function_call_output` item.
//! - A failure becomes a `function_call_output` whose output is
//!   `{"error": "..."}`, so the model can tell the user something went wrong.
//!
//! Sending these over a socket is up to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::router::{ReconfigurationDirective, RouteFailure, RouteOutcome, ToolResultEnvelope};
use crate::tool::ToolSpec;

/// How the upstream detects the end of a user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnDetection {
    ServerVad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_detection: Option<TurnDetection>,
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConversationItem {
    #[serde(rename = "function_call_output")]
    FunctionCallOutput { call_id: String, output: String },
}

/// Events sent from the client to the realtime endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionConfig },

    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate { item: ConversationItem },
}

impl ClientEvent {
    pub fn session_update(
        directive: &ReconfigurationDirective,
        turn_detection: Option<TurnDetection>,
    ) -> Self {
        ClientEvent::SessionUpdate {
            session: SessionConfig {
                turn_detection,
                instructions: directive.instructions.clone(),
                tools: directive.tool_specs(),
            },
        }
    }

    pub fn function_call_output(envelope: &ToolResultEnvelope) -> Self {
        ClientEvent::ConversationItemCreate {
            item: ConversationItem::FunctionCallOutput {
                call_id: envelope.call_id.clone(),
                output: output_text(&envelope.output),
            },
        }
    }

    pub fn function_call_error(failure: &RouteFailure) -> Self {
        let output = serde_json::json!({ "error": failure.message });
        ClientEvent::ConversationItemCreate {
            item: ConversationItem::FunctionCallOutput {
                call_id: failure.call_id.clone(),
                output: output.to_string(),
            },
        }
    }

    pub fn from_outcome(outcome: &RouteOutcome, turn_detection: Option<TurnDetection>) -> Self {
        match outcome {
            RouteOutcome::Reconfigure(d) => Self::session_update(d, turn_detection),
            RouteOutcome::ToolResult(e) => Self::function_call_output(e),
            RouteOutcome::Failed(f) => Self::function_call_error(f),
        }
    }
}

/// Strings pass through; anything else is sent as JSON text.
fn output_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
