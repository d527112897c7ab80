//! WebSocket wire protocol: the message envelope and typed client messages.
//!
//! Every server→client frame is an [`Envelope`]: `{type, data, sessionId?,
//! timestamp}` with an RFC3339 timestamp. Client→server frames use the same
//! `{type, data}` shape and deserialize into [`ClientMessage`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tracelens_core::debug::{StepCommand, VisualizationConfigPatch};
use tracelens_core::event::DebugEvent;
use tracelens_core::ids::{BreakpointId, ExecutionId, SessionId};
use tracelens_engine::BreakpointSpec;

/// Server→client message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub timestamp: DateTime<Utc>,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Envelope {
            kind: kind.into(),
            data,
            session_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Wraps a bus event, reusing its serde `{type, data}` representation.
    pub fn from_event(event: &DebugEvent) -> Self {
        let data = serde_json::to_value(event)
            .ok()
            .and_then(|mut value| value.get_mut("data").map(serde_json::Value::take))
            .unwrap_or(serde_json::Value::Null);
        Envelope::new(event.type_name(), data)
    }

    /// An `error` event delivered in-band; the connection stays open.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Envelope::new(
            "error",
            serde_json::json!({ "code": code, "message": message.into() }),
        )
    }

    pub fn to_json(&self) -> String {
        // Envelope serialization cannot fail: all fields are plain data.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Typed client→server messages. Message fields are camelCase on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// `subscribe: false` drops the subscription instead of adding one.
    #[serde(rename = "trace:subscribe", rename_all = "camelCase")]
    TraceSubscribe {
        execution_id: ExecutionId,
        #[serde(default = "default_subscribe")]
        subscribe: bool,
    },

    #[serde(rename = "breakpoint:set")]
    BreakpointSet(BreakpointSpec),

    #[serde(rename = "breakpoint:remove", rename_all = "camelCase")]
    BreakpointRemove { breakpoint_id: BreakpointId },

    #[serde(rename = "execution:step", rename_all = "camelCase")]
    ExecutionStep {
        execution_id: ExecutionId,
        command: StepCommand,
    },

    #[serde(rename = "visualization:config")]
    VisualizationConfig(VisualizationConfigPatch),

    #[serde(rename = "ping")]
    Ping,
}

fn default_subscribe() -> bool {
    true
}
