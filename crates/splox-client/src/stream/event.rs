use serde::Deserialize;

use crate::models::{ExecutionStatus, NodeExecution, WorkflowRequest};

/// Payload value the server sends as a heartbeat.
pub const KEEPALIVE: &str = "keepalive";

/// Structured fields decoded from one `data:` payload.
///
/// Execution listeners mostly see `workflow_request` / `node_execution`;
/// chat listeners see the flat streaming fields keyed by `type`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventFields {
    pub workflow_request: Option<WorkflowRequest>,
    pub node_execution: Option<NodeExecution>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub iteration: Option<i64>,
    pub run_id: Option<String>,
    /// Streamed text chunk.
    pub delta: Option<String>,
    pub reasoning_delta: Option<String>,
    pub reasoning_type: Option<String>,
    pub tool_call_id: Option<String>,
    pub tool_name: Option<String>,
    pub tool_args_delta: Option<String>,
    pub args: Option<serde_json::Value>,
    pub result: Option<serde_json::Value>,
    pub approved: Option<bool>,
    pub text: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// How a payload was classified.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// Heartbeat; carries nothing else.
    Keepalive,
    /// Payload decoded as JSON.
    Decoded(Box<EventFields>),
    /// Payload did not decode; only the raw text is available.
    RawOnly,
}

/// Chat event discriminator carried in the `type` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEventKind {
    TextDelta,
    ReasoningDelta,
    ToolCallStart,
    ToolCallDelta,
    ToolStart,
    ToolComplete,
    ToolError,
    ToolApprovalRequest,
    ToolApprovalResponse,
    /// Voice transcript.
    UserMessage,
    /// Iteration complete.
    Done,
    /// User stopped the workflow.
    Stopped,
    Error,
    Other(String),
}

impl ChatEventKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "text_delta" => Self::TextDelta,
            "reasoning_delta" => Self::ReasoningDelta,
            "tool_call_start" => Self::ToolCallStart,
            "tool_call_delta" => Self::ToolCallDelta,
            "tool_start" => Self::ToolStart,
            "tool_complete" => Self::ToolComplete,
            "tool_error" => Self::ToolError,
            "tool_approval_request" => Self::ToolApprovalRequest,
            "tool_approval_response" => Self::ToolApprovalResponse,
            "user_message" => Self::UserMessage,
            "done" => Self::Done,
            "stopped" => Self::Stopped,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One event read from a listen stream. The raw payload is always retained.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamEvent {
    payload: EventPayload,
    raw: String,
}

impl StreamEvent {
    /// Classifies a `data:` payload (prefix already stripped).
    ///
    /// Payloads that fail to decode become [`EventPayload::RawOnly`] rather
    /// than an error.
    pub fn from_payload(payload: &str) -> Self {
        if payload == KEEPALIVE {
            return Self {
                payload: EventPayload::Keepalive,
                raw: payload.to_string(),
            };
        }
        let payload_kind = match serde_json::from_str::<EventFields>(payload) {
            Ok(fields) => EventPayload::Decoded(Box::new(fields)),
            Err(_) => EventPayload::RawOnly,
        };
        Self {
            payload: payload_kind,
            raw: payload.to_string(),
        }
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The payload exactly as received (after prefix and whitespace stripping).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_keepalive(&self) -> bool {
        matches!(self.payload, EventPayload::Keepalive)
    }

    pub fn is_raw_only(&self) -> bool {
        matches!(self.payload, EventPayload::RawOnly)
    }

    pub fn fields(&self) -> Option<&EventFields> {
        match &self.payload {
            EventPayload::Decoded(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn workflow_request(&self) -> Option<&WorkflowRequest> {
        self.fields().and_then(|f| f.workflow_request.as_ref())
    }

    pub fn node_execution(&self) -> Option<&NodeExecution> {
        self.fields().and_then(|f| f.node_execution.as_ref())
    }

    pub fn kind(&self) -> Option<ChatEventKind> {
        self.fields()
            .and_then(|f| f.event_type.as_deref())
            .map(ChatEventKind::parse)
    }

    /// Returns the workflow request status when it is terminal.
    pub fn terminal_status(&self) -> Option<&ExecutionStatus> {
        self.workflow_request()
            .map(|request| &request.status)
            .filter(|status| status.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keepalive_has_no_structured_fields() {
        let event = StreamEvent::from_payload("keepalive");
        assert!(event.is_keepalive());
        assert_eq!(event.raw(), "keepalive");
        assert!(event.fields().is_none());
        assert!(event.workflow_request().is_none());
        assert!(event.kind().is_none());
    }

    #[test]
    fn invalid_json_keeps_raw_text_only() {
        let event = StreamEvent::from_payload("{invalid json}");
        assert!(event.is_raw_only());
        assert_eq!(event.raw(), "{invalid json}");
        assert!(event.fields().is_none());
        assert!(event.terminal_status().is_none());
    }

    #[test]
    fn non_object_json_is_raw_only() {
        assert!(StreamEvent::from_payload("42").is_raw_only());
        assert!(StreamEvent::from_payload("[1,2]").is_raw_only());
        assert!(StreamEvent::from_payload("KEEPALIVE").is_raw_only());
    }

    #[test]
    fn decodes_workflow_request_and_node_execution() {
        let raw = r#"{"workflow_request":{"id":"req-1","workflow_version_id":"v1","start_node_id":"n1","status":"in_progress","created_at":"2025-01-01T00:00:00Z"},"node_execution":{"id":"ne-1","workflow_request_id":"req-1","node_id":"n1","workflow_version_id":"v1","status":"completed","output_data":{"text":"Hello world"}}}"#;
        let event = StreamEvent::from_payload(raw);
        assert_eq!(event.raw(), raw);
        let request = event.workflow_request().expect("workflow_request");
        assert_eq!(request.id, "req-1");
        assert_eq!(request.status, ExecutionStatus::InProgress);
        assert!(event.terminal_status().is_none());
        let node = event.node_execution().expect("node_execution");
        assert_eq!(
            node.output_data.as_ref().and_then(|d| d.get("text")),
            Some(&serde_json::json!("Hello world"))
        );
    }

    #[test]
    fn terminal_status_is_reported() {
        let event =
            StreamEvent::from_payload(r#"{"workflow_request":{"id":"req-1","status":"stopped"}}"#);
        assert_eq!(event.terminal_status(), Some(&ExecutionStatus::Stopped));
    }

    #[test]
    fn chat_fields_decode_with_kind() {
        let event = StreamEvent::from_payload(
            r#"{"type":"tool_approval_request","tool_call_id":"tc-1","tool_name":"search","args":{"q":"rust"},"approved":null,"iteration":2}"#,
        );
        assert_eq!(event.kind(), Some(ChatEventKind::ToolApprovalRequest));
        let fields = event.fields().expect("fields");
        assert_eq!(fields.tool_call_id.as_deref(), Some("tc-1"));
        assert_eq!(fields.args, Some(serde_json::json!({"q": "rust"})));
        assert_eq!(fields.iteration, Some(2));
        assert_eq!(fields.approved, None);

        let delta = StreamEvent::from_payload(r#"{"type":"text_delta","delta":"Hel"}"#);
        assert_eq!(delta.kind(), Some(ChatEventKind::TextDelta));
        assert_eq!(delta.fields().and_then(|f| f.delta.as_deref()), Some("Hel"));
        assert_eq!(
            StreamEvent::from_payload(r#"{"type":"heartbeat_v2"}"#).kind(),
            Some(ChatEventKind::Other("heartbeat_v2".into()))
        );
    }

    #[test]
    fn null_fields_still_decode_terminal_status() {
        let event = StreamEvent::from_payload(
            r#"{"workflow_request":{"id":"req-1","status":"completed","created_at":null,"workflow_version_id":null}}"#,
        );
        assert!(!event.is_raw_only());
        assert_eq!(event.terminal_status(), Some(&ExecutionStatus::Completed));
        assert_eq!(event.workflow_request().map(|r| r.created_at.as_str()), Some(""));

        let event = StreamEvent::from_payload(r#"{"node_execution":{"id":null,"status":null}}"#);
        let node = event.node_execution().expect("node_execution");
        assert_eq!(node.status, ExecutionStatus::Other(String::new()));
        assert!(node.id.is_empty());
    }
}
