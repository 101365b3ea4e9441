use serde::{Deserialize, Serialize};

use super::JsonObject;

/// One message stored in an agent node's context memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMessage {
    pub id: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_memory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_version_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A memory instance (context memory id plus agent node id).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryInstance {
    pub id: String,
    pub name: String,
    pub workflow_version_id: String,
    pub chat_id: String,
    pub memory_node_id: String,
    pub memory_node_label: String,
    pub context_size: u64,
    pub message_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryListResponse {
    pub chats: Vec<MemoryInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryListParams {
    /// 1-100, server default 20.
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryGetResponse {
    pub messages: Vec<MemoryMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub limit: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryGetParams {
    /// Context memory id (the resolved chat/session id).
    pub chat_id: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Result of a summarize, trim, clear or export action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryActionResponse {
    pub action: String,
    pub message: String,
    pub deleted_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MemoryMessage>,
    pub remaining_count: u64,
}

/// Identifies a memory instance for an action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryTarget {
    pub context_memory_id: String,
    pub workflow_version_id: String,
}

impl MemoryTarget {
    pub fn new(context_memory_id: impl Into<String>, workflow_version_id: impl Into<String>) -> Self {
        Self {
            context_memory_id: context_memory_id.into(),
            workflow_version_id: workflow_version_id.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySummarizeParams {
    pub target: MemoryTarget,
    /// Number of recent messages kept verbatim.
    pub keep_last_n: Option<u32>,
    /// Custom prompt; the agent's configured prompt is used otherwise.
    pub summarize_prompt: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryTrimParams {
    pub target: MemoryTarget,
    /// Server default 10.
    pub max_messages: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDeleteParams {
    pub memory_node_id: String,
    pub workflow_version_id: String,
}
