use std::fmt;

use serde::{Deserialize, Serialize};

use super::{JsonObject, Pagination, null_as_default};

/// Status of a workflow request, node execution, or child execution.
///
/// Unknown wire values are preserved in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ExecutionStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Stopped,
    Other(String),
}

impl ExecutionStatus {
    /// Parses a wire value. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
            Self::Other(value) => value,
        }
    }

    /// `completed`, `failed` and `stopped` are terminal; nothing else is.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl<'de> Deserialize<'de> for ExecutionStatus {
    /// `null` decodes to the empty `Other("")` status.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(Self::from)
            .unwrap_or_default())
    }
}

impl From<ExecutionStatus> for String {
    fn from(value: ExecutionStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution of a workflow version.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_version_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_node_id: String,
    pub status: ExecutionStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node_execution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_workflow_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Execution record for a single node inside a workflow request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeExecution {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_request_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub node_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_version_id: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_data: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
}

/// Sub-execution spawned by a node (for example one item of a fan-out).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildExecution {
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_request_id: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_node_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<ExecutionNode>,
}

/// Node entry of an execution tree; children nest recursively.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionNode {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub node_id: String,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_data: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_count: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub child_executions: Vec<ChildExecution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_children: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more_children: Option<bool>,
}

/// Point-in-time snapshot of a workflow request and everything it spawned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionTree {
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_request_id: String,
    pub status: ExecutionStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<ExecutionNode>,
}

impl ExecutionTree {
    /// Visits every node in the tree depth-first, including nodes of child executions.
    pub fn walk_nodes(&self) -> Vec<&ExecutionNode> {
        fn visit<'a>(nodes: &'a [ExecutionNode], out: &mut Vec<&'a ExecutionNode>) {
            for node in nodes {
                out.push(node);
                for child in &node.child_executions {
                    visit(&child.nodes, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.nodes, &mut out);
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTreeResponse {
    pub execution_tree: ExecutionTree,
}

/// File attached to a workflow run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRequestFile {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

/// Parameters for triggering a workflow execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    pub workflow_version_id: String,
    pub chat_id: String,
    pub start_node_id: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<WorkflowRequestFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_params: Option<JsonObject>,
}

impl RunParams {
    pub fn new(
        workflow_version_id: impl Into<String>,
        chat_id: impl Into<String>,
        start_node_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            workflow_version_id: workflow_version_id.into(),
            chat_id: chat_id.into(),
            start_node_id: start_node_id.into(),
            query: query.into(),
            ..Self::default()
        }
    }

    /// Attaches a file to the run.
    pub fn file(mut self, file: WorkflowRequestFile) -> Self {
        self.files.push(file);
        self
    }

    /// Sets one extra parameter passed through to the workflow.
    pub fn additional_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.additional_params
            .get_or_insert_with(JsonObject::new)
            .insert(key.into(), value);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub workflow_request_id: String,
}

/// Optional filters for execution history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryResponse {
    pub data: Vec<WorkflowRequest>,
    pub pagination: Pagination,
}
