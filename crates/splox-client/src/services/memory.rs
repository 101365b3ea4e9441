use std::sync::Arc;

use serde_json::{Value, json};

use crate::errors::SploxError;
use crate::models::{
    MemoryActionResponse, MemoryDeleteParams, MemoryGetParams, MemoryGetResponse,
    MemoryListParams, MemoryListResponse, MemorySummarizeParams, MemoryTarget, MemoryTrimParams,
};
use crate::transport::{Call, Query, Transport};

use super::validate_id;

/// Agent context memory: inspection and maintenance actions.
#[derive(Clone)]
pub struct Memory {
    transport: Arc<Transport>,
}

impl Memory {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists memory instances of a workflow version.
    pub async fn list(
        &self,
        workflow_version_id: &str,
        params: &MemoryListParams,
    ) -> Result<MemoryListResponse, SploxError> {
        validate_id("workflow_version_id", workflow_version_id)?;
        let query = Query::new()
            .positive("limit", params.limit)
            .text("cursor", params.cursor.as_deref());
        self.transport
            .send_json(Call::get(format!("/chat-memories/{workflow_version_id}")).query(query))
            .await
    }

    /// Pages through the messages stored for an agent node.
    pub async fn get(
        &self,
        agent_node_id: &str,
        params: &MemoryGetParams,
    ) -> Result<MemoryGetResponse, SploxError> {
        validate_id("agent_node_id", agent_node_id)?;
        let query = Query::new()
            .text("chat_id", params.chat_id.as_deref())
            .positive("limit", params.limit)
            .text("cursor", params.cursor.as_deref());
        self.transport
            .send_json(Call::get(format!("/chat-memory/{agent_node_id}")).query(query))
            .await
    }

    /// Replaces older messages with a generated summary.
    pub async fn summarize(
        &self,
        agent_node_id: &str,
        params: &MemorySummarizeParams,
    ) -> Result<MemoryActionResponse, SploxError> {
        let mut body = action_body("summarize", &params.target);
        if let Some(n) = params.keep_last_n {
            body["keep_last_n"] = json!(n);
        }
        if let Some(prompt) = params.summarize_prompt.as_deref().filter(|p| !p.is_empty()) {
            body["summarize_prompt"] = json!(prompt);
        }
        self.action(agent_node_id, &body).await
    }

    /// Drops the oldest messages until at most `max_messages` remain.
    pub async fn trim(
        &self,
        agent_node_id: &str,
        params: &MemoryTrimParams,
    ) -> Result<MemoryActionResponse, SploxError> {
        let mut body = action_body("trim", &params.target);
        if let Some(max) = params.max_messages {
            body["max_messages"] = json!(max);
        }
        self.action(agent_node_id, &body).await
    }

    pub async fn clear(
        &self,
        agent_node_id: &str,
        target: &MemoryTarget,
    ) -> Result<MemoryActionResponse, SploxError> {
        self.action(agent_node_id, &action_body("clear", target)).await
    }

    /// Returns every stored message of a memory instance.
    pub async fn export(
        &self,
        agent_node_id: &str,
        target: &MemoryTarget,
    ) -> Result<MemoryActionResponse, SploxError> {
        self.action(agent_node_id, &action_body("export", target)).await
    }

    /// Deletes a memory instance entirely.
    pub async fn delete(
        &self,
        context_memory_id: &str,
        params: &MemoryDeleteParams,
    ) -> Result<(), SploxError> {
        validate_id("context_memory_id", context_memory_id)?;
        let body = json!({
            "memory_node_id": params.memory_node_id,
            "workflow_version_id": params.workflow_version_id,
        });
        self.transport
            .send_unit(Call::delete(format!("/chat-memories/{context_memory_id}")).json(&body))
            .await
    }

    async fn action(&self, agent_node_id: &str, body: &Value) -> Result<MemoryActionResponse, SploxError> {
        validate_id("agent_node_id", agent_node_id)?;
        self.transport
            .send_json(Call::post(format!("/chat-memory/{agent_node_id}/actions")).json(body))
            .await
    }
}

fn action_body(action: &str, target: &MemoryTarget) -> Value {
    json!({
        "action": action,
        "context_memory_id": target.context_memory_id,
        "workflow_version_id": target.workflow_version_id,
    })
}
