use std::sync::Arc;

use crate::errors::SploxError;
use crate::models::{Chat, ChatHistoryParams, ChatHistoryResponse, ChatListResponse, CreateChatParams};
use crate::stream::EventStream;
use crate::transport::{Call, Query, Transport};
use crate::wait::WaitScope;

use super::validate_id;

const DEFAULT_RESOURCE_TYPE: &str = "api";

/// Chat sessions and their message history.
#[derive(Clone)]
pub struct Chats {
    transport: Arc<Transport>,
}

impl Chats {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Creates a chat session. An empty `resource_type` becomes `api`.
    pub async fn create(&self, params: &CreateChatParams) -> Result<Chat, SploxError> {
        validate_id("resource_id", &params.resource_id)?;
        let mut body = params.clone();
        if body.resource_type.trim().is_empty() {
            body.resource_type = DEFAULT_RESOURCE_TYPE.to_string();
        }
        self.transport
            .send_json(Call::post("/chats").json(&body))
            .await
    }

    pub async fn get(&self, chat_id: &str) -> Result<Chat, SploxError> {
        validate_id("chat_id", chat_id)?;
        self.transport
            .send_json(Call::get(format!("/chats/{chat_id}")))
            .await
    }

    /// Lists the chats attached to a resource, e.g. `("api", workflow_id)`.
    pub async fn list_for_resource(
        &self,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<ChatListResponse, SploxError> {
        validate_id("resource_type", resource_type)?;
        validate_id("resource_id", resource_id)?;
        self.transport
            .send_json(Call::get(format!("/chats/{resource_type}/{resource_id}")))
            .await
    }

    /// Opens the live stream of a chat's internal messages.
    pub async fn listen(&self, chat_id: &str, scope: WaitScope) -> Result<EventStream, SploxError> {
        validate_id("chat_id", chat_id)?;
        self.transport
            .open_stream(&format!("/chat-internal-messages/{chat_id}/listen"), scope)
            .await
    }

    pub async fn delete(&self, chat_id: &str) -> Result<(), SploxError> {
        validate_id("chat_id", chat_id)?;
        self.transport
            .send_unit(Call::delete(format!("/chats/{chat_id}")))
            .await
    }

    /// Pages backwards through a chat's messages.
    pub async fn history(
        &self,
        chat_id: &str,
        params: &ChatHistoryParams,
    ) -> Result<ChatHistoryResponse, SploxError> {
        validate_id("chat_id", chat_id)?;
        let query = Query::new()
            .positive("limit", params.limit)
            .text("before", params.before.as_deref());
        self.transport
            .send_json(Call::get(format!("/chat-history/{chat_id}/paginated")).query(query))
            .await
    }

    /// Deletes every message of a chat.
    pub async fn delete_history(&self, chat_id: &str) -> Result<(), SploxError> {
        validate_id("chat_id", chat_id)?;
        self.transport
            .send_unit(Call::delete(format!("/chat-history/{chat_id}")))
            .await
    }
}
