use std::sync::Arc;

use crate::errors::SploxError;
use crate::models::{EventResponse, JsonObject, SendEventParams};
use crate::transport::{Call, Transport};

use super::validate_id;

const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

/// Webhook-triggered executions. Works without an API key.
#[derive(Clone)]
pub struct Events {
    transport: Arc<Transport>,
}

impl Events {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Posts a payload to a webhook. A missing payload is sent as `{}`.
    pub async fn send(&self, params: &SendEventParams) -> Result<EventResponse, SploxError> {
        validate_id("webhook_id", &params.webhook_id)?;
        let empty = JsonObject::new();
        let payload = params.payload.as_ref().unwrap_or(&empty);
        let mut call = Call::post(format!("/events/{}", params.webhook_id)).json(payload);
        if let Some(secret) = params.secret.as_deref().filter(|s| !s.is_empty()) {
            call = call.header(WEBHOOK_SECRET_HEADER, secret);
        }
        self.transport.send_json(call).await
    }
}
