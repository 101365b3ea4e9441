use std::sync::Arc;

use crate::config::ClientConfig;
use crate::errors::SploxError;
use crate::services::{Billing, Chats, Events, Memory, Workflows};
use crate::transport::Transport;

/// Handle to the API. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    transport: Arc<Transport>,
}

impl Client {
    /// Builds a client, rejecting an unusable config up front.
    pub fn new(config: ClientConfig) -> Result<Self, SploxError> {
        Ok(Self {
            transport: Arc::new(Transport::new(config)?),
        })
    }

    /// Builds a client from `SPLOX_API_KEY` and `SPLOX_BASE_URL`.
    pub fn from_env() -> Result<Self, SploxError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    pub fn workflows(&self) -> Workflows {
        Workflows::new(Arc::clone(&self.transport))
    }

    pub fn chats(&self) -> Chats {
        Chats::new(Arc::clone(&self.transport))
    }

    pub fn events(&self) -> Events {
        Events::new(Arc::clone(&self.transport))
    }

    pub fn billing(&self) -> Billing {
        Billing::new(Arc::clone(&self.transport))
    }

    pub fn memory(&self) -> Memory {
        Memory::new(Arc::clone(&self.transport))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config().base_url)
            .field("timeout", &self.config().timeout)
            .finish_non_exhaustive()
    }
}
