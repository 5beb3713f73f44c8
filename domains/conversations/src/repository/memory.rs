//! In-memory conversation store
//!
//! Same ordering semantics as the Postgres repository: ids increase by one
//! per append and timestamps never go backwards. Nothing survives a restart,
//! so this is for tests and local development only.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entities::{Message, NewMessage};
use crate::repository::MessageStore;
use chatline_common::Result;

#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &NewMessage) -> Result<Message> {
        let mut messages = self.messages.lock().await;

        let (id, created_at) = match messages.last() {
            Some(last) => (last.id + 1, Utc::now().max(last.created_at)),
            None => (1, Utc::now()),
        };

        let stored = Message {
            id,
            content: message.content().to_string(),
            role: message.role(),
            created_at,
        };
        messages.push(stored.clone());

        Ok(stored)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Message>> {
        let messages = self.messages.lock().await;
        Ok(messages.iter().rev().take(limit).cloned().collect())
    }
}
