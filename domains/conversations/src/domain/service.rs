//! Send-turn pipeline and history read path
//!
//! One turn is a plain call chain: validate, append the user message, load
//! context, complete, append the reply. Nothing is kept between turns.

use std::sync::Arc;

use chatline_common::Result;

use crate::domain::entities::{Message, NewMessage};
use crate::domain::orchestrator::CompletionOrchestrator;
use crate::repository::{MessageStore, DEFAULT_RECENT_LIMIT};

/// Both messages created by one successful turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
}

#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn MessageStore>,
    orchestrator: Arc<CompletionOrchestrator>,
    context_window: usize,
}

impl ConversationService {
    /// `context_window` bounds how many recent messages are replayed to the provider
    pub fn new(
        store: Arc<dyn MessageStore>,
        orchestrator: Arc<CompletionOrchestrator>,
        context_window: usize,
    ) -> Self {
        Self {
            store,
            orchestrator,
            context_window: context_window.max(1),
        }
    }

    /// Run one user turn and return the stored user message and reply.
    ///
    /// Validation and configuration errors happen before any write. If the
    /// user message cannot be stored, the provider is never called.
    pub async fn send_turn(&self, content: &str) -> Result<TurnOutcome> {
        let input_len = content.chars().count();

        let new_message = NewMessage::user(content).inspect_err(|e| {
            tracing::info!(input_len, error = %e, "Rejected message");
        })?;

        self.orchestrator.ensure_ready()?;

        let user_message = self.store.append(&new_message).await?;

        let history = self.context_for(&user_message).await?;
        let reply = self.orchestrator.complete(&history).await?;

        let assistant_message = self.store.append(&NewMessage::assistant(reply)?).await?;

        tracing::info!(
            user_message_id = user_message.id,
            assistant_message_id = assistant_message.id,
            input_len,
            context_len = history.len(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            user_message,
            assistant_message,
        })
    }

    /// Most recent messages, newest first. `None` uses the default page size.
    pub async fn list_recent(&self, limit: Option<usize>) -> Result<Vec<Message>> {
        self.store
            .recent(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await
    }

    /// Recent history in chronological order, always ending with `latest`
    async fn context_for(&self, latest: &Message) -> Result<Vec<Message>> {
        let mut history = self.store.recent(self.context_window).await?;
        history.reverse();

        // Concurrent turns may have pushed our own message out of the window
        if !history.iter().any(|m| m.id == latest.id) {
            if history.len() >= self.context_window {
                history.remove(0);
            }
            history.push(latest.clone());
        }

        Ok(history)
    }
}
