//! Domain entities for the Conversations domain
//!
//! The conversation log holds a single entity, [`Message`]. Messages are
//! created once by the store and never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatline_common::{Error, Result};

/// Maximum user message length, in characters
pub const MAX_CONTENT_LENGTH: usize = 1000;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<MessageRole> for chatline_llm::LlmRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => chatline_llm::LlmRole::User,
            MessageRole::Assistant => chatline_llm::LlmRole::Assistant,
        }
    }
}

/// Persisted message, as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub role: MessageRole,
    pub created_at: DateTime<Utc>,
}

/// A validated message that has not been stored yet.
///
/// The store assigns `id` and `created_at` on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    content: String,
    role: MessageRole,
}

impl NewMessage {
    /// Create a user message from raw input.
    ///
    /// Surrounding whitespace is trimmed; the trimmed text must be non-empty
    /// and at most [`MAX_CONTENT_LENGTH`] characters.
    pub fn user(raw: &str) -> Result<Self> {
        let content = raw.trim();
        Self::validate_content(content)?;

        let length = content.chars().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(Error::Validation(format!(
                "Message content must be at most {} characters (got {})",
                MAX_CONTENT_LENGTH, length
            )));
        }

        Ok(NewMessage {
            content: content.to_string(),
            role: MessageRole::User,
        })
    }

    /// Create an assistant message from a completion reply.
    ///
    /// Replies longer than [`MAX_CONTENT_LENGTH`] characters are cut at that
    /// many characters.
    pub fn assistant(mut content: String) -> Result<Self> {
        if let Some((cut, _)) = content.char_indices().nth(MAX_CONTENT_LENGTH) {
            tracing::debug!(
                reply_chars = content.chars().count(),
                "Truncating assistant reply to the content limit"
            );
            content.truncate(cut);
        }

        Self::validate_content(&content)?;

        Ok(NewMessage {
            content,
            role: MessageRole::Assistant,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Validate message content (CHECK (length(btrim(content)) > 0))
    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        Ok(())
    }
}
