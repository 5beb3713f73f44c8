//! Conversations domain: message log, completion orchestration, chat API

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Message, MessageRole, NewMessage, MAX_CONTENT_LENGTH};
pub use domain::orchestrator::{fallback_reply, CompletionOrchestrator};
pub use domain::service::{ConversationService, TurnOutcome};

// Re-export repository types
pub use repository::{InMemoryMessageStore, MessageRepository, MessageStore};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
