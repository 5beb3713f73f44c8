//! Conversation store for the Conversations domain
//!
//! The store is an append-only log: it can add a message and read the most
//! recent ones, nothing else.

pub mod memory;
pub mod messages;

use crate::domain::entities::{Message, NewMessage};
use chatline_common::Result;

pub use memory::InMemoryMessageStore;
pub use messages::MessageRepository;

/// Default page size for [`MessageStore::recent`]
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Durable, append-only conversation log
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message, assigning its id and timestamp.
    ///
    /// Each call is a single atomic insert; there is no retry.
    async fn append(&self, message: &NewMessage) -> Result<Message>;

    /// Up to `limit` most recent messages, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<Message>>;
}
