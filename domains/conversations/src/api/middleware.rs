//! Conversations domain state

use crate::domain::service::ConversationService;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub chat: ConversationService,
}

impl ConversationsState {
    pub fn new(chat: ConversationService) -> Self {
        Self { chat }
    }
}
