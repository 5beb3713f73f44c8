//! Route definitions for Conversations domain API

use axum::{routing::get, Router};

use super::handlers::messages;
use super::middleware::ConversationsState;

/// Create message routes
fn message_routes() -> Router<ConversationsState> {
    Router::new().route(
        "/v1/messages",
        get(messages::list_messages).post(messages::send_message),
    )
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new().merge(message_routes())
}
