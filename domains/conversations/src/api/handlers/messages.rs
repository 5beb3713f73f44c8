//! Message API handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use chatline_common::{HistoryQuery, Result, ValidatedJson, ValidatedQuery};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::entities::{Message, MessageRole};

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message content; trimmed and length-checked by the pipeline
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub content: String,
    pub role: MessageRole,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            content: m.content,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// Response for send message (includes both user and assistant messages)
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    #[serde(rename = "userMessage")]
    pub user_message: MessageResponse,
    #[serde(rename = "botResponse")]
    pub bot_response: MessageResponse,
}

/// Send a message and receive the assistant's reply
pub async fn send_message(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>)> {
    let outcome = state.chat.send_turn(&req.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            user_message: outcome.user_message.into(),
            bot_response: outcome.assistant_message.into(),
        }),
    ))
}

/// List the most recent messages, newest first
pub async fn list_messages(
    State(state): State<ConversationsState>,
    ValidatedQuery(query): ValidatedQuery<HistoryQuery>,
) -> Result<Json<Vec<MessageResponse>>> {
    let limit = query.limit()?;

    let messages = state.chat.list_recent(limit).await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
