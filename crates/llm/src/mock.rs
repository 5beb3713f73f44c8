//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"` and by the offline
//! mode of the completion orchestrator. Never touches the network and answers
//! with a reply derived only from the last message.

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

const MOCK_MODEL: &str = "mock-model";

/// Deterministic placeholder reply for a given user message
pub fn placeholder_reply(content: &str) -> String {
    format!(
        "I received your message: '{}'. This is a test response.",
        content
    )
}

/// Mock LLM service for testing
#[derive(Debug, Clone, Default)]
pub struct MockLlmService;

impl MockLlmService {
    /// Create a new mock LLM service
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::debug!(
            message_count = request.messages.len(),
            "Mock LLM service processing completion request"
        );

        let model = if request.model.is_empty() {
            MOCK_MODEL.to_string()
        } else {
            request.model
        };

        let last_message = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("empty");

        Ok(CompletionResponse {
            content: placeholder_reply(last_message),
            model,
            finish_reason: "stop".to_string(),
        })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
