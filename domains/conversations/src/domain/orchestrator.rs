//! Completion orchestration
//!
//! Turns the conversation history into exactly one assistant reply. A provider
//! that fails for a single call is absorbed into a fallback reply; a provider
//! that can never be reached (no credential) fails every call up front.

use std::sync::Arc;

use chatline_common::{Error, Result};
use chatline_llm::{
    mock::MockLlmService, CompletionRequest, LlmConfig, LlmError, LlmMessage, LlmService,
    LlmServiceFactory,
};

use crate::domain::entities::{Message, MessageRole, MAX_CONTENT_LENGTH};

const FALLBACK_PREFIX: &str =
    "[fallback] The assistant is unavailable right now, so this reply was generated locally. You said: '";

/// Reply substituted when the provider call fails for this turn.
///
/// The echoed message is shortened so the whole reply stays within
/// [`MAX_CONTENT_LENGTH`] characters.
pub fn fallback_reply(last_user_message: &str) -> String {
    // Prefix plus the closing quote
    let budget = MAX_CONTENT_LENGTH - FALLBACK_PREFIX.chars().count() - 1;

    if last_user_message.chars().count() <= budget {
        return format!("{}{}'", FALLBACK_PREFIX, last_user_message);
    }

    let echo: String = last_user_message.chars().take(budget - 3).collect();
    format!("{}{}...'", FALLBACK_PREFIX, echo)
}

enum Provider {
    Ready(Arc<dyn LlmService>),
    Unavailable(String),
}

/// Builds provider requests from history and applies the fallback policy
pub struct CompletionOrchestrator {
    provider: Provider,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_prompt: Option<String>,
}

impl CompletionOrchestrator {
    /// Build the orchestrator from configuration.
    ///
    /// In test mode the provider is the local mock and no credential is needed.
    /// Otherwise a provider that cannot be constructed leaves the orchestrator
    /// unavailable and every call reports a configuration error.
    pub fn from_config(config: LlmConfig) -> Self {
        let provider = if config.test_mode {
            tracing::info!("Completion orchestrator running in offline test mode");
            Provider::Ready(Arc::new(MockLlmService::new()))
        } else {
            match LlmServiceFactory::create(config.clone()) {
                Ok(service) => Provider::Ready(Arc::from(service)),
                Err(e) => {
                    tracing::warn!(error = %e, "Completion provider unavailable; sends will fail");
                    Provider::Unavailable(e.to_string())
                }
            }
        };

        Self {
            provider,
            model: config.default_model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt,
        }
    }

    /// Build the orchestrator around an existing provider
    pub fn with_service(service: Arc<dyn LlmService>, config: &LlmConfig) -> Self {
        Self {
            provider: Provider::Ready(service),
            model: config.default_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        }
    }

    /// Fail fast when no provider can ever be reached
    pub fn ensure_ready(&self) -> Result<()> {
        match &self.provider {
            Provider::Ready(_) => Ok(()),
            Provider::Unavailable(reason) => Err(Error::Configuration(reason.clone())),
        }
    }

    /// Produce one assistant reply for the given history (oldest first)
    pub async fn complete(&self, history: &[Message]) -> Result<String> {
        let service = match &self.provider {
            Provider::Ready(service) => service,
            Provider::Unavailable(reason) => return Err(Error::Configuration(reason.clone())),
        };

        if history.is_empty() {
            return Err(Error::Validation(
                "Cannot complete an empty conversation".to_string(),
            ));
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            messages: history
                .iter()
                .map(|m| LlmMessage {
                    role: m.role.into(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };

        match service.complete(request).await {
            Ok(response) => {
                tracing::debug!(
                    model = %response.model,
                    finish_reason = %response.finish_reason,
                    reply_len = response.content.len(),
                    "Completion received"
                );
                Ok(response.content)
            }
            Err(LlmError::InvalidResponse(detail)) => {
                tracing::error!(
                    error = %detail,
                    history_len = history.len(),
                    "Provider response is missing the completion"
                );
                Err(Error::InvalidProviderResponse(detail))
            }
            Err(LlmError::Configuration(detail)) => Err(Error::Configuration(detail)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    history_len = history.len(),
                    "Completion provider failed; answering with fallback reply"
                );
                let last_user = history
                    .iter()
                    .rev()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or_default();
                Ok(fallback_reply(last_user))
            }
        }
    }
}
