//! Chatline LLM Service
//!
//! Provides chat completion functionality with support for:
//! - OpenAI-compatible chat completions API for production
//! - Deterministic mock service for tests and offline development
//! - Environment-driven configuration (model, temperature, token cap, timeout)

pub mod mock;
pub mod openai;

use std::time::Duration;

use chatline_common::config::{parse_flag, parse_var};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM rate limit exceeded")]
    RateLimit,

    /// The provider answered successfully but the payload had no completion text
    #[error("LLM returned an invalid completion: {0}")]
    InvalidResponse(String),
}

/// Author of a message in the provider conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

impl LlmRole {
    /// Role name on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmRole::User => "user",
            LlmRole::Assistant => "assistant",
        }
    }
}

/// One turn of conversation history sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

/// Completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Empty string selects the service default
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Completion response
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub finish_reason: String,
}

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider (openai, mock)
    pub provider: String,
    /// Provider credential; required for the openai provider
    pub api_key: Option<String>,
    /// Override for the provider base URL
    pub base_url: Option<String>,
    pub default_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on a single provider round-trip
    pub timeout: Duration,
    pub system_prompt: Option<String>,
    /// Offline mode: never touch the network, answer with a deterministic placeholder
    pub test_mode: bool,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("system_prompt", &self.system_prompt.as_ref().map(String::len))
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            base_url: None,
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            system_prompt: None,
            test_mode: false,
        }
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables.
    ///
    /// A missing credential is not an error here: the orchestrator reports it
    /// per request so the rest of the service stays reachable.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create LLM config from an arbitrary variable source
    pub fn from_vars<F>(vars: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| vars(key).filter(|v| !v.trim().is_empty());

        let temperature: f32 = parse_var(&vars, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            anyhow::bail!("LLM_TEMPERATURE must be between 0 and 2, got {}", temperature);
        }

        let max_tokens: u32 = parse_var(&vars, "LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            anyhow::bail!("LLM_MAX_TOKENS must be at least 1");
        }

        let timeout_secs: u64 = parse_var(&vars, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            anyhow::bail!("LLM_TIMEOUT_SECS must be at least 1");
        }

        Ok(Self {
            provider: non_empty("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string()),
            api_key: non_empty("OPENAI_API_KEY"),
            base_url: non_empty("LLM_BASE_URL"),
            default_model: non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            timeout: std::time::Duration::from_secs(timeout_secs),
            system_prompt: non_empty("LLM_SYSTEM_PROMPT"),
            test_mode: parse_flag(&vars, "LLM_TEST_MODE", false)?,
        })
    }

    /// Offline configuration used by tests and local development
    pub fn offline() -> Self {
        Self {
            provider: "mock".to_string(),
            test_mode: true,
            ..Self::default()
        }
    }
}

/// LLM service trait for different implementations
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Run a single completion over the given history
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create an LlmService based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "openai" => {
                tracing::info!(model = %config.default_model, "Creating OpenAI chat completions service");
                Ok(Box::new(openai::OpenAiService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: openai, mock",
                provider
            ))),
        }
    }
}
