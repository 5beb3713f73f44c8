//! OpenAI-compatible Chat Completions Implementation
//!
//! Calls `{base_url}/v1/chat/completions` with a bearer credential using the
//! reqwest HTTP client. Any server speaking the same wire format works.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmService};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<MessageBody>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    role: &'static str,
    content: String,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

/// OpenAI-compatible LLM service implementation
pub struct OpenAiService {
    client: Client,
    config: LlmConfig,
    api_key: String,
    base_url: String,
}

impl OpenAiService {
    /// Create a new OpenAI service. Fails when no credential is configured.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Configuration("OPENAI_API_KEY is required for the openai provider".to_string())
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl LlmService for OpenAiService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.config.default_model.clone()
        } else {
            request.model
        };

        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);
        let temperature = request.temperature.unwrap_or(self.config.temperature);

        let messages: Vec<MessageBody> = request
            .system_prompt
            .map(|prompt| MessageBody {
                role: "system",
                content: prompt,
            })
            .into_iter()
            .chain(request.messages.into_iter().map(|m| MessageBody {
                role: m.role.as_str(),
                content: m.content,
            }))
            .collect();

        let body = ChatCompletionRequest {
            model: model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            model = %model,
            max_tokens,
            message_count = body.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Request(format!("request timed out after {:?}", self.config.timeout))
                } else {
                    LlmError::Request(format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(LlmError::Response(format!(
                    "provider error ({}, {}): {}",
                    status,
                    error_response
                        .error
                        .error_type
                        .as_deref()
                        .unwrap_or("unknown"),
                    error_response.error.message
                )));
            }

            return Err(LlmError::Response(format!(
                "provider returned {}: {}",
                status, error_body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to read response body: {}", e)))?;

        parse_completion(&text, &model)
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}

/// Extract the first completion from a successful response body.
///
/// A body that is not JSON at all is a transport-level `Response` error. A JSON
/// body without a usable `choices[0].message.content` is `InvalidResponse`.
fn parse_completion(body: &str, requested_model: &str) -> Result<CompletionResponse, LlmError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

    let parsed: ChatCompletionResponse = serde_json::from_value(value)
        .map_err(|e| LlmError::InvalidResponse(format!("unexpected response shape: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

    let content = choice
        .message
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| {
            LlmError::InvalidResponse("first choice has no message content".to_string())
        })?;

    Ok(CompletionResponse {
        content,
        model: parsed.model.unwrap_or_else(|| requested_model.to_string()),
        finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
    })
}
