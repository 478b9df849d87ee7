//! Completion API client (OpenAI-compatible).
//!
//! Single-turn chat completions: one system instruction, one user message,
//! one text completion back. Every transport or service failure maps to
//! [`LlmError`]; callers decide the fallback policy.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};

/// A single-turn text-completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request one completion for a system instruction and a user message.
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String>;

    /// Identifier of the model behind this provider.
    fn model(&self) -> &str;
}

/// OpenAI-compatible chat-completion provider.
pub struct OpenAiChatProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Chat completion request format.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response format.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// API error response format.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl OpenAiChatProvider {
    /// Create a provider from configuration and a resolved API key.
    pub fn from_config(config: &LlmConfig, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(LlmError::MissingApiKey.into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiChatProvider {
    async fn complete(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens: 1000,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else if e.is_connect() {
                    LlmError::Api(format!("Connection failed: {}", e))
                } else {
                    LlmError::Api(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let result: CompletionResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Api(format!("Failed to parse response: {}", e)))?;

            result
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| LlmError::Api("Response contained no choices".to_string()).into())
        } else if status.as_u16() == 429 {
            Err(LlmError::RateLimited.into())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                Err(LlmError::Api(format!(
                    "API error ({}): {}",
                    status, error_response.error.message
                ))
                .into())
            } else {
                Err(LlmError::Api(format!("API error ({}): {}", status, error_text)).into())
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Scripted provider for tests: returns queued responses in order, or an
/// error once the queue is exhausted.
pub struct MockCompletionProvider {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String>>>,
    model: String,
}

impl MockCompletionProvider {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().collect()),
            model: "mock-model".to_string(),
        }
    }

    /// Provider that answers every call with the same text.
    pub fn always(text: &str) -> Self {
        Self {
            responses: std::sync::Mutex::new(
                std::iter::repeat_with(|| Ok(text.to_string()))
                    .take(64)
                    .collect(),
            ),
            model: "mock-model".to_string(),
        }
    }

    /// Provider that fails every call with a service error.
    pub fn failing() -> Self {
        Self::new(vec![])
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> Result<String> {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Api("mock exhausted".to_string()).into()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
