//! OpenAI-compatible reply generator.
//!
//! Groq, OpenRouter and OpenAI all speak the same `/chat/completions`
//! dialect, so one adapter covers all three; only the base URL, key and
//! model differ.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::booking::prompts::system_prompt;
use crate::domain::booking::MessageRole;
use crate::ports::{ReplyError, ReplyGenerator, ReplyRequest};

/// Configuration for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    api_key: Secret<String>,
    /// Model identifier, e.g. "llama-3.1-70b-versatile".
    pub model: String,
    /// Base URL up to and excluding `/chat/completions`.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion length cap.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiCompatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.1-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Reply generator backed by an OpenAI-compatible chat API.
pub struct OpenAiCompatGenerator {
    config: OpenAiCompatConfig,
    client: Client,
}

impl OpenAiCompatGenerator {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReplyError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_wire_request(&self, request: &ReplyRequest<'_>) -> ChatCompletionRequest {
        let mut messages = vec![WireMessage {
            role: "system",
            content: system_prompt(request.state, request.fields),
        }];
        for message in request.recent_messages {
            messages.push(WireMessage {
                role: match message.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                },
                content: message.content.clone(),
            });
        }
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

/// Maps a non-success HTTP status to the port's error variants.
fn error_for_status(status: u16, body: &str) -> ReplyError {
    match status {
        401 | 403 => ReplyError::AuthenticationFailed,
        429 => ReplyError::RateLimited {
            retry_after_secs: 30,
        },
        500..=599 => ReplyError::Unavailable {
            message: format!("server error {status}: {body}"),
        },
        _ => ReplyError::Network(format!("unexpected status {status}: {body}")),
    }
}

#[async_trait]
impl ReplyGenerator for OpenAiCompatGenerator {
    async fn generate_reply(&self, request: ReplyRequest<'_>) -> Result<String, ReplyError> {
        let wire_request = self.to_wire_request(&request);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReplyError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ReplyError::Network(format!("connection failed: {e}"))
                } else {
                    ReplyError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ReplyError::Parse(format!("failed to parse response: {e}")))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ReplyError::Parse("no choices in response".to_string()))?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
