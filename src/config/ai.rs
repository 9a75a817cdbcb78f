//! AI provider configuration
//!
//! The reply generator talks to an OpenAI-compatible chat-completions API.
//! Which provider backs it (Groq, OpenRouter or OpenAI) is fixed at startup
//! from configuration; call sites never branch on the provider again.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Groq API key
    pub groq_api_key: Option<String>,

    /// OpenRouter API key
    pub openrouter_api_key: Option<String>,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Which provider to use for reply generation
    #[serde(default)]
    pub provider: AiProvider,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Groq,
    OpenRouter,
    OpenAI,
}

impl AiProvider {
    /// Base URL of the provider's OpenAI-compatible API
    pub fn base_url(&self) -> &'static str {
        match self {
            AiProvider::Groq => "https://api.groq.com/openai/v1",
            AiProvider::OpenRouter => "https://openrouter.ai/api/v1",
            AiProvider::OpenAI => "https://api.openai.com/v1",
        }
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key for the selected provider, if configured
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider {
            AiProvider::Groq => &self.groq_api_key,
            AiProvider::OpenRouter => &self.openrouter_api_key,
            AiProvider::OpenAI => &self.openai_api_key,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_none() {
            return Err(match self.provider {
                AiProvider::Groq => ValidationError::MissingRequired("AI__GROQ_API_KEY"),
                AiProvider::OpenRouter => {
                    ValidationError::MissingRequired("AI__OPENROUTER_API_KEY")
                }
                AiProvider::OpenAI => ValidationError::MissingRequired("AI__OPENAI_API_KEY"),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            openrouter_api_key: None,
            openai_api_key: None,
            provider: AiProvider::default(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout() -> u64 {
    30
}
