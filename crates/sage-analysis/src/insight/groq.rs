//! Groq narrative provider implementation.
//!
//! This module provides the [`GroqProvider`] which implements the
//! [`NarrativeProvider`] trait against the Groq chat-completions API
//! (<https://groq.com/>), an OpenAI-compatible endpoint.

use super::NarrativeProvider;
use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default Groq chat-completions endpoint.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model for insight generation.
const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default temperature for model responses.
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default max tokens for responses.
const DEFAULT_MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You are a senior data analyst AI.";

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Configuration for the Groq provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// The model to use (e.g. "openai/gpt-oss-20b").
    pub model: String,
    /// Temperature for response generation (0.0 - 2.0).
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Base URL for the API (useful for proxies or custom endpoints).
    pub base_url: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GroqConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GroqConfigBuilder {
        GroqConfigBuilder::default()
    }
}

/// Builder for [`GroqConfig`].
#[derive(Default)]
pub struct GroqConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl GroqConfigBuilder {
    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature (0.0 - 2.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set a custom base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GroqConfig {
        GroqConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Groq narrative provider for insight generation.
///
/// # Example
///
/// ```rust,ignore
/// use sage_analysis::insight::{GroqProvider, GroqConfig};
///
/// // Simple usage with defaults
/// let provider = GroqProvider::new(api_key)?;
///
/// // With custom configuration
/// let config = GroqConfig::builder()
///     .model("llama-3.3-70b-versatile")
///     .temperature(0.2)
///     .build();
/// let provider = GroqProvider::with_config(api_key, config)?;
/// ```
pub struct GroqProvider {
    api_key: String,
    config: GroqConfig,
    client: Client,
}

impl GroqProvider {
    /// Create a new Groq provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GroqConfig::default())
    }

    /// Create a new Groq provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    fn build_insight_prompt(&self, context: &Value) -> String {
        format!(
            "Analyze the following EDA results and metadata.\n\
             Generate clear business insights.\n\n\
             EDA:\n{}\n\n\
             Respond with ONLY a JSON object containing exactly these four fields:\n\
             - \"summary\": a short narrative summary (string)\n\
             - \"key_insights\": the most important findings (array of strings)\n\
             - \"risks\": risks and anomalies in the data (array of strings)\n\
             - \"recommendations\": suggested next steps (array of strings)\n\n\
             Do not add any other fields or any text outside the JSON object.",
            context
        )
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = GroqRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Groq API Error {}: {}",
                response.status(),
                response.text()?
            ));
        }

        let result: GroqResponse = response.json()?;

        let text = result
            .choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .map(|msg| msg.content.clone())
            .ok_or_else(|| anyhow!("No response content from Groq API"))?;

        Ok(text)
    }
}

impl NarrativeProvider for GroqProvider {
    fn generate_insights(&self, context: &Value) -> Result<String> {
        let prompt = self.build_insight_prompt(context);
        self.call_api(&prompt)
    }

    fn name(&self) -> &str {
        "Groq"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}
