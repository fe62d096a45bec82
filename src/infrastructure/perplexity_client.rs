use crate::domain::errors::QuoteError;
use crate::domain::repositories::quote_provider::{QuoteProvider, QuoteResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Perplexity API endpoint
pub const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";
pub const DEFAULT_MODEL: &str = "sonar";

/// Perplexity connection settings
#[derive(Debug, Clone)]
pub struct PerplexityConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl PerplexityConfig {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_base: PERPLEXITY_API_BASE.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response, reduced to the fields we read
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Perplexity client for quote lookups
pub struct PerplexityClient {
    client: Client,
    config: PerplexityConfig,
}

impl PerplexityClient {
    pub fn new(config: PerplexityConfig) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QuoteError::Api(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "Perplexity client ready (model: {}, endpoint: {})",
            config.model, config.api_base
        );

        Ok(Self { client, config })
    }

    /// Send one user message and return the first answer
    pub async fn chat_completion(&self, prompt: &str) -> QuoteResult<String> {
        let url = format!("{}/chat/completions", self.config.api_base);
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("POST {} (model: {})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("User-Agent", "stockfolio/0.1.0")
            .json(&body)
            .send()
            .await
            .map_err(|e| QuoteError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Perplexity returned {}", status);
            return Err(QuoteError::Api(format!("{} - {}", status, error_text)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Api(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| QuoteError::Api("Response contained no answer".to_string()))
    }
}

#[async_trait]
impl QuoteProvider for PerplexityClient {
    fn name(&self) -> &str {
        "Perplexity"
    }

    async fn fetch(&self, prompt: &str) -> QuoteResult<String> {
        self.chat_completion(prompt).await
    }
}
