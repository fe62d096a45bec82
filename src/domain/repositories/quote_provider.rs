//! Quote Provider Trait
//!
//! Capability interface for the external quote lookup. One implementation
//! talks to a chat-completions API; another stands in when no credentials are
//! configured. The chosen implementation is injected into the application
//! state at startup.

use crate::domain::errors::QuoteError;
use async_trait::async_trait;

pub type QuoteResult<T> = Result<T, QuoteError>;

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Send a natural-language prompt and return the free-text answer.
    async fn fetch(&self, prompt: &str) -> QuoteResult<String>;
}

/// Prompt sent for a ticker lookup.
pub fn quote_prompt(ticker: &str) -> String {
    format!(
        "Find the current quote for {} and its share price",
        ticker.trim().to_uppercase()
    )
}
