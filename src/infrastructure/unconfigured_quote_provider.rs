use crate::domain::errors::QuoteError;
use crate::domain::repositories::quote_provider::{QuoteProvider, QuoteResult};
use async_trait::async_trait;

/// Stand-in used when no quote API credentials are available.
pub struct UnconfiguredQuoteProvider {
    reason: String,
}

impl UnconfiguredQuoteProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl QuoteProvider for UnconfiguredQuoteProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn fetch(&self, _prompt: &str) -> QuoteResult<String> {
        Err(QuoteError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_reports_not_configured() {
        let provider = UnconfiguredQuoteProvider::new("PERPLEXITY_API_KEY not set");
        let result = provider.fetch("anything").await;
        assert_eq!(
            result,
            Err(QuoteError::NotConfigured("PERPLEXITY_API_KEY not set".to_string()))
        );
    }
}
