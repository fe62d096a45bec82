//! Quote Provider Factory
//!
//! Builds the quote provider once at startup from configuration. When no API
//! key is present the application still runs; quote requests then report
//! that the provider is not configured.

use crate::config::TrackerConfig;
use crate::domain::repositories::quote_provider::QuoteProvider;
use crate::infrastructure::perplexity_client::{PerplexityClient, PerplexityConfig};
use crate::infrastructure::unconfigured_quote_provider::UnconfiguredQuoteProvider;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Factory for creating quote providers
pub struct QuoteProviderFactory;

impl QuoteProviderFactory {
    pub fn from_config(config: &TrackerConfig) -> Arc<dyn QuoteProvider> {
        match Self::create_perplexity_client(config) {
            Some(client) => client,
            None => {
                let reason = if config.quotes_enabled() {
                    "Perplexity client could not be created"
                } else {
                    "PERPLEXITY_API_KEY not set"
                };
                Arc::new(UnconfiguredQuoteProvider::new(reason))
            }
        }
    }

    fn create_perplexity_client(config: &TrackerConfig) -> Option<Arc<dyn QuoteProvider>> {
        let Some(api_key) = config.quote_api_key.as_deref() else {
            warn!("✗ PERPLEXITY_API_KEY not set, live quotes disabled");
            return None;
        };

        let client_config = PerplexityConfig::new(api_key, &config.quote_model)
            .with_api_base(&config.quote_api_base)
            .with_timeout(Duration::from_secs(config.quote_timeout_seconds));

        match PerplexityClient::new(client_config) {
            Ok(client) => {
                info!("✓ Perplexity quote client created successfully");
                Some(Arc::new(client) as Arc<dyn QuoteProvider>)
            }
            Err(e) => {
                error!("✗ Failed to create Perplexity client: {}", e);
                None
            }
        }
    }
}
