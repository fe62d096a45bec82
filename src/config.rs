use crate::infrastructure::perplexity_client::{DEFAULT_MODEL, PERPLEXITY_API_BASE};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "portfolio.json";
pub const DEFAULT_QUOTE_TIMEOUT_SECONDS: u64 = 60;
const MAX_QUOTE_TIMEOUT_SECONDS: u64 = 300;

/// Runtime configuration for the tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub data_file: PathBuf,
    pub quote_model: String,
    pub quote_api_base: String,
    pub quote_api_key: Option<String>, // None disables live quotes
    pub quote_timeout_seconds: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            quote_model: DEFAULT_MODEL.to_string(),
            quote_api_base: PERPLEXITY_API_BASE.to_string(),
            quote_api_key: None,
            quote_timeout_seconds: DEFAULT_QUOTE_TIMEOUT_SECONDS,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> TrackerConfig {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> TrackerConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = TrackerConfig::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(path) = get("PORTFOLIO_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }

        if let Some(model) = get("QUOTE_MODEL") {
            config.quote_model = model;
        }

        if let Some(base) = get("PERPLEXITY_API_BASE") {
            config.quote_api_base = base.trim_end_matches('/').to_string();
        }

        config.quote_api_key = get("PERPLEXITY_API_KEY");

        if let Some(timeout) = get("QUOTE_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(value) if (1..=MAX_QUOTE_TIMEOUT_SECONDS).contains(&value) => {
                    config.quote_timeout_seconds = value;
                }
                Ok(value) => {
                    tracing::warn!(
                        "Invalid QUOTE_TIMEOUT_SECONDS value: {} (must be between 1 and {}), using default: {}",
                        value,
                        MAX_QUOTE_TIMEOUT_SECONDS,
                        config.quote_timeout_seconds
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse QUOTE_TIMEOUT_SECONDS '{}': {}, using default: {}",
                        timeout,
                        e,
                        config.quote_timeout_seconds
                    );
                }
            }
        }

        config
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, data_file: Option<PathBuf>, model: Option<String>) -> Self {
        if let Some(path) = data_file {
            self.data_file = path;
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.quote_model = model.trim().to_string();
        }
        self
    }

    pub fn quotes_enabled(&self) -> bool {
        self.quote_api_key.is_some()
    }
}
