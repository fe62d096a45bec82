pub mod perplexity_client;
pub mod quote_provider_factory;
pub mod unconfigured_quote_provider;
