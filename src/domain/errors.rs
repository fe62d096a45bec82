use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Value must be non-negative")]
    MustBeNonNegative,

    #[error("Value must be finite")]
    MustBeFinite,
}

impl From<ValidationError> for String {
    fn from(error: ValidationError) -> Self {
        error.to_string()
    }
}

/// Reasons an append is refused. The store is left unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    #[error("company name is required")]
    MissingCompany,

    #[error("price '{text}' rejected: {source}")]
    InvalidPrice {
        text: String,
        source: ValidationError,
    },

    #[error("quantity '{text}' rejected: {source}")]
    InvalidQuantity {
        text: String,
        source: ValidationError,
    },

    #[error("total value of price * quantity rejected: {0}")]
    InvalidTotal(ValidationError),
}

/// Backing-file failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} does not contain a valid record array: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuoteError {
    #[error("ticker not specified")]
    TickerNotSpecified,

    #[error("quote provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    Api(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
