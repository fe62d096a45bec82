//! Persistence Layer
//!
//! The record list lives in one UTF-8 JSON file holding a top-level array,
//! pretty-printed with two-space indentation. Every mutation rewrites the
//! whole file.
//!
//! # File Format
//!
//! Each array element is a position record:
//! - company: Company name
//! - ticker: Optional ticker symbol, upper-cased
//! - unitPrice: Purchase price per share
//! - quantity: Number of shares
//! - totalValue: unitPrice * quantity at creation time
//! - createdAtIso: ISO-8601 creation timestamp
//! - createdAtDisplay: Same instant as "YYYY-MM-DD HH:MM:SS"
//!
//! There is no locking: exactly one writer is assumed.

pub mod repository;

pub use repository::JsonFileRepository;
