//! Stockfolio Library
//!
//! Core components of the stock portfolio tracker: the record store, its
//! JSON backing file and the quote-lookup collaborators.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
