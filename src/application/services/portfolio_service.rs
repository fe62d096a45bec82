//! Portfolio Service
//!
//! Explicit application state for the record store. The state owns the
//! ordered record list and its collaborators (backing-file repository and
//! quote provider) and is passed by reference to every operation; nothing
//! lives in a global.

use crate::domain::entities::position::PositionRecord;
use crate::domain::errors::{QuoteError, RecordError, StoreError};
use crate::domain::repositories::position_repository::PositionRepository;
use crate::domain::repositories::quote_provider::{quote_prompt, QuoteProvider};
use crate::domain::services::csv_export;
use crate::domain::services::display::{format_for_display, DisplayRow};
use crate::domain::services::portfolio_stats::{self, PortfolioStats};
use crate::domain::services::validation;
use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::quantity::Quantity;
use crate::domain::errors::ExportError;
use chrono::Local;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of a successful append or delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub record: PositionRecord,
    /// False when the in-memory change could not be written to the backing file.
    pub persisted: bool,
}

pub struct Portfolio {
    records: Vec<PositionRecord>,
    repository: Box<dyn PositionRepository>,
    quotes: Arc<dyn QuoteProvider>,
    load_error: Option<String>,
}

impl Portfolio {
    /// Build the state and load the backing file.
    ///
    /// A missing file gives an empty list. A corrupt or unreadable file also
    /// gives an empty list, with the reason kept in [`Portfolio::load_error`].
    pub fn open(repository: Box<dyn PositionRepository>, quotes: Arc<dyn QuoteProvider>) -> Self {
        let mut portfolio = Self {
            records: Vec::new(),
            repository,
            quotes,
            load_error: None,
        };
        portfolio.reload();
        portfolio
    }

    /// Re-read the backing file, bypassing the repository cache.
    pub fn reload(&mut self) {
        self.repository.invalidate();
        self.records = self.load();
    }

    /// Read the backing file, degrading any failure to an empty list.
    pub fn load(&mut self) -> Vec<PositionRecord> {
        match self.repository.load() {
            Ok(records) => {
                self.load_error = None;
                records
            }
            Err(e) => {
                warn!(
                    "Could not load {}, starting with an empty portfolio: {}",
                    self.repository.location(),
                    e
                );
                self.load_error = Some(e.to_string());
                Vec::new()
            }
        }
    }

    /// Write the full record list to the backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        self.repository.save(&self.records).map_err(|e| {
            error!("Failed to save portfolio to {}: {}", self.repository.location(), e);
            e
        })
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn location(&self) -> String {
        self.repository.location()
    }

    pub fn quote_provider_name(&self) -> &str {
        self.quotes.name()
    }

    pub fn validate(&self, company: &str, ticker: &str, price_text: &str, quantity_text: &str) -> Vec<String> {
        validation::validate(company, ticker, price_text, quantity_text)
    }

    /// Parse the form texts, append a new record and persist the list.
    ///
    /// Non-numeric price or quantity text is refused even when `validate`
    /// was never called; the list is then left unchanged.
    pub fn append(
        &mut self,
        company: &str,
        ticker: &str,
        price_text: &str,
        quantity_text: &str,
    ) -> Result<Mutation, RecordError> {
        let price = Price::parse(price_text).map_err(|source| RecordError::InvalidPrice {
            text: price_text.to_string(),
            source,
        })?;
        let quantity = Quantity::parse(quantity_text).map_err(|source| RecordError::InvalidQuantity {
            text: quantity_text.to_string(),
            source,
        })?;

        let record = PositionRecord::new(company, ticker, price, quantity, Local::now())?;
        self.records.push(record.clone());
        info!(
            "Added {} ({}) x{} @ {}",
            record.company_name().unwrap_or_default(),
            record.ticker_symbol().unwrap_or("-"),
            quantity.value(),
            price.value()
        );

        let persisted = self.save().is_ok();
        Ok(Mutation { record, persisted })
    }

    /// Remove the record at a 0-based index. `None` means "not found".
    pub fn delete_at(&mut self, index: usize) -> Option<Mutation> {
        if index >= self.records.len() {
            debug!(
                "Delete index {} out of range ({} records)",
                index,
                self.records.len()
            );
            return None;
        }

        let record = self.records.remove(index);
        info!(
            "Removed {} at index {}",
            record.company_name().unwrap_or("<unnamed>"),
            index
        );

        let persisted = self.save().is_ok();
        Some(Mutation { record, persisted })
    }

    pub fn aggregate(&self) -> PortfolioStats {
        portfolio_stats::aggregate(&self.records)
    }

    pub fn find_by_ticker(&self, ticker: &str) -> Vec<&PositionRecord> {
        portfolio_stats::find_by_ticker(&self.records, ticker)
    }

    /// Display rows for every record, with shares of the current total.
    pub fn rows(&self) -> Vec<DisplayRow> {
        let total = self.aggregate().total_value;
        self.records
            .iter()
            .enumerate()
            .map(|(position, record)| format_for_display(record, position, total))
            .collect()
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        csv_export::export_csv(&self.records)
    }

    pub fn preview_value(&self, price_text: &str, quantity_text: &str) -> Option<f64> {
        validation::preview_value(price_text, quantity_text)
    }

    /// Ask the quote provider about a ticker.
    ///
    /// Always returns text: the answer, or an error message when the ticker
    /// is blank, the provider is not configured or the lookup fails.
    pub async fn fetch_quote(&self, ticker: &str) -> String {
        match self.try_fetch_quote(ticker).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Quote lookup for '{}' failed: {}", ticker.trim(), e);
                e.to_string()
            }
        }
    }

    pub async fn try_fetch_quote(&self, ticker: &str) -> Result<String, QuoteError> {
        if ticker.trim().is_empty() {
            return Err(QuoteError::TickerNotSpecified);
        }
        debug!("Fetching quote for {} via {}", ticker.trim(), self.quotes.name());
        self.quotes.fetch(&quote_prompt(ticker)).await
    }
}
