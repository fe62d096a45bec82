use crate::application::services::portfolio_service::{Mutation, Portfolio};
use crate::domain::errors::RecordError;
use tracing::debug;

/// Entry remembered after the most recent successful add.
#[derive(Debug, Clone, PartialEq)]
pub struct LastAdded {
    pub company: String,
    pub ticker: Option<String>,
}

/// Interactive session: the portfolio plus UI-only flags.
///
/// `form_generation` and `show_debug` never reach the backing file.
pub struct Session {
    pub portfolio: Portfolio,
    pub show_debug: bool,
    pub form_generation: u64,
    pub last_added: Option<LastAdded>,
}

impl Session {
    pub fn new(portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            show_debug: false,
            form_generation: 0,
            last_added: None,
        }
    }

    /// Append through the portfolio and reset the entry form on success.
    pub fn add(
        &mut self,
        company: &str,
        ticker: &str,
        price_text: &str,
        quantity_text: &str,
    ) -> Result<Mutation, RecordError> {
        let mutation = self
            .portfolio
            .append(company, ticker, price_text, quantity_text)?;

        self.last_added = Some(LastAdded {
            company: mutation
                .record
                .company_name()
                .unwrap_or_default()
                .to_uppercase(),
            ticker: mutation.record.ticker_symbol().map(str::to_uppercase),
        });
        self.form_generation += 1;
        Ok(mutation)
    }

    /// Reset the entry form and forget the last added entry.
    pub fn clear_form(&mut self) {
        self.form_generation += 1;
        self.last_added = None;
        debug!("Form reset (generation {})", self.form_generation);
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.show_debug = !self.show_debug;
        self.show_debug
    }

    /// Raw JSON array of the in-memory records.
    pub fn debug_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.portfolio.records())
    }
}
