//! Aggregates and lookups over the ordered record list.

use crate::domain::entities::position::PositionRecord;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Portfolio-wide statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total_value: f64,
    pub position_count: usize,
    pub average_value: f64,
    pub unique_tickers: usize,
}

impl PortfolioStats {
    pub fn empty() -> Self {
        Self {
            total_value: 0.0,
            position_count: 0,
            average_value: 0.0,
            unique_tickers: 0,
        }
    }
}

/// Value of one record.
///
/// A stored total wins when present: if it reads as a number that number is
/// returned, otherwise 0.0. Without a stored total (absent or `null`) the
/// value is recomputed from price and quantity, treating missing fields as
/// zero.
pub fn total_value_of(record: &PositionRecord) -> f64 {
    match record.stored_total() {
        Some(stored) => match stored.as_f64() {
            Some(value) => {
                let recomputed = record.recomputed_value();
                if (value - recomputed).abs() > 1e-9 * value.abs().max(1.0) {
                    debug!(
                        stored = value,
                        recomputed, "Stored total differs from price * quantity"
                    );
                }
                value
            }
            None => 0.0,
        },
        None => record.recomputed_value(),
    }
}

/// Total, count, average and distinct tickers.
///
/// Tickers are compared case-insensitively, the same way
/// [`find_by_ticker`] matches them; records without a ticker are not counted.
pub fn aggregate(records: &[PositionRecord]) -> PortfolioStats {
    if records.is_empty() {
        return PortfolioStats::empty();
    }

    let total_value: f64 = records.iter().map(total_value_of).sum();
    let position_count = records.len();
    let unique_tickers = records
        .iter()
        .filter_map(|r| r.ticker_symbol())
        .map(normalize_ticker)
        .collect::<HashSet<_>>()
        .len();

    PortfolioStats {
        total_value,
        position_count,
        average_value: total_value / position_count as f64,
        unique_tickers,
    }
}

/// Records whose ticker equals `ticker`, ignoring case. A blank query
/// matches nothing.
pub fn find_by_ticker<'a>(records: &'a [PositionRecord], ticker: &str) -> Vec<&'a PositionRecord> {
    let wanted = normalize_ticker(ticker);
    if wanted.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| r.ticker_symbol().map(normalize_ticker).as_deref() == Some(wanted.as_str()))
        .collect()
}

pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}
