use crate::domain::entities::position::PositionRecord;
use crate::domain::services::portfolio_stats::total_value_of;
use serde::Serialize;

pub const UNKNOWN_COMPANY: &str = "Unknown company";
pub const NO_TICKER: &str = "N/A";
pub const NO_TIMESTAMP: &str = "N/A";

/// Listing row for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// 1-based position in the listing.
    pub index: usize,
    pub company: String,
    pub ticker: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub position_value: f64,
    /// Share of the portfolio total, in percent.
    pub percentage: f64,
    pub added_at: String,
}

/// Project the record at store position `position` (0-based) into a listing
/// row. `portfolio_total` is the sum over all records; a non-positive total
/// yields a 0% share.
pub fn format_for_display(record: &PositionRecord, position: usize, portfolio_total: f64) -> DisplayRow {
    let position_value = total_value_of(record);
    let percentage = if portfolio_total > 0.0 {
        position_value / portfolio_total * 100.0
    } else {
        0.0
    };

    DisplayRow {
        index: position + 1,
        company: record.company_name().unwrap_or(UNKNOWN_COMPANY).to_string(),
        ticker: record.ticker_symbol().unwrap_or(NO_TICKER).to_string(),
        unit_price: record.unit_price_value().unwrap_or(0.0),
        quantity: record.quantity_value().unwrap_or(0.0),
        position_value,
        percentage,
        added_at: record.added_at().unwrap_or(NO_TIMESTAMP).to_string(),
    }
}
