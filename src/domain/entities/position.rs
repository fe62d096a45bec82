use crate::domain::errors::RecordError;
use crate::domain::value_objects::{amount::Amount, price::Price, quantity::Quantity, text::Text};
use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One purchased lot, exactly as it is persisted in the backing file.
///
/// Every field is optional on the wire so that hand-edited files still load;
/// records built through [`PositionRecord::new`] always carry all of them.
/// A key that is present keeps its value even when it is `null`, and keys
/// this crate does not know are kept in `extra`, so writing a loaded record
/// back reproduces it. Records are never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub company: Option<Text>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Text>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Amount>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Amount>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub total_value: Option<Amount>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub created_at_iso: Option<Text>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub created_at_display: Option<Text>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A key that is present is `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl PositionRecord {
    /// Build a new record. The ticker is trimmed and upper-cased; a blank
    /// ticker is stored as absent.
    pub fn new(
        company: &str,
        ticker: &str,
        price: Price,
        quantity: Quantity,
        created_at: DateTime<Local>,
    ) -> Result<Self, RecordError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(RecordError::MissingCompany);
        }

        let total = price
            .multiply(quantity.value())
            .map_err(RecordError::InvalidTotal)?;

        let ticker = ticker.trim();
        let ticker = if ticker.is_empty() {
            None
        } else {
            Some(Text::from(ticker.to_uppercase()))
        };

        Ok(PositionRecord {
            company: Some(Text::from(company)),
            ticker,
            unit_price: Some(Amount::from(price.value())),
            quantity: Some(Amount::from(quantity.value())),
            total_value: Some(Amount::from(total.value())),
            created_at_iso: Some(Text::from(
                created_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            )),
            created_at_display: Some(Text::from(
                created_at.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
            )),
            extra: Map::new(),
        })
    }

    /// Company name, if present and not blank.
    pub fn company_name(&self) -> Option<&str> {
        non_blank(self.company.as_ref())
    }

    /// Ticker symbol, if present and not blank.
    pub fn ticker_symbol(&self) -> Option<&str> {
        non_blank(self.ticker.as_ref())
    }

    /// Unit price as a number. Absent or null means zero; unreadable means `None`.
    pub fn unit_price_value(&self) -> Option<f64> {
        amount_or_zero(self.unit_price.as_ref())
    }

    /// Quantity as a number. Absent or null means zero; unreadable means `None`.
    pub fn quantity_value(&self) -> Option<f64> {
        amount_or_zero(self.quantity.as_ref())
    }

    /// Stored total, unless absent or null.
    pub fn stored_total(&self) -> Option<&Amount> {
        self.total_value.as_ref().filter(|v| !v.is_null())
    }

    /// `unit_price * quantity`, ignoring any stored total. Zero when either
    /// side cannot be read.
    pub fn recomputed_value(&self) -> f64 {
        match (self.unit_price_value(), self.quantity_value()) {
            (Some(price), Some(quantity)) => price * quantity,
            _ => 0.0,
        }
    }

    /// When the record was added: the display timestamp, falling back to the
    /// ISO timestamp.
    pub fn added_at(&self) -> Option<&str> {
        non_blank(self.created_at_display.as_ref()).or_else(|| non_blank(self.created_at_iso.as_ref()))
    }
}

fn non_blank(value: Option<&Text>) -> Option<&str> {
    value.and_then(Text::as_str).filter(|s| !s.trim().is_empty())
}

fn amount_or_zero(amount: Option<&Amount>) -> Option<f64> {
    match amount {
        None => Some(0.0),
        Some(amount) if amount.is_null() => Some(0.0),
        Some(amount) => amount.as_f64(),
    }
}
