use crate::domain::errors::ValidationError;

/// Purchase price per share.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::MustBeFinite);
        }
        if value >= 0.0 {
            Ok(Price(value))
        } else {
            Err(ValidationError::MustBeNonNegative)
        }
    }

    /// Parse form text. Blank text means zero.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Price(0.0));
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidPrice(trimmed.to_string()))?;
        Price::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn multiply(&self, factor: f64) -> Result<Price, ValidationError> {
        if !factor.is_finite() {
            return Err(ValidationError::MustBeFinite);
        }
        Price::new(self.0 * factor)
    }
}
