use crate::domain::errors::ValidationError;

/// Number of shares bought. Fractional shares are allowed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quantity(f64);

impl Quantity {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::MustBeFinite);
        }
        if value >= 0.0 {
            Ok(Quantity(value))
        } else {
            Err(ValidationError::MustBeNonNegative)
        }
    }

    /// Parse form text. Blank text means zero.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Quantity(0.0));
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidQuantity(trimmed.to_string()))?;
        Quantity::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
