//! Entry-form validation.
//!
//! Validation never touches the store and can run without an append. It
//! returns every problem at once so the form can show them together.

use crate::domain::value_objects::{price::Price, quantity::Quantity};

pub const MISSING_COMPANY: &str = "company name is required";
pub const INVALID_PRICE: &str = "price must be a valid decimal number";
pub const NEGATIVE_PRICE: &str = "price must not be negative";
pub const INVALID_QUANTITY: &str = "quantity must be a valid number";
pub const NEGATIVE_QUANTITY: &str = "quantity must not be negative";
pub const TOTAL_TOO_LARGE: &str = "price * quantity is too large";

/// Check the raw form fields. An empty result means the input is valid.
/// The ticker is optional and never checked.
pub fn validate(company: &str, _ticker: &str, price_text: &str, quantity_text: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if company.trim().is_empty() {
        errors.push(MISSING_COMPANY.to_string());
    }

    let mut price = Some(0.0);
    if !price_text.trim().is_empty() {
        price = parse_number(price_text);
        match price {
            None => errors.push(INVALID_PRICE.to_string()),
            Some(value) if value < 0.0 => errors.push(NEGATIVE_PRICE.to_string()),
            Some(_) => {}
        }
    }

    let mut quantity = Some(0.0);
    if !quantity_text.trim().is_empty() {
        quantity = parse_number(quantity_text);
        match quantity {
            None => errors.push(INVALID_QUANTITY.to_string()),
            Some(value) if value < 0.0 => errors.push(NEGATIVE_QUANTITY.to_string()),
            Some(_) => {}
        }
    }

    if let (Some(price), Some(quantity)) = (price, quantity) {
        if !(price * quantity).is_finite() {
            errors.push(TOTAL_TOO_LARGE.to_string());
        }
    }

    errors
}

/// Live "total value" hint shown while the form is being filled in.
/// Only available when both fields are filled in with usable numbers.
pub fn preview_value(price_text: &str, quantity_text: &str) -> Option<f64> {
    if price_text.trim().is_empty() || quantity_text.trim().is_empty() {
        return None;
    }
    let price = Price::parse(price_text).ok()?;
    let quantity = Quantity::parse(quantity_text).ok()?;
    price.multiply(quantity.value()).ok().map(|total| total.value())
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
