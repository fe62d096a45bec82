//! Numeric field as it sits in the backing file.
//!
//! Records written by this crate always carry JSON numbers, but the file is
//! plain JSON and may have been edited by hand. An `Amount` keeps whatever
//! was stored so that rewriting a loaded file reproduces it, and only turns
//! it into an `f64` when a value is actually needed.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(Number),
    Text(String),
    Other(Value),
}

impl Amount {
    /// Numeric value, if the stored value can be read as a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Amount::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Amount::Other(_) => None,
        }
    }

    /// Explicit `null` in the file. Treated like an absent field.
    pub fn is_null(&self) -> bool {
        matches!(self, Amount::Other(Value::Null))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Amount::Other(Value::Null), Amount::Number)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => write!(f, "{}", s),
            Amount::Other(Value::Null) => Ok(()),
            Amount::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Render a computed value the way stored floats are rendered: whole numbers
/// keep one decimal place (`20.0`), everything else uses the shortest form.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
