//! Text field as it sits in the backing file.
//!
//! The counterpart of [`Amount`](super::amount::Amount) for string fields:
//! a hand-edited file may hold `null` or a non-string value where text is
//! expected, and the record must still load and be written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Str(String),
    Other(Value),
}

impl Text {
    /// The stored string, if the value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Text::Str(s) => Some(s),
            Text::Other(_) => None,
        }
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::Str(value.to_string())
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::Str(value)
    }
}
