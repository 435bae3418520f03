// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Arguments of a field read or of a list query, keyed by argument name.
///
/// Keys are kept sorted which makes two argument sets equal independent of the order they were
/// built in.
pub type Arguments = BTreeMap<String, ArgumentValue>;

/// JSON-like value of a single argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// Explicitly set to nothing.
    Null,

    /// Boolean value.
    Boolean(bool),

    /// Whole number.
    Integer(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    String(String),

    /// Ordered list of values.
    List(Vec<ArgumentValue>),

    /// Map of values, compared independent of key order.
    Object(BTreeMap<String, ArgumentValue>),
}

impl ArgumentValue {
    /// Returns true if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ArgumentValue::Null)
    }

    /// Returns the numeric value if this is an integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgumentValue::Integer(value) => Some(*value as f64),
            ArgumentValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as an unsigned count, if it is a non-negative whole number.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ArgumentValue::Integer(value) => u64::try_from(*value).ok(),
            ArgumentValue::Float(value) if *value >= 0.0 && value.fract() == 0.0 => {
                Some(*value as u64)
            }
            _ => None,
        }
    }

    /// Returns the boolean value if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgumentValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Canonical JSON representation, object keys sorted.
    ///
    /// Non-finite floats have no JSON representation and are written as `null`.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "null".into())
    }
}

impl PartialEq for ArgumentValue {
    fn eq(&self, other: &Self) -> bool {
        use ArgumentValue::*;

        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            // Integers and floats are both "numbers" and compare by value
            (Integer(_) | Float(_), Integer(_) | Float(_)) => self.as_f64() == other.as_f64(),
            _ => false,
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_json())
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        ArgumentValue::String(value)
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        ArgumentValue::Boolean(value)
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        ArgumentValue::Integer(value)
    }
}

impl From<i32> for ArgumentValue {
    fn from(value: i32) -> Self {
        ArgumentValue::Integer(value.into())
    }
}

impl From<u64> for ArgumentValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => ArgumentValue::Integer(value),
            Err(_) => ArgumentValue::Float(value as f64),
        }
    }
}

impl From<f64> for ArgumentValue {
    fn from(value: f64) -> Self {
        ArgumentValue::Float(value)
    }
}

impl<T: Into<ArgumentValue>> From<Vec<T>> for ArgumentValue {
    fn from(values: Vec<T>) -> Self {
        ArgumentValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ArgumentValue>> From<Option<T>> for ArgumentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgumentValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for ArgumentValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ArgumentValue::Null,
            serde_json::Value::Bool(value) => ArgumentValue::Boolean(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => ArgumentValue::Integer(value),
                None => ArgumentValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => ArgumentValue::String(value),
            serde_json::Value::Array(values) => {
                ArgumentValue::List(values.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => ArgumentValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}
