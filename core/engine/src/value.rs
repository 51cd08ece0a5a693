//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Defines the scalar value held by a dataset row and the two
//! coercions (to string, to number) every other component relies on.
//! CONTEXT: Rows arrive from the data source adapter as loosely typed JSON.
//! `Value` normalizes them into four variants; an absent attribute and an
//! explicit JSON null are both "missing".

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single scalar read from a dataset row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// True for `Null` (JSON null or an absent attribute).
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for missing values and the empty string.
    /// This is what the `is_null` operator tests.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion.
    ///
    /// Numbers pass through (non-finite ones are rejected), text is trimmed and
    /// parsed, booleans become 1/0. Empty or whitespace-only text is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n.is_finite().then_some(*n),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// String coercion. Missing values become the empty string.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_plain_number(*n),
            Value::Text(s) => s.clone(),
        }
    }
}

/// Shortest round-trip representation without a trailing `.0`.
pub fn format_plain_number(n: f64) -> String {
    if n == 0.0 {
        // Collapses -0 as well
        return "0".to_string();
    }
    format!("{}", n)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::Text(s),
            // Nested structures are not scalars; keep their JSON text
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(other.to_string())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Number(100.0).to_display_string(), "100");
        assert_eq!(Value::Number(1.5).to_display_string(), "1.5");
        assert_eq!(Value::Number(-0.0).to_display_string(), "0");
        assert_eq!(Value::Bool(true).to_display_string(), "true");
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::from("East").to_display_string(), "East");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(Value::from("1e3").as_number(), Some(1000.0));
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::from("").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::Bool(false).as_number(), Some(0.0));
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn test_blank() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(" ").is_blank());
        assert!(!Value::Number(0.0).is_blank());
    }

    #[test]
    fn test_json_conversion() {
        let v: Value = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(v, Value::Text("[1,2]".to_string()));

        let v: Value = serde_json::from_str("null").unwrap();
        assert_eq!(v, Value::Null);

        let v: Value = serde_json::from_str("12").unwrap();
        assert_eq!(v, Value::Number(12.0));
    }
}
