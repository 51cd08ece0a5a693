//! FILENAME: core/engine/src/row.rs
//! PURPOSE: The `Row` (ordered attribute -> value map) and `Dataset` types.
//! CONTEXT: Datasets are immutable snapshots handed over by the data source
//! adapter. Every engine stage borrows them as `&[Row]` and builds new rows.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DatasetError;
use crate::value::Value;

static MISSING: Value = Value::Null;

/// Insertion-ordered mapping from attribute name to value.
///
/// Rows are small (tens of attributes), so lookups are a linear scan over a
/// vector, which also keeps the source order for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row { entries: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the value if the attribute is present (even if it is `Null`).
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
    }

    /// Returns the value, treating an absent attribute as `Null`.
    pub fn value(&self, attribute: &str) -> &Value {
        self.get(attribute).unwrap_or(&MISSING)
    }

    pub fn contains_key(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    /// Sets an attribute. An existing attribute keeps its position.
    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let attribute = attribute.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == attribute) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((attribute, value));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Hashes the row independently of attribute order.
    fn hash_sorted<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<&(String, Value)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted.len().hash(state);
        for (name, value) in sorted {
            name.hash(state);
            hash_value(value, state);
        }
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            // -0 and 0 compare equal, so they must hash equal
            let n = if *n == 0.0 { 0.0 } else { *n };
            n.to_bits().hash(state);
        }
        Value::Text(s) => {
            3u8.hash(state);
            s.hash(state);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of attribute values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    row.insert(name, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Builds a `Row` from `attribute => value` pairs.
#[macro_export]
macro_rules! row {
    () => { $crate::Row::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $( row.insert($name, $value); )+
        row
    }};
}

// ============================================================================
// DATASET
// ============================================================================

/// A materialized, ordered collection of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

/// Keys that API responses commonly wrap their row array in.
const WRAPPER_KEYS: [&str; 3] = ["data", "results", "items"];

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Dataset { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Builds a dataset from an API payload: either a bare array of objects or
    /// an object wrapping that array under `data`, `results` or `items`.
    pub fn from_api_response(payload: serde_json::Value) -> Result<Self, DatasetError> {
        let items = match payload {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut object) => {
                let key = WRAPPER_KEYS
                    .iter()
                    .find(|key| matches!(object.get(**key), Some(serde_json::Value::Array(_))))
                    .ok_or_else(|| {
                        DatasetError::UnexpectedShape(format!(
                            "object without a data/results/items array (keys: {})",
                            object.keys().cloned().collect::<Vec<_>>().join(", ")
                        ))
                    })?;
                match object.remove(*key) {
                    Some(serde_json::Value::Array(items)) => items,
                    _ => return Err(DatasetError::UnexpectedShape(format!("'{}' is not an array", key))),
                }
            }
            other => {
                return Err(DatasetError::UnexpectedShape(format!(
                    "expected an array or object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(object) => Ok(object
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect::<Row>()),
                _ => Err(DatasetError::RowNotObject { index }),
            })
            .collect::<Result<Vec<Row>, DatasetError>>()?;

        Ok(Dataset { rows })
    }

    /// Parses a JSON document and unwraps it like `from_api_response`.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let payload: serde_json::Value = serde_json::from_str(json)?;
        Self::from_api_response(payload)
    }

    /// Content hash of the dataset; see [`fingerprint_rows`].
    pub fn fingerprint(&self) -> u64 {
        fingerprint_rows(&self.rows)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Hashes rows in order, each row's entries visited in sorted key order, so
/// two payloads that differ only in key enumeration order hash the same.
pub fn fingerprint_rows(rows: &[Row]) -> u64 {
    let mut hasher = FxHasher::default();
    rows.len().hash(&mut hasher);
    for row in rows {
        row.hash_sorted(&mut hasher);
    }
    hasher.finish()
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Dataset { rows }
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Dataset {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_insert_keeps_position() {
        let mut r = row! { "a" => 1.0, "b" => "x" };
        assert_eq!(r.insert("a", 2.0), Some(Value::Number(1.0)));
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(r.value("a"), &Value::Number(2.0));
        assert_eq!(r.value("missing"), &Value::Null);
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let r: Row = serde_json::from_str(r#"{"zeta": 1, "alpha": "a", "mid": null}"#).unwrap();
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert!(r.contains_key("mid"));
        assert!(r.value("mid").is_missing());

        let back = serde_json::to_string(&r).unwrap();
        assert_eq!(back, r#"{"zeta":1.0,"alpha":"a","mid":null}"#);
    }

    #[test]
    fn test_from_api_response_unwraps() {
        let payload = serde_json::json!({"meta": {}, "results": [{"a": 1}, {"a": 2}]});
        let dataset = Dataset::from_api_response(payload).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[1].value("a"), &Value::Number(2.0));

        let bare = serde_json::json!([{"a": 1}]);
        assert_eq!(Dataset::from_api_response(bare).unwrap().len(), 1);
    }

    #[test]
    fn test_from_api_response_errors() {
        let err = Dataset::from_api_response(serde_json::json!({"rows": []})).unwrap_err();
        assert!(matches!(err, DatasetError::UnexpectedShape(_)));

        let err = Dataset::from_api_response(serde_json::json!([{"a": 1}, 5])).unwrap_err();
        assert!(matches!(err, DatasetError::RowNotObject { index: 1 }));

        assert!(matches!(Dataset::from_json_str("{oops"), Err(DatasetError::Json(_))));
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a = vec![row! { "x" => 1.0, "y" => "b" }];
        let b = vec![row! { "y" => "b", "x" => 1.0 }];
        let c = vec![row! { "x" => 2.0, "y" => "b" }];
        assert_eq!(fingerprint_rows(&a), fingerprint_rows(&b));
        assert_ne!(fingerprint_rows(&a), fingerprint_rows(&c));
    }
}
