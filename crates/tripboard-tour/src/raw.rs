//! The untyped intro record as delivered by the upstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content-type-specific intro attributes, keyed by upstream field name.
///
/// The key set depends entirely on the content type. JSON strings are kept
/// verbatim; numbers and booleans are stringified; `null`, arrays and objects
/// are stored as absent (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct RawIntroRecord(BTreeMap<String, Option<String>>);

impl RawIntroRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from an arbitrary JSON value.
    ///
    /// Returns `None` when `value` is not a JSON object. The normalizer only
    /// accepts records, so callers must reject anything else up front.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_object().map(|object| {
            Self(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), scalar_to_string(v)))
                    .collect(),
            )
        })
    }

    /// Returns the value for `field`, or `None` when absent or null.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Option::as_deref)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        self.0.insert(field.into(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record as a JSON object, absent values rendered as `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().map_or(Value::Null, Value::String)))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Value>> for RawIntroRecord {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(
            map.into_iter()
                .map(|(k, v)| {
                    let value = scalar_to_string(&v);
                    (k, value)
                })
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for RawIntroRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

/// Converts a JSON scalar to its string form. Non-scalars yield `None`.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
