//! Field value types and row access
//!
//! [`ArrayDataProvider`](crate::providers::ArrayDataProvider) filters and sorts
//! rows by reading named fields through the [`Record`] trait.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a number if it is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Render the value the way it would appear in text
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Substring filter match
    ///
    /// Strings match case-insensitively, numbers match on their decimal
    /// rendering. Every other type never matches.
    pub fn matches_filter(&self, needle: &str) -> bool {
        match self {
            FieldValue::String(s) => s.to_lowercase().contains(&needle.to_lowercase()),
            FieldValue::Integer(_) | FieldValue::Float(_) => {
                self.to_display_string().contains(needle)
            }
            FieldValue::Boolean(_) | FieldValue::Null => false,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Null => FieldValue::Null,
            other => FieldValue::String(other.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// Case-insensitive ordering with a case-sensitive tie-break
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Order two optional field values
///
/// Two strings compare by locale order, two numbers numerically, and any other
/// pairing (including absent fields) by the locale order of their rendering.
pub fn compare_fields(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    let strings = (
        a.and_then(FieldValue::as_string),
        b.and_then(FieldValue::as_string),
    );
    if let (Some(x), Some(y)) = strings {
        return locale_cmp(x, y);
    }

    let numbers = (
        a.and_then(FieldValue::as_number),
        b.and_then(FieldValue::as_number),
    );
    if let (Some(x), Some(y)) = numbers {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    let render = |v: Option<&FieldValue>| v.map(FieldValue::to_display_string).unwrap_or_default();
    locale_cmp(&render(a), &render(b))
}

/// Named-field access for rows held by an in-memory provider
pub trait Record {
    /// Get the value of a field, `None` when the row has no such field
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

impl Record for Value {
    fn field_value(&self, field: &str) -> Option<FieldValue> {
        self.as_object()?.get(field).map(FieldValue::from)
    }
}

impl Record for serde_json::Map<String, Value> {
    fn field_value(&self, field: &str) -> Option<FieldValue> {
        self.get(field).map(FieldValue::from)
    }
}

impl Record for IndexMap<String, FieldValue> {
    fn field_value(&self, field: &str) -> Option<FieldValue> {
        self.get(field).cloned()
    }
}
