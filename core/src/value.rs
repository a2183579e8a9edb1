//! Format values and merge rules
//!
//! A stored value is either a primitive [`Scalar`] or a flat record of
//! scalars. Absence of formatting is `Option::None`, never a value.
//!
//! [`FormatRule`] is what callers hand to
//! [`RangeStore::merge`](crate::format::RangeStore::merge): set a value,
//! clean (unset) ranges carrying a matching value, or remove unconditionally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Primitive value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Flat record of primitive values
pub type Record = BTreeMap<String, Scalar>;

/// Value carried by a format range
///
/// Equality is structural and one level deep: records are equal when they
/// have the same key set and every key maps to an equal scalar. Records
/// cannot nest, so this is the derived equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatValue {
    Scalar(Scalar),
    Record(Record),
}

impl FormatValue {
    pub fn bool(value: bool) -> Self {
        FormatValue::Scalar(Scalar::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        FormatValue::Scalar(Scalar::Int(value))
    }

    pub fn str(value: impl Into<String>) -> Self {
        FormatValue::Scalar(Scalar::Str(value.into()))
    }

    /// Build a record value from `(key, scalar)` pairs
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Scalar)>,
    {
        FormatValue::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for FormatValue {
    fn from(value: bool) -> Self {
        FormatValue::bool(value)
    }
}

impl From<i64> for FormatValue {
    fn from(value: i64) -> Self {
        FormatValue::int(value)
    }
}

impl From<&str> for FormatValue {
    fn from(value: &str) -> Self {
        FormatValue::str(value)
    }
}

impl From<String> for FormatValue {
    fn from(value: String) -> Self {
        FormatValue::str(value)
    }
}

impl fmt::Display for FormatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Instruction passed to a merge
#[derive(Debug, Clone, PartialEq)]
pub enum FormatRule {
    /// Set the value over the range
    Set(FormatValue),
    /// Unset only where the stored value equals the given one
    Clean(Option<FormatValue>),
    /// Unset unconditionally
    Remove,
}

impl FormatRule {
    /// The value this rule carries, if any
    pub fn value(&self) -> Option<&FormatValue> {
        match self {
            FormatRule::Set(value) => Some(value),
            FormatRule::Clean(value) => value.as_ref(),
            FormatRule::Remove => None,
        }
    }
}

impl From<FormatValue> for FormatRule {
    fn from(value: FormatValue) -> Self {
        FormatRule::Set(value)
    }
}

impl From<Option<FormatValue>> for FormatRule {
    fn from(value: Option<FormatValue>) -> Self {
        match value {
            Some(value) => FormatRule::Set(value),
            None => FormatRule::Remove,
        }
    }
}
