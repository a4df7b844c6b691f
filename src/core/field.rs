//! Field kinds and typed scalar values used in predicates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Storage kind of a resource field
///
/// Decides how a raw query-string value is turned into a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared as a string literal
    Text,
    /// Compared as a 64-bit integer
    Integer,
    /// Compared as an RFC 3339 timestamp
    Timestamp,
}

impl FieldKind {
    /// Parse a raw value into a typed scalar of this kind
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, String> {
        match self {
            FieldKind::Text => Ok(FieldValue::String(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| format!("'{}' is not an integer: {}", raw, e)),
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", raw, e)),
        }
    }
}

/// A polymorphic field value that can hold different scalar types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values of the same variant
    ///
    /// Values of different variants are not comparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
