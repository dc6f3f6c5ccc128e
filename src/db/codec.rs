//! Conversions between SQLite column values and domain values.
//!
//! Label lists (event positions, profile skills) are stored as a JSON array
//! in a TEXT column. Decoding is lenient on purpose: a corrupt column
//! degrades to an empty list and never fails the read of the whole record.

use crate::errors::AppError;
use crate::utils::time::from_storage;
use chrono::{DateTime, Utc};
use rusqlite::types::ValueRef;
use serde_json::Value;

/// Decode a stored label list. `NULL`, empty, unparsable or non-array
/// values yield `[]`; non-string elements are dropped.
pub fn decode_label_list(raw: Option<&str>, owner: &str) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(other) => {
            tracing::warn!(record = owner, value = %other, "stored label list is not an array");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(record = owner, error = %e, "failed to parse stored label list");
            Vec::new()
        }
    }
}

/// Decode a label list straight from the column value. Anything that is not
/// UTF-8 text (blobs, numbers, invalid bytes) degrades to `[]` as well.
pub fn decode_label_column(value: ValueRef<'_>, owner: &str) -> Vec<String> {
    match value {
        ValueRef::Null => Vec::new(),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => decode_label_list(Some(text), owner),
            Err(e) => {
                tracing::warn!(record = owner, error = %e, "stored label list is not valid UTF-8");
                Vec::new()
            }
        },
        other => {
            tracing::warn!(record = owner, kind = %other.data_type(), "stored label list is not text");
            Vec::new()
        }
    }
}

pub fn encode_label_list(labels: &[String]) -> String {
    serde_json::json!(labels).to_string()
}

/// Decode a canonical timestamp column, mapping failures to a rusqlite
/// conversion error for the given column index.
pub fn decode_timestamp(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    from_storage(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.to_string())),
        )
    })
}
