//! Row-to-entity parsing helpers.
//!
//! `libsql::Row` is column-indexed and loosely typed. These helpers cover the
//! conversions every repo needs: timestamps written either by Rust
//! (`to_rfc3339()`) or by `SQLite` defaults (`datetime('now')`), snake_case
//! enums, integer booleans and counts, and JSON text columns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Parse a TEXT column as `DateTime<Utc>`, accepting RFC 3339 and `SQLite`'s
/// `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a `snake_case` serde enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any variant.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. SQL NULL and `""` both become `None`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER column stored as 0/1.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Read a non-negative INTEGER count column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value does not fit in `u32`.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let value = row.get::<i64>(idx)?;
    u32::try_from(value)
        .map_err(|_| DatabaseError::InvalidState(format!("column {idx} out of range: {value}")))
}

/// Read a nullable INTEGER column as `i32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value does not fit in `i32`.
pub fn get_opt_i32(row: &libsql::Row, idx: i32) -> Result<Option<i32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|value| {
            i32::try_from(value).map_err(|_| {
                DatabaseError::InvalidState(format!("column {idx} out of range: {value}"))
            })
        })
        .transpose()
}

/// Deserialize a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Json` for malformed content.
pub fn parse_json<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    Ok(serde_json::from_str(s)?)
}

/// Serialize a value for a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Json` if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lec_core::enums::TestRunStatus;

    #[test]
    fn parses_both_datetime_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
    }

    #[test]
    fn parses_snake_case_enums() {
        let status: TestRunStatus = parse_enum("test_compilation_failed").unwrap();
        assert_eq!(status, TestRunStatus::TestCompilationFailed);
        assert!(parse_enum::<TestRunStatus>("exploded").is_err());
    }
}
