//! # Value/Column Codec
//!
//! Converts between record `Value`s and SQLite column values.
//!
//! ## Serialization (value → column)
//!
//! | Value | Bound as |
//! |-------|----------|
//! | Null | SQL NULL |
//! | Integer | INTEGER |
//! | Float | REAL |
//! | Text | TEXT, unchanged |
//! | Timestamp | TEXT, `YYYY-MM-DD hh:mm:ss` |
//!
//! ## Deserialization (column → value)
//!
//! Decoding is driven by the field's declared type:
//!
//! - SQL NULL is `Value::Null` whatever the declared type.
//! - Text fields: enclosing single quotes are stripped.
//! - Timestamp fields: enclosing single quotes are stripped, then the text
//!   must parse with the canonical pattern; anything else is a parse error.
//! - Integer and float fields take the native scalar as-is. An INTEGER in a
//!   float field widens to `Float`.
//! - Any other pairing is a type mismatch naming the field.

use rusqlite::types::{Value as SqlValue, ValueRef};

use super::{RepositoryError, RepositoryResult};
use crate::types::{format_timestamp, parse_timestamp, FieldDef, FieldType, Value};

/// Converts a field value into a statement parameter.
pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Timestamp(ts) => SqlValue::Text(format_timestamp(ts)),
    }
}

/// Decodes one column of a result row as `field`'s declared type.
pub fn from_sql(field: &FieldDef, raw: ValueRef<'_>) -> RepositoryResult<Value> {
    match (field.field_type(), raw) {
        (_, ValueRef::Null) => Ok(Value::Null),
        (FieldType::Text, ValueRef::Text(bytes)) => {
            Ok(Value::Text(strip_quotes(utf8(bytes)?).to_string()))
        }
        (FieldType::Timestamp, ValueRef::Text(bytes)) => {
            let text = strip_quotes(utf8(bytes)?);
            parse_timestamp(text)
                .map(Value::Timestamp)
                .map_err(|source| RepositoryError::TimestampParse {
                    field: field.name().to_string(),
                    value: text.to_string(),
                    source,
                })
        }
        (FieldType::Integer, ValueRef::Integer(i)) => Ok(Value::Integer(i)),
        (FieldType::Float, ValueRef::Real(f)) => Ok(Value::Float(f)),
        (FieldType::Float, ValueRef::Integer(i)) => Ok(Value::Float(i as f64)),
        (expected, other) => Err(RepositoryError::TypeMismatch {
            field: field.name().to_string(),
            expected,
            found: sql_kind_name(other),
        }),
    }
}

fn utf8(bytes: &[u8]) -> RepositoryResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| RepositoryError::Store(rusqlite::Error::Utf8Error(e)))
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches('\'')
}

fn sql_kind_name(raw: ValueRef<'_>) -> &'static str {
    match raw {
        ValueRef::Null => "NULL",
        ValueRef::Integer(_) => "integer",
        ValueRef::Real(_) => "real",
        ValueRef::Text(_) => "text",
        ValueRef::Blob(_) => "blob",
    }
}
