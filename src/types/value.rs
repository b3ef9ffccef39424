//! # Field Values
//!
//! `Value` is the nullable value that crosses the serialization boundary
//! between a record and its table row. Absence of a value is the `Null`
//! variant; there is no textual NULL marker anywhere in the mapper.
//!
//! ## Conversions
//!
//! Record types convert their fields through two small traits:
//!
//! - `IntoValue`: `i64`, `f64`, `String`, `&str`, `NaiveDateTime` and
//!   `Option<T>` of each turn into a `Value`.
//! - `FromValue`: the reverse. A non-`Option` target rejects `Null`; a
//!   mismatch hands the original value back so the caller can report what
//!   it actually found.
//!
//! ```ignore
//! let v = Some(42i64).into_value();
//! assert_eq!(Option::<i64>::from_value(v), Ok(Some(42)));
//! ```
//!
//! ## Timestamps
//!
//! The canonical textual form is `YYYY-MM-DD hh:mm:ss` (four-digit year,
//! 24-hour clock, zero padded). Sub-second precision is not representable
//! and is dropped when a timestamp is formatted.

use chrono::NaiveDateTime;

use super::FieldType;

/// strftime pattern of the canonical timestamp encoding.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Nullable value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Semantic type of this value, or None for NULL.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(FieldType::Integer),
            Value::Float(_) => Some(FieldType::Float),
            Value::Text(_) => Some(FieldType::Text),
            Value::Timestamp(_) => Some(FieldType::Timestamp),
        }
    }

    /// Short name of the variant, used in type-mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        self.field_type().map_or("NULL", |ty| ty.name())
    }

    /// Formats the value for display.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(ts) => format_timestamp(ts),
        }
    }
}

/// Formats a timestamp in the canonical `YYYY-MM-DD hh:mm:ss` encoding.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses the canonical timestamp encoding. Any other shape is an error.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
}

/// Conversion of a Rust field into a `Value`.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion of a `Value` back into a Rust field.
///
/// On mismatch the value is returned unchanged in the error.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            other => Err(other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn timestamp_format_is_zero_padded_24h() {
        let value = ts(1994, 9, 5, 16, 4, 1);
        assert_eq!(format_timestamp(&value), "1994-09-05 16:04:01");
    }

    #[test]
    fn timestamp_parse_accepts_only_canonical_shape() {
        assert_eq!(
            parse_timestamp("1994-09-25 16:24:11").unwrap(),
            ts(1994, 9, 25, 16, 24, 11)
        );
        assert!(parse_timestamp("1994-09-25T16:24:11").is_err());
        assert!(parse_timestamp("25.09.1994 16:24:11").is_err());
        assert!(parse_timestamp("1994-09-25").is_err());
    }

    #[test]
    fn timestamp_drops_subsecond_precision() {
        let precise = ts(2024, 4, 1, 12, 0, 0)
            .checked_add_signed(chrono::Duration::milliseconds(750))
            .unwrap();
        assert_eq!(format_timestamp(&precise), "2024-04-01 12:00:00");
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(None::<i64>.into_value(), Value::Null);
        assert_eq!(Some("x").into_value(), Value::Text("x".to_string()));
    }

    #[test]
    fn from_value_rejects_null_for_required_fields() {
        assert_eq!(String::from_value(Value::Null), Err(Value::Null));
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
    }

    #[test]
    fn from_value_hands_back_mismatched_value() {
        let err = i64::from_value(Value::Text("7".into())).unwrap_err();
        assert_eq!(err, Value::Text("7".into()));
        assert_eq!(err.kind_name(), "text");
    }

    #[test]
    fn display_string_uses_canonical_timestamp() {
        let value = Value::Timestamp(ts(2001, 1, 2, 3, 4, 5));
        assert_eq!(value.display_string(), "2001-01-02 03:04:05");
        assert_eq!(Value::Null.display_string(), "NULL");
    }
}
