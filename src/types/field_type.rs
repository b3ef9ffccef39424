//! # Semantic Field Types
//!
//! The mapper represents every record field with one of four semantic types.
//! Each one maps to a fixed SQLite column type:
//!
//! | FieldType | Column type | Rust value |
//! |-----------|-------------|------------|
//! | Integer   | INTEGER     | `i64` |
//! | Float     | REAL        | `f64` |
//! | Text      | TEXT        | `String` |
//! | Timestamp | DATETIME    | `chrono::NaiveDateTime` |
//!
//! The mapping is not configurable. `DATETIME` has NUMERIC affinity in
//! SQLite, but the canonical `YYYY-MM-DD hh:mm:ss` text does not look like a
//! number, so it is stored verbatim as TEXT.

use std::fmt;

/// Semantic type of a mapped record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Float,
    Text,
    Timestamp,
}

impl FieldType {
    /// Returns the column type used in `CREATE TABLE` for this field type.
    pub fn column_type(&self) -> &'static str {
        match self {
            FieldType::Integer => "INTEGER",
            FieldType::Float => "REAL",
            FieldType::Text => "TEXT",
            FieldType::Timestamp => "DATETIME",
        }
    }

    /// Lowercase name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Timestamp => "timestamp",
        }
    }

}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
