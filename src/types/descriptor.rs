//! # Record Type Descriptors
//!
//! A `RecordDescriptor` is the static schema of one mapped record type: the
//! backing table name (the type name, case-folded) and the ordered list of
//! fields, excluding the reserved `pk` identity field.
//!
//! ```ignore
//! let descriptor = RecordDescriptor::new("Expense")
//!     .field("date", FieldType::Timestamp)
//!     .field("amount", FieldType::Float)
//!     .foreign_key("category_id", "Category")
//!     .field("comment", FieldType::Text);
//!
//! assert_eq!(descriptor.table(), "expense");
//! ```
//!
//! Table and column names reach SQL text only through a descriptor, so
//! `validate` restricts them to plain identifiers before a repository will
//! accept the descriptor.

use std::collections::HashSet;

use super::{parse_timestamp, FieldType, Value};
use crate::repository::{RepositoryError, RepositoryResult};

/// Name of the identity column present on every mapped table.
pub const PK_COLUMN: &str = "pk";

/// One declared field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    field_type: FieldType,
    references: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            references: None,
        }
    }

    /// Integer field constrained to the identity column of `table`.
    pub fn foreign_key(name: impl Into<String>, table: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Integer,
            references: Some(table.as_ref().to_lowercase()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Table whose identity column this field references, if any.
    pub fn references(&self) -> Option<&str> {
        self.references.as_deref()
    }

    /// Checks `value` against the declared type. NULL fits every field,
    /// integers widen to floats and canonical text becomes a timestamp.
    pub fn conform(&self, table: &str, value: Value) -> RepositoryResult<Value> {
        let wrong = |found: &'static str| RepositoryError::WrongValueType {
            table: table.to_string(),
            field: self.name.clone(),
            expected: self.field_type,
            found,
        };

        match (self.field_type, value) {
            (_, Value::Null) => Ok(Value::Null),
            (FieldType::Float, Value::Integer(i)) => Ok(Value::Float(i as f64)),
            (FieldType::Timestamp, Value::Text(text)) => parse_timestamp(&text)
                .map(Value::Timestamp)
                .map_err(|_| wrong("non-canonical text")),
            (declared, value) if value.field_type() == Some(declared) => Ok(value),
            (_, value) => Err(wrong(value.kind_name())),
        }
    }
}

/// Ordered field list and table name of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    table: String,
    fields: Vec<FieldDef>,
}

impl RecordDescriptor {
    /// Starts a descriptor for the record type called `type_name`.
    pub fn new(type_name: impl AsRef<str>) -> Self {
        Self {
            table: type_name.as_ref().to_lowercase(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, field_type));
        self
    }

    pub fn foreign_key(mut self, name: impl Into<String>, table: impl AsRef<str>) -> Self {
        self.fields.push(FieldDef::foreign_key(name, table));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDef::name)
    }

    /// Declaration index of `name`. Column names compare case-insensitively,
    /// as they do in SQLite.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Conforms a record's values to the declared fields, in order.
    pub fn conform_values(&self, values: Vec<Value>) -> RepositoryResult<Vec<Value>> {
        if values.len() != self.fields.len() {
            return Err(RepositoryError::InvalidDescriptor {
                table: self.table.clone(),
                reason: format!(
                    "record produced {} values for {} declared fields",
                    values.len(),
                    self.fields.len()
                ),
            });
        }
        self.fields
            .iter()
            .zip(values)
            .map(|(field, value)| field.conform(&self.table, value))
            .collect()
    }

    /// Checks that every identifier is safe to place in statement text.
    pub fn validate(&self) -> RepositoryResult<()> {
        let invalid = |reason: String| RepositoryError::InvalidDescriptor {
            table: self.table.clone(),
            reason,
        };

        if !is_identifier(&self.table) {
            return Err(invalid(format!("`{}` is not a valid table name", self.table)));
        }
        if self.fields.is_empty() {
            return Err(invalid("no fields declared".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !is_identifier(&field.name) {
                return Err(invalid(format!("`{}` is not a valid field name", field.name)));
            }
            if field.name.eq_ignore_ascii_case(PK_COLUMN) {
                return Err(invalid("`pk` is reserved for the identity field".to_string()));
            }
            if !seen.insert(field.name.to_lowercase()) {
                return Err(invalid(format!("field `{}` declared twice", field.name)));
            }
            if let Some(table) = field.references() {
                if !is_identifier(table) {
                    return Err(invalid(format!(
                        "`{}` references invalid table `{}`",
                        field.name, table
                    )));
                }
            }
        }

        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
