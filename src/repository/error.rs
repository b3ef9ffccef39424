//! Repository error types.
//!
//! Every failure of a repository operation is one `RepositoryError`. The
//! variants group into the classes reported by [`RepositoryError::class`]:
//!
//! | Class | Variants |
//! |-------|----------|
//! | InvalidArgument | `MissingIdentity`, `IdentityAssigned`, `UnknownField`, `InvalidDescriptor`, `WrongValueType` |
//! | NotFound | `NotFound` |
//! | Parse | `TimestampParse`, `TypeMismatch` |
//! | Integrity | `Store` carrying a SQLite constraint violation |
//! | Store | any other `Store`, `MissingColumn` |
//!
//! Store errors are never rewritten: the `Store` variant wraps the engine's
//! `rusqlite::Error` as-is and integrity violations are recognised by
//! inspecting its result code.

use thiserror::Error;

use super::Pk;
use crate::types::FieldType;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Coarse classification of a repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected before touching the store.
    InvalidArgument,
    /// A mutation targeted an identity with no row.
    NotFound,
    /// The engine refused a write because of a constraint.
    Integrity,
    /// A stored value could not be read back as its declared type.
    Parse,
    /// Any other engine or I/O failure.
    Store,
}

/// Errors produced by record repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The record carries no identity at all.
    #[error("missing identity: {table} record has no `pk` attribute")]
    MissingIdentity { table: String },

    /// Insert of a record whose identity is already set.
    #[error("identity already assigned: {table} record has pk={pk}")]
    IdentityAssigned { table: String, pk: Pk },

    /// Update or delete of an identity with no row.
    #[error("record not in repository: no {table} row with pk={pk}")]
    NotFound { table: String, pk: Pk },

    /// A filter or accessor named a field the descriptor does not declare.
    #[error("unknown field `{field}` for table {table}")]
    UnknownField { table: String, field: String },

    /// The descriptor (or a record's value list) does not fit the mapper.
    #[error("invalid record descriptor for {table}: {reason}")]
    InvalidDescriptor { table: String, reason: String },

    /// A record or filter supplied a value of the wrong type for a field.
    #[error("{table}.{field} is declared {expected}, got a {found} value")]
    WrongValueType {
        table: String,
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    /// A stored value did not have the field's declared type.
    #[error("field `{field}` expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    /// A declared field has no column in the result row.
    #[error("column `{column}` missing from {table} row")]
    MissingColumn { table: String, column: String },

    /// A stored timestamp is not in `YYYY-MM-DD hh:mm:ss` form.
    #[error("field `{field}` holds {value:?}, which is not a `YYYY-MM-DD hh:mm:ss` timestamp")]
    TimestampParse {
        field: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Error raised by SQLite, passed through untouched.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

impl RepositoryError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RepositoryError::MissingIdentity { .. }
            | RepositoryError::IdentityAssigned { .. }
            | RepositoryError::UnknownField { .. }
            | RepositoryError::InvalidDescriptor { .. }
            | RepositoryError::WrongValueType { .. } => ErrorClass::InvalidArgument,
            RepositoryError::NotFound { .. } => ErrorClass::NotFound,
            RepositoryError::TypeMismatch { .. } | RepositoryError::TimestampParse { .. } => {
                ErrorClass::Parse
            }
            RepositoryError::Store(err) if is_constraint_violation(err) => ErrorClass::Integrity,
            RepositoryError::Store(_) | RepositoryError::MissingColumn { .. } => ErrorClass::Store,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    pub fn is_integrity_violation(&self) -> bool {
        self.class() == ErrorClass::Integrity
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.class() == ErrorClass::InvalidArgument
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_error() -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            Some("FOREIGN KEY constraint failed".to_string()),
        )
    }

    #[test]
    fn constraint_failures_classify_as_integrity() {
        let err = RepositoryError::from(constraint_error());
        assert_eq!(err.class(), ErrorClass::Integrity);
        assert!(err.is_integrity_violation());
    }

    #[test]
    fn integrity_errors_keep_engine_message() {
        let err = RepositoryError::from(constraint_error());
        assert!(err.to_string().contains("FOREIGN KEY constraint failed"));
    }

    #[test]
    fn other_store_errors_classify_as_store() {
        let err = RepositoryError::from(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.class(), ErrorClass::Store);
    }

    #[test]
    fn argument_errors_classify_before_store() {
        let err = RepositoryError::IdentityAssigned {
            table: "t".into(),
            pk: 3,
        };
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("pk=3"));
    }

    #[test]
    fn not_found_is_its_own_class() {
        let err = RepositoryError::NotFound {
            table: "t".into(),
            pk: 9,
        };
        assert!(err.is_not_found());
        assert!(!err.is_invalid_argument());
    }
}
