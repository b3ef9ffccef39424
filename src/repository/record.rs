//! # Record Contract
//!
//! A type becomes storable by implementing `Record`: it supplies its
//! descriptor once, exposes its identity, lists its field values in
//! descriptor order, and rebuilds itself from a `RecordValues` builder.
//!
//! ```ignore
//! impl Record for Category {
//!     fn descriptor() -> RecordDescriptor {
//!         RecordDescriptor::new("Category")
//!             .field("name", FieldType::Text)
//!             .foreign_key("parent", "Category")
//!     }
//!     fn pk(&self) -> Option<Pk> { Some(self.pk) }
//!     fn set_pk(&mut self, pk: Pk) { self.pk = pk; }
//!     fn values(&self) -> Vec<Value> {
//!         vec![self.name.clone().into_value(), self.parent.into_value()]
//!     }
//!     fn from_values(mut values: RecordValues<'_>) -> RepositoryResult<Self> {
//!         Ok(Self { pk: values.pk(), name: values.next()?, parent: values.next()? })
//!     }
//! }
//! ```
//!
//! Identity `0` means "not yet persisted". `pk()` returning `None` means the
//! record has no identity attribute at all, which every mutating operation
//! rejects.

use super::{Pk, RepositoryError, RepositoryResult};
use crate::types::{FromValue, RecordDescriptor, Value};

/// A plain-data type mapped onto one table.
pub trait Record: Sized {
    /// Table name and ordered fields, excluding `pk`.
    fn descriptor() -> RecordDescriptor;

    /// Current identity; `Some(0)` for a record not yet persisted.
    fn pk(&self) -> Option<Pk>;

    /// Writes the store-assigned identity back onto the record.
    fn set_pk(&mut self, pk: Pk);

    /// Field values in descriptor order.
    fn values(&self) -> Vec<Value>;

    /// Builds a fully-initialised record from a materialised row.
    fn from_values(values: RecordValues<'_>) -> RepositoryResult<Self>;
}

/// Identity plus deserialized field values of one row, in descriptor order.
///
/// Values are consumed either positionally with `next` or by name with
/// `get`; each value can be taken once.
#[derive(Debug)]
pub struct RecordValues<'a> {
    pk: Pk,
    descriptor: &'a RecordDescriptor,
    values: Vec<Option<Value>>,
    cursor: usize,
}

impl<'a> RecordValues<'a> {
    pub fn new(pk: Pk, descriptor: &'a RecordDescriptor, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), descriptor.len());
        Self {
            pk,
            descriptor,
            values: values.into_iter().map(Some).collect(),
            cursor: 0,
        }
    }

    pub fn pk(&self) -> Pk {
        self.pk
    }

    /// Takes the next field in declaration order.
    pub fn next<T: FromValue>(&mut self) -> RepositoryResult<T> {
        let index = self.cursor;
        self.cursor += 1;
        self.take(index)
    }

    /// Takes the field called `name`.
    pub fn get<T: FromValue>(&mut self, name: &str) -> RepositoryResult<T> {
        let index = self
            .descriptor
            .position(name)
            .ok_or_else(|| RepositoryError::UnknownField {
                table: self.descriptor.table().to_string(),
                field: name.to_string(),
            })?;
        self.take(index)
    }

    fn take<T: FromValue>(&mut self, index: usize) -> RepositoryResult<T> {
        let descriptor = self.descriptor;
        let missing = |column: String| RepositoryError::MissingColumn {
            table: descriptor.table().to_string(),
            column,
        };

        let field = descriptor
            .fields()
            .get(index)
            .ok_or_else(|| missing(format!("#{}", index)))?;
        let value = self
            .values
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| missing(field.name().to_string()))?;

        T::from_value(value).map_err(|found| RepositoryError::TypeMismatch {
            field: field.name().to_string(),
            expected: field.field_type(),
            found: found.kind_name(),
        })
    }
}
