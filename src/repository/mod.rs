//! # Generic Record Repositories
//!
//! A repository stores one `Record` type. The record type describes itself
//! once through a `RecordDescriptor`; from that descriptor the repository
//! derives the table, every statement, and the mapping between typed fields
//! and untyped columns. No per-type SQL is written anywhere.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 Repository<T> (trait)                       │
//! │   add · get · get_all · update · delete · delete_all        │
//! ├──────────────────────────────┬─────────────────────────────┤
//! │     SqliteRepository<T>      │     MemoryRepository<T>      │
//! │  statements ─► codec ─► SQL  │   BTreeMap<Pk, Vec<Value>>   │
//! ├──────────────────────────────┴─────────────────────────────┤
//! │  Record: descriptor() · pk() · values() · from_values()     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//!
//! Identity `0` means "not yet persisted". `add` accepts only such records,
//! lets the store pick the identity, and writes it back onto the record.
//! `update` and `delete` fail with `NotFound` when no row has the identity.
//!
//! ## Module Organization
//!
//! - `record`: `Record` trait and the `RecordValues` builder
//! - `filter`: conjunctive equality filters for `get_all`
//! - `codec`: value ↔ column conversion
//! - `statements`: SQL text derived from a descriptor
//! - `sqlite`: the SQLite-backed repository
//! - `memory`: an in-process repository with the same contract
//! - `error`: `RepositoryError` and its classes

mod codec;
mod error;
mod filter;
mod memory;
mod record;
mod sqlite;
mod statements;

pub use error::{ErrorClass, RepositoryError, RepositoryResult};
pub use filter::Filter;
pub use memory::MemoryRepository;
pub use record::{Record, RecordValues};
pub use sqlite::SqliteRepository;

use crate::types::RecordDescriptor;

/// Identity of a stored record. `0` marks a record not yet persisted.
pub type Pk = i64;

/// CRUD contract shared by every repository implementation.
pub trait Repository<T: Record> {
    /// Descriptor the repository was built with.
    fn descriptor(&self) -> &RecordDescriptor;

    /// Inserts `record`, writes the assigned identity back and returns it.
    fn add(&self, record: &mut T) -> RepositoryResult<Pk>;

    /// Returns the record with identity `pk`, or None.
    fn get(&self, pk: Pk) -> RepositoryResult<Option<T>>;

    /// Returns every record matching `filter` (all records for None or an
    /// empty filter), in the store's scan order.
    fn get_all(&self, filter: Option<&Filter>) -> RepositoryResult<Vec<T>>;

    /// Overwrites every declared field of the row with `record`'s identity.
    fn update(&self, record: &T) -> RepositoryResult<()>;

    /// Removes the row with identity `pk`.
    fn delete(&self, pk: Pk) -> RepositoryResult<()>;

    /// Removes every row, keeping the table.
    fn delete_all(&self) -> RepositoryResult<()>;
}

impl<T: Record, R: Repository<T> + ?Sized> Repository<T> for &R {
    fn descriptor(&self) -> &RecordDescriptor {
        (**self).descriptor()
    }

    fn add(&self, record: &mut T) -> RepositoryResult<Pk> {
        (**self).add(record)
    }

    fn get(&self, pk: Pk) -> RepositoryResult<Option<T>> {
        (**self).get(pk)
    }

    fn get_all(&self, filter: Option<&Filter>) -> RepositoryResult<Vec<T>> {
        (**self).get_all(filter)
    }

    fn update(&self, record: &T) -> RepositoryResult<()> {
        (**self).update(record)
    }

    fn delete(&self, pk: Pk) -> RepositoryResult<()> {
        (**self).delete(pk)
    }

    fn delete_all(&self) -> RepositoryResult<()> {
        (**self).delete_all()
    }
}
