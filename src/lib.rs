//! # Bookkeeper - Expense Tracker over a Generic SQLite Repository
//!
//! Bookkeeper persists plain Rust records in SQLite without per-type SQL.
//! A record type describes its fields once; a generic repository derives
//! the table, the statements and the row mapping from that description.
//! On top of it sit the expense tracker's records (categories, expenses,
//! budgets), the services that manipulate them and a terminal front end.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bookkeeper::{Filter, Record, Repository, Store};
//! use bookkeeper::models::Category;
//!
//! let store = Store::builder().path("./ledger.db").open()?;
//! let categories = store.repository::<Category>()?;
//! categories.create_table()?;
//!
//! let mut food = Category::new("food", None);
//! let pk = categories.add(&mut food)?;
//!
//! let children = categories.get_all(Some(&Filter::new().eq("parent", pk)))?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      cli (REPL, dot commands)        │
//! ├─────────────────────────────────────┤
//! │   services (Ledger, *Service)        │
//! ├─────────────────────────────────────┤
//! │  models (Category, Expense, Budget)  │
//! ├─────────────────────────────────────┤
//! │ repository (Repository<T>, Filter)   │
//! │   SqliteRepository │ MemoryRepository│
//! ├─────────────────────────────────────┤
//! │ types (Value, RecordDescriptor)      │
//! ├─────────────────────────────────────┤
//! │ store (Store, StoreBuilder)          │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`types`]: field types, nullable values, record descriptors
//! - [`repository`]: the `Record` and `Repository` contracts and both
//!   implementations
//! - [`store`]: database file location and per-connection settings
//! - [`models`]: the expense tracker's record types
//! - [`services`]: category, expense and budget operations
//! - [`cli`]: the interactive terminal front end

pub mod cli;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;
pub mod types;

pub use repository::{
    ErrorClass, Filter, MemoryRepository, Pk, Record, RecordValues, Repository, RepositoryError,
    RepositoryResult, SqliteRepository,
};
pub use store::{Store, StoreBuilder, StoreConfig};
pub use types::{FieldDef, FieldType, FromValue, IntoValue, RecordDescriptor, Value};
