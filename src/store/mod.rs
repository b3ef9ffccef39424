//! # Store Handle
//!
//! A `Store` names one SQLite database file and the per-connection settings
//! applied to it. It holds no open connection: `connect()` opens a fresh
//! connection for each repository operation and the caller drops it when
//! the operation ends, on success and error paths alike.
//!
//! ```text
//! StoreBuilder ──open()──► Store (Arc<StoreConfig>, cheap clone)
//!                             │
//!                             ├── connect() ──► rusqlite::Connection
//!                             │                  (pragmas applied)
//!                             └── repository::<T>() ──► SqliteRepository<T>
//! ```
//!
//! There is no pooling and no caching; concurrent writers are not
//! coordinated beyond what SQLite itself provides.

mod builder;

pub use builder::StoreBuilder;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;

use crate::repository::{Record, RepositoryResult, SqliteRepository};

/// Settings resolved by `StoreBuilder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub foreign_keys: bool,
    pub busy_timeout: Option<Duration>,
}

/// Handle to one SQLite database file.
#[derive(Debug, Clone)]
pub struct Store {
    config: Arc<StoreConfig>,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn from_config(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Opens a new connection with the configured pragmas applied.
    pub fn connect(&self) -> RepositoryResult<Connection> {
        let conn = Connection::open(&self.config.path)?;
        conn.pragma_update(None, "foreign_keys", self.config.foreign_keys)?;
        if let Some(timeout) = self.config.busy_timeout {
            conn.busy_timeout(timeout)?;
        }
        Ok(conn)
    }

    /// Builds a repository for `T` using its own descriptor.
    pub fn repository<T: Record>(&self) -> RepositoryResult<SqliteRepository<T>> {
        SqliteRepository::new(self.clone())
    }
}
