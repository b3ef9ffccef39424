//! # Store Builder
//!
//! `StoreBuilder` configures where the ledger lives and how each connection
//! is prepared, then `open()` validates the settings and returns a `Store`.
//!
//! ## Configuration Options
//!
//! | Option        | Default  | Description                                  |
//! |---------------|----------|----------------------------------------------|
//! | path          | required | SQLite database file                         |
//! | foreign_keys  | true     | `PRAGMA foreign_keys` set on each connection |
//! | busy_timeout  | none     | Engine busy timeout for locked databases     |
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::builder()
//!     .path("./ledger.db")
//!     .busy_timeout(Duration::from_millis(250))
//!     .open()?;
//! ```
//!
//! Every repository operation opens its own connection, so an in-memory
//! database (`:memory:`) would vanish between calls and is rejected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{bail, Result, WrapErr};

use super::{Store, StoreConfig};

const MEMORY_PATH: &str = ":memory:";

/// Builder for configuring and opening a `Store`.
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    path: Option<PathBuf>,
    foreign_keys: Option<bool>,
    busy_timeout: Option<Duration>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database file. Parent directories are created on `open()`.
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables or disables foreign-key enforcement on every connection.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = Some(enabled);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    /// Validates the configuration and checks that the file can be opened.
    pub fn open(self) -> Result<Store> {
        let path = match self.path {
            Some(p) => p,
            None => bail!("store path not configured: call .path() before .open()"),
        };

        if path.as_os_str() == MEMORY_PATH {
            bail!("in-memory databases are not supported: every operation opens a new connection");
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create directory {:?}", parent))?;
        }

        let store = Store::from_config(StoreConfig {
            path,
            foreign_keys: self.foreign_keys.unwrap_or(true),
            busy_timeout: self.busy_timeout,
        });

        store
            .connect()
            .wrap_err_with(|| format!("failed to open database at {:?}", store.path()))?;

        tracing::debug!(path = ?store.path(), "store opened");
        Ok(store)
    }
}
