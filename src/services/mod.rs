//! # Bookkeeping Services
//!
//! Application operations over the record repositories. Every service is
//! generic over `Repository`, so the same code runs against SQLite tables
//! and against `MemoryRepository` in tests.
//!
//! `Ledger` wires the three SQLite repositories of one `Store` together and
//! hands out services borrowing them.

mod budgets;
mod categories;
mod expenses;

pub use budgets::BudgetService;
pub use categories::{CategoryNode, CategoryService};
pub use expenses::ExpenseService;

use eyre::{Result, WrapErr};
use tracing::debug;

use crate::models::{Budget, Category, Expense};
use crate::repository::{Record, SqliteRepository};
use crate::store::Store;

/// The three tables of the expense tracker in one store.
#[derive(Debug, Clone)]
pub struct Ledger {
    store: Store,
    categories: SqliteRepository<Category>,
    expenses: SqliteRepository<Expense>,
    budgets: SqliteRepository<Budget>,
}

impl Ledger {
    /// Opens the ledger, creating missing tables and default budgets.
    pub fn open(store: Store) -> Result<Self> {
        let ledger = Self {
            categories: bootstrap(&store)?,
            expenses: bootstrap(&store)?,
            budgets: bootstrap(&store)?,
            store,
        };
        ledger.budgets().ensure_defaults()?;
        Ok(ledger)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn categories(
        &self,
    ) -> CategoryService<&SqliteRepository<Category>, &SqliteRepository<Expense>> {
        CategoryService::new(&self.categories, &self.expenses)
    }

    pub fn expenses(&self) -> ExpenseService<&SqliteRepository<Expense>, &SqliteRepository<Category>> {
        ExpenseService::new(&self.expenses, &self.categories)
    }

    pub fn budgets(&self) -> BudgetService<&SqliteRepository<Budget>, &SqliteRepository<Expense>> {
        BudgetService::new(&self.budgets, &self.expenses)
    }
}

fn bootstrap<T: Record>(store: &Store) -> Result<SqliteRepository<T>> {
    let repo = store.repository::<T>()?;
    repo.create_table()
        .wrap_err_with(|| format!("failed to create table {}", repo.table()))?;
    debug!(table = repo.table(), path = %store.path().display(), "table ready");
    Ok(repo)
}
