//! Budget limits and their running totals.

use chrono::NaiveDateTime;
use eyre::{bail, eyre, Result};
use tracing::{debug, info};

use crate::models::{Budget, BudgetInterval, Expense};
use crate::repository::Repository;

pub struct BudgetService<B, E> {
    budgets: B,
    expenses: E,
}

impl<B, E> BudgetService<B, E>
where
    B: Repository<Budget>,
    E: Repository<Expense>,
{
    pub fn new(budgets: B, expenses: E) -> Self {
        Self { budgets, expenses }
    }

    /// Inserts a budget with the default limit for every interval that has
    /// none yet. Returns the budgets created.
    pub fn ensure_defaults(&self) -> Result<Vec<Budget>> {
        let mut created = Vec::new();
        for interval in BudgetInterval::ALL {
            if self.get_by_interval(interval)?.is_none() {
                let mut budget = Budget::new(interval, interval.default_limit());
                self.budgets.add(&mut budget)?;
                created.push(budget);
            }
        }
        if !created.is_empty() {
            info!(created = created.len(), "seeded default budgets");
        }
        Ok(created)
    }

    /// Every budget, ordered Day, Week, Month. Rows with an unreadable
    /// interval sort last.
    pub fn all(&self) -> Result<Vec<Budget>> {
        let mut budgets = self.budgets.get_all(None)?;
        budgets.sort_by_key(|b| {
            b.interval()
                .ok()
                .and_then(|i| BudgetInterval::ALL.iter().position(|x| *x == i))
                .unwrap_or(BudgetInterval::ALL.len())
        });
        Ok(budgets)
    }

    pub fn get_by_interval(&self, interval: BudgetInterval) -> Result<Option<Budget>> {
        Ok(self
            .budgets
            .get_all(None)?
            .into_iter()
            .find(|b| b.interval().ok() == Some(interval)))
    }

    pub fn set_limit(&self, interval: BudgetInterval, limit: f64) -> Result<Budget> {
        if !limit.is_finite() || limit < 0.0 {
            bail!("budget limit must be a non-negative number, got {}", limit);
        }
        let mut budget = self
            .get_by_interval(interval)?
            .ok_or_else(|| eyre!("no {} budget", interval))?;
        budget.limit_amount = limit;
        self.budgets.update(&budget)?;
        debug!(%interval, limit, "updated budget limit");
        Ok(budget)
    }

    /// Recomputes and stores the amount of every budget as of `as_of`.
    pub fn refresh(&self, as_of: NaiveDateTime) -> Result<Vec<Budget>> {
        let mut budgets = self.all()?;
        for budget in &mut budgets {
            budget.update_amount(&self.expenses, as_of)?;
            self.budgets.update(budget)?;
        }
        Ok(budgets)
    }
}
