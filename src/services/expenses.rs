//! Expense ledger operations.

use eyre::{eyre, Result};
use tracing::{debug, warn};

use crate::models::{Category, Expense};
use crate::repository::{Pk, Repository};

pub struct ExpenseService<E, C> {
    expenses: E,
    categories: C,
}

impl<E, C> ExpenseService<E, C>
where
    E: Repository<Expense>,
    C: Repository<Category>,
{
    pub fn new(expenses: E, categories: C) -> Self {
        Self {
            expenses,
            categories,
        }
    }

    /// Records `expense` after checking that its category exists.
    pub fn add(&self, mut expense: Expense) -> Result<Expense> {
        self.require_category(expense.category_id)?;
        self.expenses.add(&mut expense)?;
        debug!(pk = expense.pk, amount = expense.amount, "added expense");
        Ok(expense)
    }

    pub fn get(&self, pk: Pk) -> Result<Option<Expense>> {
        Ok(self.expenses.get(pk)?)
    }

    pub fn update(&self, expense: &Expense) -> Result<()> {
        self.require_category(expense.category_id)?;
        self.expenses.update(expense)?;
        Ok(())
    }

    /// Removes the expense. Returns false if there was none with `pk`.
    pub fn remove(&self, pk: Pk) -> Result<bool> {
        match self.expenses.delete(pk) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                warn!(pk, "expense to remove does not exist");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The `limit` newest expenses, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Expense>> {
        let mut all = self.expenses.get_all(None)?;
        all.sort_by(|a, b| b.date.cmp(&a.date));
        all.truncate(limit);
        Ok(all)
    }

    /// `recent(limit)` rendered with `Expense::display_row`.
    pub fn rows(&self, limit: usize) -> Result<Vec<(Pk, [String; 4])>> {
        self.recent(limit)?
            .into_iter()
            .map(|e| -> Result<_> { Ok((e.pk, e.display_row(&self.categories)?)) })
            .collect()
    }

    fn require_category(&self, pk: Pk) -> Result<Category> {
        self.categories
            .get(pk)?
            .ok_or_else(|| eyre!("no category with pk {}", pk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::types::parse_timestamp;

    fn repos() -> (MemoryRepository<Expense>, MemoryRepository<Category>) {
        let categories = MemoryRepository::new();
        categories.add(&mut Category::new("food", None)).unwrap();
        (MemoryRepository::new(), categories)
    }

    fn spent(date: &str, amount: f64) -> Expense {
        Expense::new(parse_timestamp(date).unwrap(), amount, 1)
    }

    #[test]
    fn add_requires_existing_category() {
        let (exps, cats) = repos();
        let service = ExpenseService::new(&exps, &cats);
        let mut orphan = spent("2024-01-01 00:00:00", 1.0);
        orphan.category_id = 99;
        assert!(service.add(orphan).is_err());
        assert!(exps.is_empty());

        let added = service.add(spent("2024-01-01 00:00:00", 1.0)).unwrap();
        assert_eq!(service.get(added.pk).unwrap(), Some(added));
    }

    #[test]
    fn remove_reports_missing_expense_as_false() {
        let (exps, cats) = repos();
        let service = ExpenseService::new(&exps, &cats);
        let added = service.add(spent("2024-01-01 00:00:00", 1.0)).unwrap();
        assert!(service.remove(added.pk).unwrap());
        assert!(!service.remove(added.pk).unwrap());
    }

    #[test]
    fn recent_sorts_newest_first_then_truncates() {
        let (exps, cats) = repos();
        let service = ExpenseService::new(&exps, &cats);
        for date in [
            "2024-03-01 10:00:00",
            "2024-05-01 10:00:00",
            "2024-04-01 10:00:00",
        ] {
            service.add(spent(date, 2.0)).unwrap();
        }

        let rows = service.rows(2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1[0], "2024-05-01 10:00:00");
        assert_eq!(rows[1].1[0], "2024-04-01 10:00:00");
        assert_eq!(rows[0].1[2], "food");
    }
}
