//! Expense ledger entries.

use chrono::NaiveDateTime;
use eyre::{eyre, Result};
use tracing::debug;

use super::Category;
use crate::repository::{Filter, Pk, Record, RecordValues, Repository, RepositoryResult};
use crate::types::{format_timestamp, FieldType, IntoValue, RecordDescriptor, Value};

/// One spending event, charged to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub date: NaiveDateTime,
    pub amount: f64,
    pub category_id: Pk,
    pub comment: String,
    pub pk: Pk,
}

impl Expense {
    pub fn new(date: NaiveDateTime, amount: f64, category_id: Pk) -> Self {
        Self {
            date,
            amount,
            category_id,
            comment: String::new(),
            pk: 0,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Date, amount, category name and comment, formatted for a table view.
    pub fn display_row<C: Repository<Category>>(&self, categories: &C) -> Result<[String; 4]> {
        let category = categories.get(self.category_id)?.ok_or_else(|| {
            eyre!(
                "expense {} refers to missing category {}",
                self.pk,
                self.category_id
            )
        })?;

        Ok([
            format_timestamp(&self.date),
            self.amount.to_string(),
            category.name,
            self.comment.clone(),
        ])
    }

    /// Deletes every expense charged to `category`. Returns how many went.
    pub fn delete_for_category<E: Repository<Expense>>(expenses: &E, category: Pk) -> Result<usize> {
        let doomed = expenses.get_all(Some(&Filter::new().eq("category_id", category)))?;
        for expense in &doomed {
            expenses.delete(expense.pk)?;
        }
        debug!(category, removed = doomed.len(), "deleted expenses of category");
        Ok(doomed.len())
    }
}

impl Record for Expense {
    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::new("Expense")
            .field("date", FieldType::Timestamp)
            .field("amount", FieldType::Float)
            .foreign_key("category_id", "Category")
            .field("comment", FieldType::Text)
    }

    fn pk(&self) -> Option<Pk> {
        Some(self.pk)
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.date.into_value(),
            self.amount.into_value(),
            self.category_id.into_value(),
            self.comment.clone().into_value(),
        ]
    }

    fn from_values(mut values: RecordValues<'_>) -> RepositoryResult<Self> {
        Ok(Self {
            pk: values.pk(),
            date: values.next()?,
            amount: values.next()?,
            category_id: values.next()?,
            comment: values.next()?,
        })
    }
}
