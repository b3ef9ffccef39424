//! Spending budgets per time window.
//!
//! A budget row stores its interval as text (`Day`, `Week`, `Month`) so the
//! table stays readable from plain SQL. `BudgetInterval` is the parsed form.
//!
//! | Interval | Window anchored at `as_of` |
//! |----------|----------------------------|
//! | Day | the calendar date of `as_of` |
//! | Week | the seven calendar days ending on `as_of`'s date |
//! | Month | the calendar month of `as_of` |

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDateTime};
use eyre::{bail, Result};

use super::Expense;
use crate::repository::{Pk, Record, RecordValues, Repository, RepositoryResult};
use crate::types::{FieldType, IntoValue, RecordDescriptor, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetInterval {
    Day,
    Week,
    Month,
}

impl BudgetInterval {
    pub const ALL: [BudgetInterval; 3] = [Self::Day, Self::Week, Self::Month];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    /// Limit a freshly created budget of this interval starts with.
    pub fn default_limit(&self) -> f64 {
        match self {
            Self::Day => 1000.0,
            Self::Week => 7000.0,
            Self::Month => 30000.0,
        }
    }

    /// Returns true if `date` falls in this interval's window ending at `as_of`.
    pub fn contains(&self, date: NaiveDateTime, as_of: NaiveDateTime) -> bool {
        let (day, anchor) = (date.date(), as_of.date());
        match self {
            Self::Day => day == anchor,
            Self::Week => day <= anchor && day > anchor - Duration::days(7),
            Self::Month => day.year() == anchor.year() && day.month() == anchor.month(),
        }
    }
}

impl fmt::Display for BudgetInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BudgetInterval {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => bail!("unknown budget interval {:?} (expected day, week or month)", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub interval: String,
    pub amount: f64,
    pub limit_amount: f64,
    pub pk: Pk,
}

impl Budget {
    pub fn new(interval: BudgetInterval, limit_amount: f64) -> Self {
        Self {
            interval: interval.label().to_string(),
            amount: 0.0,
            limit_amount,
            pk: 0,
        }
    }

    pub fn interval(&self) -> Result<BudgetInterval> {
        self.interval.parse()
    }

    /// Recomputes `amount` as the sum of expenses inside the window.
    pub fn update_amount<E: Repository<Expense>>(
        &mut self,
        expenses: &E,
        as_of: NaiveDateTime,
    ) -> Result<()> {
        let interval = self.interval()?;
        self.amount = expenses
            .get_all(None)?
            .iter()
            .filter(|e| interval.contains(e.date, as_of))
            .map(|e| e.amount)
            .sum();
        Ok(())
    }

    pub fn is_exceeded(&self) -> bool {
        self.amount > self.limit_amount
    }

    pub fn remaining(&self) -> f64 {
        self.limit_amount - self.amount
    }
}

impl Record for Budget {
    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::new("Budget")
            .field("interval", FieldType::Text)
            .field("amount", FieldType::Float)
            .field("limit_amount", FieldType::Float)
    }

    fn pk(&self) -> Option<Pk> {
        Some(self.pk)
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.interval.clone().into_value(),
            self.amount.into_value(),
            self.limit_amount.into_value(),
        ]
    }

    fn from_values(mut values: RecordValues<'_>) -> RepositoryResult<Self> {
        Ok(Self {
            pk: values.pk(),
            interval: values.next()?,
            amount: values.next()?,
            limit_amount: values.next()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::types::parse_timestamp;

    fn at(text: &str) -> NaiveDateTime {
        parse_timestamp(text).unwrap()
    }

    #[test]
    fn interval_parses_case_insensitively() {
        assert_eq!("DAY".parse::<BudgetInterval>().unwrap(), BudgetInterval::Day);
        assert_eq!(" week ".parse::<BudgetInterval>().unwrap(), BudgetInterval::Week);
        assert_eq!("Month".parse::<BudgetInterval>().unwrap(), BudgetInterval::Month);
        assert!("year".parse::<BudgetInterval>().is_err());
    }

    #[test]
    fn update_amount_sums_each_window() {
        let expenses = MemoryRepository::<Expense>::new();
        for day in 1..=10 {
            let date = at(&format!("2024-04-{:02} 12:00:00", day));
            expenses.add(&mut Expense::new(date, 1000.0, 1)).unwrap();
        }

        let as_of = at("2024-04-10 18:00:00");
        let mut day = Budget::new(BudgetInterval::Day, 1000.0);
        let mut week = Budget::new(BudgetInterval::Week, 7000.0);
        let mut month = Budget::new(BudgetInterval::Month, 30000.0);
        for budget in [&mut day, &mut week, &mut month] {
            budget.update_amount(&expenses, as_of).unwrap();
        }

        assert_eq!(day.amount, 1000.0);
        assert_eq!(week.amount, 7000.0);
        assert_eq!(month.amount, 10000.0);
        assert!(!week.is_exceeded());
        assert_eq!(month.remaining(), 20000.0);
    }

    #[test]
    fn month_window_ignores_previous_month() {
        let expenses = MemoryRepository::<Expense>::new();
        expenses
            .add(&mut Expense::new(at("2024-03-31 23:59:59"), 50.0, 1))
            .unwrap();
        expenses
            .add(&mut Expense::new(at("2024-04-01 00:00:00"), 20.0, 1))
            .unwrap();

        let mut month = Budget::new(BudgetInterval::Month, 10.0);
        month.update_amount(&expenses, at("2024-04-02 08:00:00")).unwrap();
        assert_eq!(month.amount, 20.0);
        assert!(month.is_exceeded());
    }

    #[test]
    fn unknown_interval_text_is_an_error() {
        let expenses = MemoryRepository::<Expense>::new();
        let mut budget = Budget::new(BudgetInterval::Day, 1.0);
        budget.interval = "fortnight".to_string();
        assert!(budget
            .update_amount(&expenses, at("2024-01-01 00:00:00"))
            .is_err());
    }
}
