//! # Integration Tests for the Bookkeeping Services
//!
//! Exercises `Ledger` and its services on a real SQLite file: table
//! bootstrap, the category tree with cascading removal, the expense ledger
//! and budget totals.
//!
//! ```sh
//! cargo test --test services
//! ```

use tempfile::{tempdir, TempDir};

use bookkeeper::models::{BudgetInterval, Category, Expense};
use bookkeeper::services::Ledger;
use bookkeeper::types::parse_timestamp;
use bookkeeper::{Repository, Store};

fn ledger() -> (TempDir, Ledger) {
    let dir = tempdir().unwrap();
    let store = Store::builder()
        .path(dir.path().join("nested").join("ledger.db"))
        .open()
        .unwrap();
    (dir, Ledger::open(store).unwrap())
}

fn expense(ledger: &Ledger, date: &str, amount: f64, category: &str) -> Expense {
    let category = ledger.categories().require_by_name(category).unwrap();
    ledger
        .expenses()
        .add(Expense::new(parse_timestamp(date).unwrap(), amount, category.pk))
        .unwrap()
}

#[test]
fn open_creates_tables_and_default_budgets_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let first = Ledger::open(Store::builder().path(&path).open().unwrap()).unwrap();
    first.budgets().set_limit(BudgetInterval::Week, 123.0).unwrap();
    drop(first);

    let second = Ledger::open(Store::builder().path(&path).open().unwrap()).unwrap();
    let budgets = second.budgets().all().unwrap();
    assert_eq!(budgets.len(), 3);
    assert_eq!(budgets[1].interval, "Week");
    assert_eq!(budgets[1].limit_amount, 123.0);
}

#[test]
fn category_tree_from_flat_list() {
    let (_dir, ledger) = ledger();
    let store = ledger.store().clone();
    let categories = store.repository::<Category>().unwrap();

    Category::create_from_tree(
        &[
            ("продукты", None),
            ("мясо", Some("продукты")),
            ("сырое мясо", Some("мясо")),
            ("сладости", Some("продукты")),
            ("книги", None),
        ],
        &categories,
    )
    .unwrap();

    let forest = ledger.categories().tree().unwrap();
    let names: Vec<Vec<(usize, String)>> = forest
        .iter()
        .map(|root| {
            root.walk()
                .into_iter()
                .map(|(depth, c)| (depth, c.name.clone()))
                .collect()
        })
        .collect();

    assert_eq!(
        names,
        vec![
            vec![
                (0, "продукты".to_string()),
                (1, "мясо".to_string()),
                (2, "сырое мясо".to_string()),
                (1, "сладости".to_string()),
            ],
            vec![(0, "книги".to_string())],
        ]
    );
}

#[test]
fn removing_category_cascades_under_foreign_keys() {
    let (_dir, ledger) = ledger();
    let categories = ledger.categories();
    categories.add("food", None).unwrap();
    categories.add("meat", Some("food")).unwrap();
    categories.add("raw meat", Some("meat")).unwrap();
    categories.add("books", None).unwrap();

    expense(&ledger, "2024-04-01 10:00:00", 10.0, "raw meat");
    expense(&ledger, "2024-04-01 11:00:00", 20.0, "meat");
    let kept = expense(&ledger, "2024-04-01 12:00:00", 30.0, "books");

    let food = categories.require_by_name("food").unwrap();
    assert_eq!(categories.remove(food.pk).unwrap(), 3);

    let left: Vec<_> = categories.all().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(left, ["books"]);
    assert_eq!(ledger.expenses().recent(10).unwrap(), [kept]);
}

#[test]
fn expenses_are_listed_newest_first() {
    let (_dir, ledger) = ledger();
    ledger.categories().add("test_category", None).unwrap();

    expense(&ledger, "1984-11-25 09:28:34", 100.0, "test_category");
    let newest = expense(&ledger, "2024-01-01 00:00:00", 5.25, "test_category");

    let rows = ledger.expenses().rows(20).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, newest.pk);
    assert_eq!(
        rows[1].1,
        ["1984-11-25 09:28:34", "100", "test_category", ""]
    );
}

#[test]
fn expense_for_missing_category_is_rejected() {
    let (_dir, ledger) = ledger();
    let date = parse_timestamp("2024-01-01 00:00:00").unwrap();
    assert!(ledger.expenses().add(Expense::new(date, 1.0, 77)).is_err());
    assert!(ledger.expenses().recent(10).unwrap().is_empty());
}

#[test]
fn removing_missing_expense_reports_false() {
    let (_dir, ledger) = ledger();
    ledger.categories().add("food", None).unwrap();
    let spent = expense(&ledger, "2024-01-01 00:00:00", 1.0, "food");

    assert!(ledger.expenses().remove(spent.pk).unwrap());
    assert!(!ledger.expenses().remove(spent.pk).unwrap());
}

#[test]
fn budgets_track_day_week_and_month() {
    let (_dir, ledger) = ledger();
    ledger.categories().add("food", None).unwrap();
    for day in 1..=10 {
        expense(&ledger, &format!("2024-04-{:02} 12:00:00", day), 1000.0, "food");
    }

    let as_of = parse_timestamp("2024-04-10 20:00:00").unwrap();
    let budgets = ledger.budgets().refresh(as_of).unwrap();
    let amounts: Vec<_> = budgets.iter().map(|b| (b.interval.as_str(), b.amount)).collect();
    assert_eq!(
        amounts,
        [("Day", 1000.0), ("Week", 7000.0), ("Month", 10000.0)]
    );

    let stored = ledger
        .store()
        .repository::<bookkeeper::models::Budget>()
        .unwrap()
        .get_all(None)
        .unwrap();
    assert!(stored.iter().all(|b| b.amount > 0.0));
    assert!(!budgets.iter().any(|b| b.is_exceeded()));

    ledger.budgets().set_limit(BudgetInterval::Day, 999.0).unwrap();
    let day = ledger
        .budgets()
        .refresh(as_of)
        .unwrap()
        .into_iter()
        .find(|b| b.interval == "Day")
        .unwrap();
    assert!(day.is_exceeded());
}
