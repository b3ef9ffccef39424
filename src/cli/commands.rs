//! # Dot Command Handler
//!
//! Every REPL input is a dot command. The command word is case-insensitive;
//! arguments are whitespace-separated and a double-quoted argument may
//! contain spaces (`.add-category "raw meat" meat`).
//!
//! ## Supported Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `.quit` / `.exit` | Exit the CLI |
//! | `.help` | Show available commands |
//! | `.categories` | Show the category tree |
//! | `.add-category NAME [PARENT]` | Add a category |
//! | `.rename-category NAME NEW` | Rename a category |
//! | `.remove-category NAME` | Remove a category, its subcategories and their expenses |
//! | `.expenses [N]` | Show the N newest expenses (default 20) |
//! | `.add-expense AMOUNT CATEGORY [COMMENT...]` | Record an expense dated now |
//! | `.remove-expense PK` | Remove an expense |
//! | `.budgets` | Recompute and show budgets |
//! | `.limit INTERVAL AMOUNT` | Set the limit of the day, week or month budget |
//!
//! Failures come back as `CommandResult::Error`; the REPL prints them and
//! keeps going.

use chrono::{Local, NaiveDateTime, Timelike};
use eyre::{bail, eyre, Result, WrapErr};

use crate::cli::table::{format_amount, TableFormatter};
use crate::models::{BudgetInterval, Expense};
use crate::repository::Pk;
use crate::services::Ledger;

const DEFAULT_EXPENSE_LIMIT: usize = 20;

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Exit,
    Continue,
    Error(String),
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn is_command(input: &str) -> bool {
        input.trim().starts_with('.')
    }

    pub fn execute(input: &str, ledger: &Ledger) -> CommandResult {
        Self::execute_at(input, ledger, local_now())
    }

    /// Runs `input` with `now` as the current time.
    pub fn execute_at(input: &str, ledger: &Ledger, now: NaiveDateTime) -> CommandResult {
        let parts = match split_args(input.trim()) {
            Ok(parts) => parts,
            Err(e) => return CommandResult::Error(e.to_string()),
        };
        let Some((cmd, args)) = parts.split_first() else {
            return CommandResult::Continue;
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let result = match cmd.to_lowercase().as_str() {
            ".quit" | ".exit" | ".q" => return CommandResult::Exit,
            ".help" | ".h" | ".?" => Ok(help_text()),
            ".categories" => list_categories(ledger),
            ".add-category" => add_category(ledger, &args),
            ".rename-category" => rename_category(ledger, &args),
            ".remove-category" => remove_category(ledger, &args),
            ".expenses" => list_expenses(ledger, &args),
            ".add-expense" => add_expense(ledger, &args, now),
            ".remove-expense" => remove_expense(ledger, &args),
            ".budgets" => list_budgets(ledger, now),
            ".limit" => set_limit(ledger, &args),
            other => Err(eyre!(
                "Unknown command: {}. Type .help for available commands.",
                other
            )),
        };

        match result {
            Ok(text) => CommandResult::Output(text),
            Err(e) => CommandResult::Error(format!("{:#}", e)),
        }
    }
}

fn help_text() -> String {
    r#"Bookkeeper commands:

  .quit, .exit, .q                      Exit
  .help, .h, .?                         Show this help message
  .categories                           Show the category tree
  .add-category NAME [PARENT]           Add a category, optionally under PARENT
  .rename-category NAME NEW             Rename a category
  .remove-category NAME                 Remove a category with its subcategories and expenses
  .expenses [N]                         Show the N newest expenses (default 20)
  .add-expense AMOUNT CATEGORY [TEXT]   Record an expense dated now
  .remove-expense PK                    Remove an expense
  .budgets                              Show day, week and month budgets
  .limit INTERVAL AMOUNT                Set a budget limit (day, week or month)

Quote arguments that contain spaces: .add-category "raw meat" meat
Use Ctrl+D or .quit to exit."#
        .to_string()
}

fn list_categories(ledger: &Ledger) -> Result<String> {
    let rows: Vec<Vec<String>> = ledger
        .categories()
        .tree()?
        .iter()
        .flat_map(|root| root.walk())
        .map(|(depth, c)| {
            vec![
                c.pk.to_string(),
                format!("{}{}", "  ".repeat(depth), c.name),
            ]
        })
        .collect();
    Ok(TableFormatter::new(&["pk", "category"], rows).render())
}

fn add_category(ledger: &Ledger, args: &[&str]) -> Result<String> {
    let (name, parent) = match args {
        [name] => (*name, None),
        [name, parent] => (*name, Some(*parent)),
        _ => bail!("usage: .add-category NAME [PARENT]"),
    };
    let category = ledger.categories().add(name, parent)?;
    Ok(format!("Category {:?} added (pk {})", category.name, category.pk))
}

fn rename_category(ledger: &Ledger, args: &[&str]) -> Result<String> {
    let [name, new_name] = args else {
        bail!("usage: .rename-category NAME NEW");
    };
    let categories = ledger.categories();
    let category = categories.require_by_name(name)?;
    let renamed = categories.rename(category.pk, new_name)?;
    Ok(format!("Category {:?} renamed to {:?}", name, renamed.name))
}

fn remove_category(ledger: &Ledger, args: &[&str]) -> Result<String> {
    let [name] = args else {
        bail!("usage: .remove-category NAME");
    };
    let categories = ledger.categories();
    let category = categories.require_by_name(name)?;
    let removed = categories.remove(category.pk)?;
    Ok(format!("Removed {} categor{}", removed, if removed == 1 { "y" } else { "ies" }))
}

fn list_expenses(ledger: &Ledger, args: &[&str]) -> Result<String> {
    let limit = match args {
        [] => DEFAULT_EXPENSE_LIMIT,
        [n] => n
            .parse::<usize>()
            .wrap_err_with(|| format!("invalid row count {:?}", n))?,
        _ => bail!("usage: .expenses [N]"),
    };

    let rows = ledger
        .expenses()
        .rows(limit)?
        .into_iter()
        .map(|(pk, [date, amount, category, comment])| {
            vec![pk.to_string(), date, amount, category, comment]
        })
        .collect();

    Ok(TableFormatter::new(&["pk", "date", "amount", "category", "comment"], rows).render())
}

fn add_expense(ledger: &Ledger, args: &[&str], now: NaiveDateTime) -> Result<String> {
    let [amount, category, comment @ ..] = args else {
        bail!("usage: .add-expense AMOUNT CATEGORY [COMMENT...]");
    };
    let amount = parse_amount(amount)?;
    let category = ledger.categories().require_by_name(category)?;

    let expense = Expense::new(now, amount, category.pk).with_comment(comment.join(" "));
    let expense = ledger.expenses().add(expense)?;
    Ok(format!("Expense added (pk {})", expense.pk))
}

fn remove_expense(ledger: &Ledger, args: &[&str]) -> Result<String> {
    let [pk] = args else {
        bail!("usage: .remove-expense PK");
    };
    let pk: Pk = pk
        .parse()
        .wrap_err_with(|| format!("invalid expense pk {:?}", pk))?;

    if ledger.expenses().remove(pk)? {
        Ok(format!("Expense {} removed", pk))
    } else {
        Ok(format!("No expense with pk {}", pk))
    }
}

fn list_budgets(ledger: &Ledger, now: NaiveDateTime) -> Result<String> {
    let rows = ledger
        .budgets()
        .refresh(now)?
        .into_iter()
        .map(|b| {
            vec![
                b.interval.clone(),
                format_amount(b.amount),
                format_amount(b.limit_amount),
                if b.is_exceeded() { "exceeded" } else { "ok" }.to_string(),
            ]
        })
        .collect();
    Ok(TableFormatter::new(&["interval", "spent", "limit", "status"], rows).render())
}

fn set_limit(ledger: &Ledger, args: &[&str]) -> Result<String> {
    let [interval, amount] = args else {
        bail!("usage: .limit INTERVAL AMOUNT");
    };
    let interval: BudgetInterval = interval.parse()?;
    let budget = ledger.budgets().set_limit(interval, parse_amount(amount)?)?;
    Ok(format!(
        "{} limit set to {}",
        budget.interval,
        format_amount(budget.limit_amount)
    ))
}

fn parse_amount(text: &str) -> Result<f64> {
    let amount: f64 = text
        .parse()
        .wrap_err_with(|| format!("invalid amount {:?}", text))?;
    if !amount.is_finite() || amount < 0.0 {
        bail!("amount must be a non-negative number, got {}", text);
    }
    Ok(amount)
}

/// Splits on whitespace, keeping double-quoted runs together.
fn split_args(input: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        bail!("unterminated quote");
    }
    if pending {
        args.push(current);
    }
    Ok(args)
}

/// Local wall-clock time in whole seconds.
fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::types::parse_timestamp;
    use tempfile::{tempdir, TempDir};

    fn ledger() -> (TempDir, Ledger) {
        let dir = tempdir().unwrap();
        let store = Store::builder()
            .path(dir.path().join("ledger.db"))
            .open()
            .unwrap();
        (dir, Ledger::open(store).unwrap())
    }

    fn output(result: CommandResult) -> String {
        match result {
            CommandResult::Output(text) => text,
            other => panic!("Expected Output, got {:?}", other),
        }
    }

    fn error(result: CommandResult) -> String {
        match result {
            CommandResult::Error(msg) => msg,
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn is_command_requires_dot_prefix() {
        assert!(CommandHandler::is_command(".quit"));
        assert!(CommandHandler::is_command("  .help"));
        assert!(!CommandHandler::is_command("quit"));
        assert!(!CommandHandler::is_command(""));
    }

    #[test]
    fn split_args_honours_quotes() {
        assert_eq!(
            split_args(r#".add-category "raw meat" meat"#).unwrap(),
            [".add-category", "raw meat", "meat"]
        );
        assert_eq!(split_args(r#"a "" b"#).unwrap(), ["a", "", "b"]);
        assert!(split_args(r#".add-category "open"#).is_err());
    }

    #[test]
    fn quit_and_help() {
        let (_dir, ledger) = ledger();
        assert_eq!(CommandHandler::execute(".quit", &ledger), CommandResult::Exit);
        assert_eq!(CommandHandler::execute(".EXIT", &ledger), CommandResult::Exit);
        let help = output(CommandHandler::execute(".help", &ledger));
        assert!(help.contains(".add-expense"));
        assert!(help.contains(".limit"));
    }

    #[test]
    fn unknown_command_and_bad_usage_are_errors() {
        let (_dir, ledger) = ledger();
        assert!(error(CommandHandler::execute(".bogus", &ledger)).contains("Unknown command"));
        assert!(error(CommandHandler::execute(".add-category", &ledger)).contains("usage"));
        assert!(error(CommandHandler::execute(".remove-expense x", &ledger)).contains("invalid"));
    }

    #[test]
    fn category_commands_maintain_tree() {
        let (_dir, ledger) = ledger();
        output(CommandHandler::execute(".add-category food", &ledger));
        output(CommandHandler::execute(r#".add-category "raw meat" food"#, &ledger));
        output(CommandHandler::execute(".rename-category food groceries", &ledger));

        let tree = output(CommandHandler::execute(".categories", &ledger));
        assert!(tree.contains("groceries"));
        assert!(tree.contains("  raw meat"));

        let removed = output(CommandHandler::execute(".remove-category groceries", &ledger));
        assert_eq!(removed, "Removed 2 categories");
        assert!(output(CommandHandler::execute(".categories", &ledger)).contains("Empty set"));
    }

    #[test]
    fn expense_and_budget_commands() {
        let (_dir, ledger) = ledger();
        let now = parse_timestamp("2024-04-10 12:00:00").unwrap();
        output(CommandHandler::execute(".add-category food", &ledger));

        let added = output(CommandHandler::execute_at(
            ".add-expense 1500 food lunch with friends",
            &ledger,
            now,
        ));
        assert_eq!(added, "Expense added (pk 1)");
        assert!(error(CommandHandler::execute_at(".add-expense -3 food", &ledger, now))
            .contains("non-negative"));

        let listed = output(CommandHandler::execute(".expenses", &ledger));
        assert!(listed.contains("2024-04-10 12:00:00"));
        assert!(listed.contains("lunch with friends"));

        let budgets = output(CommandHandler::execute_at(".budgets", &ledger, now));
        assert!(budgets.contains("| Day      |  1500 |  1000 | exceeded |"));

        output(CommandHandler::execute(".limit day 2000", &ledger));
        let budgets = output(CommandHandler::execute_at(".budgets", &ledger, now));
        assert!(budgets.contains("| Day      |  1500 |  2000 | ok     |"));

        assert_eq!(
            output(CommandHandler::execute(".remove-expense 1", &ledger)),
            "Expense 1 removed"
        );
        assert_eq!(
            output(CommandHandler::execute(".remove-expense 1", &ledger)),
            "No expense with pk 1"
        );
    }
}
