//! # Bookkeeping Records
//!
//! The three record types of the expense tracker. Each implements `Record`
//! and therefore works with any `Repository`.
//!
//! ```text
//! Category ◄──parent── Category
//!    ▲
//!    └──category_id── Expense
//!
//! Budget (standalone; amount derived from Expense rows)
//! ```

mod budget;
mod category;
mod expense;

pub use budget::{Budget, BudgetInterval};
pub use category::Category;
pub use expense::Expense;
