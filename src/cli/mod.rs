//! # Bookkeeper CLI Module
//!
//! Interactive terminal front end for the expense tracker:
//!
//! - Dot commands for categories, expenses and budgets
//! - ASCII table output
//! - Persistent line history
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CLI Entry Point                        │
//! │                   (bin/bookkeeper.rs)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         REPL Loop                           │
//! │  - Reads input via rustyline                                │
//! │  - Dispatches dot commands to the command handler           │
//! ├─────────────────────────────────────────────────────────────┤
//! │     Commands          │    Table Formatter    │   History   │
//! │  (.expenses,          │  ASCII box drawing    │  Persistent │
//! │   .budgets, ...)      │  for listings         │  ~/.book*   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 services::Ledger (SQLite)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Open or create ./bookkeeper.db (or $BOOKKEEPER_DB)
//! bookkeeper
//!
//! # Open a specific file
//! bookkeeper ~/money/expenses.db
//!
//! # Verbose logging
//! BOOKKEEPER_LOG=debug bookkeeper
//! ```
//!
//! ## Module Organization
//!
//! - `repl`: read-eval-print loop with rustyline integration
//! - `commands`: dot command parsing and execution
//! - `table`: ASCII table formatter
//! - `history`: history file path resolution

pub mod commands;
pub mod history;
pub mod repl;
pub mod table;

pub use repl::Repl;
