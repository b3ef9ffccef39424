//! # REPL - Read-Eval-Print Loop
//!
//! Reads lines with rustyline (history, line editing), hands dot commands
//! to `CommandHandler` and prints whatever comes back.
//!
//! ```text
//! readline ──► blank? ──yes──► [loop]
//!                │ no
//!                ▼
//!          starts with '.'? ──no──► print hint
//!                │ yes
//!                ▼
//!          CommandHandler::execute ──► Exit ──► save history, return
//!                │
//!                ▼
//!          print output / error ──► [loop]
//! ```
//!
//! Command errors are printed and do not end the loop. Ctrl+C clears the
//! line; Ctrl+D or `.quit` exits.

use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::cli::commands::{CommandHandler, CommandResult};
use crate::cli::history::history_path;
use crate::services::Ledger;

const PROMPT: &str = "bookkeeper> ";

pub struct Repl {
    ledger: Ledger,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(ledger: Ledger) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        if let Some(history_file) = history_path() {
            let _ = editor.load_history(&history_file);
        }

        Ok(Self { ledger, editor })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye");
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return true;
        }

        self.editor.add_history_entry(trimmed).ok();

        if !CommandHandler::is_command(trimmed) {
            eprintln!("Commands start with '.'. Enter \".help\" for usage hints.");
            return true;
        }

        match CommandHandler::execute(trimmed, &self.ledger) {
            CommandResult::Exit => false,
            CommandResult::Output(text) => {
                println!("{}", text);
                true
            }
            CommandResult::Continue => true,
            CommandResult::Error(msg) => {
                eprintln!("Error: {}", msg);
                true
            }
        }
    }

    fn print_welcome(&self) {
        println!("Bookkeeper version {}", env!("CARGO_PKG_VERSION"));
        println!("Enter \".help\" for usage hints.");
        println!("Connected to: {}", self.ledger.store().path().display());
        println!();
    }

    fn save_history(&mut self) {
        if let Some(history_file) = history_path() {
            if let Err(e) = self.editor.save_history(&history_file) {
                warn!(path = %history_file.display(), error = %e, "could not save history");
            }
        }
    }
}
