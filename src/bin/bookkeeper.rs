//! # Bookkeeper CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Open or create the default database (./bookkeeper.db or $BOOKKEEPER_DB)
//! bookkeeper
//!
//! # Open or create a specific database file
//! bookkeeper ./expenses.db
//!
//! # Show version / help
//! bookkeeper --version
//! bookkeeper --help
//! ```
//!
//! Logging goes to stderr and is filtered by `BOOKKEEPER_LOG` (an
//! `EnvFilter` directive such as `debug` or `bookkeeper=trace`); the
//! default level is `warn`.

use std::env;
use std::path::PathBuf;

use bookkeeper::cli::Repl;
use bookkeeper::services::Ledger;
use bookkeeper::store::Store;
use eyre::{bail, Result, WrapErr};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_FILE: &str = "bookkeeper.db";
const DB_ENV_VAR: &str = "BOOKKEEPER_DB";
const LOG_ENV_VAR: &str = "BOOKKEEPER_LOG";

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let mut db_path: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("bookkeeper {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                bail!("Unknown option: {}", flag);
            }
            path => {
                if db_path.is_some() {
                    bail!("Multiple database paths specified");
                }
                db_path = Some(PathBuf::from(path));
            }
        }
    }

    let db_path = db_path
        .or_else(|| env::var_os(DB_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

    let store = Store::builder().path(&db_path).open()?;
    let ledger = Ledger::open(store)
        .wrap_err_with(|| format!("failed to open ledger at {:?}", db_path))?;

    let mut repl = Repl::new(ledger)?;
    repl.run()?;

    Ok(())
}

fn print_usage() {
    println!("Bookkeeper - personal expense tracker");
    println!();
    println!("USAGE:");
    println!("    bookkeeper [OPTIONS] [DATABASE_PATH]");
    println!();
    println!("ARGS:");
    println!("    <DATABASE_PATH>    SQLite file to use (default: ${} or ./{})", DB_ENV_VAR, DEFAULT_DB_FILE);
    println!();
    println!("OPTIONS:");
    println!("    -h, --help         Print help information");
    println!("    -v, --version      Print version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}      Default database path", DB_ENV_VAR);
    println!("    {}     Log filter (default: warn)", LOG_ENV_VAR);
    println!("    BOOKKEEPER_HISTORY Line history file (empty disables)");
}
