//! # History File Location
//!
//! REPL history lives in `~/.bookkeeper_history` unless the
//! `BOOKKEEPER_HISTORY` environment variable names another file:
//!
//! ```bash
//! export BOOKKEEPER_HISTORY=/tmp/bk_history
//! bookkeeper ./expenses.db
//! ```
//!
//! An empty `BOOKKEEPER_HISTORY` disables persistence. The path is resolved
//! once at startup; rustyline does the file I/O.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_HISTORY_FILE: &str = ".bookkeeper_history";
pub const HISTORY_ENV_VAR: &str = "BOOKKEEPER_HISTORY";

pub fn history_path() -> Option<PathBuf> {
    let home = env::var_os("HOME").map(PathBuf::from);
    resolve(env::var(HISTORY_ENV_VAR).ok().as_deref(), home.as_deref())
}

fn resolve(custom: Option<&str>, home: Option<&Path>) -> Option<PathBuf> {
    match custom {
        Some("") => None,
        Some(path) => Some(PathBuf::from(path)),
        None => home.map(|h| h.join(DEFAULT_HISTORY_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_history_path_is_in_home() {
        let path = resolve(None, Some(Path::new("/home/ann")));
        assert_eq!(path, Some(PathBuf::from("/home/ann/.bookkeeper_history")));
        assert_eq!(resolve(None, None), None);
    }

    #[test]
    fn custom_history_path_wins_over_home() {
        let path = resolve(Some("/custom/path"), Some(Path::new("/home/ann")));
        assert_eq!(path, Some(PathBuf::from("/custom/path")));
    }

    #[test]
    fn empty_override_disables_history() {
        assert_eq!(resolve(Some(""), Some(Path::new("/home/ann"))), None);
    }
}
