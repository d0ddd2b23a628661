//! Runtime configuration resolved from flags, environment, and defaults.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::selector::DEFAULT_LIMIT;
use crate::session::SessionOptions;

/// Directory under the home directory holding the default store.
pub const DATA_DIR: &str = ".dt";
pub const STORE_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub selection_limit: usize,
    /// Fixed seed for reproducible draws; entropy when unset.
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            store_path: cli.db.clone().unwrap_or_else(default_store_path),
            selection_limit: cli.limit.unwrap_or(DEFAULT_LIMIT),
            seed: cli.seed,
            verbose: cli.verbose,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            selection_limit: self.selection_limit,
            ..SessionOptions::default()
        }
    }
}

/// `~/.dt/tasks.json`, or `./.dt/tasks.json` when no home directory is known.
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR)
        .join(STORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dt", "today"]).unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.selection_limit, DEFAULT_LIMIT);
        assert_eq!(config.seed, None);
        assert!(config.store_path.ends_with(".dt/tasks.json"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "dt", "--db", "/tmp/x.json", "--limit", "3", "--seed", "9", "list",
        ])
        .unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.store_path, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.session_options().selection_limit, 3);
    }
}
