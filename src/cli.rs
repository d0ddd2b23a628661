use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Daily focus list drawn from a weighted task backlog.
/// Storage defaults to ~/.dt/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "dt", version, about = "Daily focus list drawn from a weighted task backlog")]
pub struct Cli {
    /// Path to the JSON task store.
    #[arg(long, global = true, env = "DT_DB")]
    pub db: Option<PathBuf>,

    /// Number of tasks in the daily working set.
    #[arg(long, global = true, env = "DT_LIMIT")]
    pub limit: Option<usize>,

    /// Seed the random draw for reproducible output.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log debug detail to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Defaults to `today`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Grammar for one line typed into the interactive shell.
#[derive(Parser)]
#[command(name = "dt", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}
