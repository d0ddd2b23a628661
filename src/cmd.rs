//! Command implementations for the CLI interface.
//!
//! One-shot subcommands open a session, run a single command, and save on
//! success. A failed command exits non-zero without touching the store. The
//! `shell` subcommand keeps one session alive across many commands and saves
//! when the user quits.

use std::io::{self, BufRead, IsTerminal, Write};

use clap::{Parser, Subcommand};
use clap_complete::{generate, Shell};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::LocalClock;
use crate::cli::ShellLine;
use crate::config::Config;
use crate::db::TaskStore;
use crate::error::Result;
use crate::fields::{SortKey, TaskId};
use crate::session::Session;
use crate::task::Task;

pub type AppSession = Session<LocalClock, StdRng>;

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's working set.
    ///
    /// Each run draws afresh, so repeated one-shot runs on the same day can
    /// show different tasks. Pass --seed for a repeatable draw, or use `dt
    /// shell` to keep one draw for the whole session.
    Today,

    /// Add a new task.
    Add {
        /// Task name.
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        /// Importance weight, 1 (low) to 5 (high).
        #[arg(long, short, allow_negative_numbers = true)]
        weight: i64,
    },

    /// Rename a task.
    Rename {
        id: TaskId,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Change a task's importance weight (1-5).
    Weight {
        id: TaskId,
        #[arg(allow_negative_numbers = true)]
        weight: i64,
    },

    /// Mark a task complete for today.
    Done { id: TaskId },

    /// Mark a task incomplete for today.
    Miss { id: TaskId },

    /// Retire a task permanently; it keeps its history.
    Finish { id: TaskId },

    /// Show every field of a task.
    Show { id: TaskId },

    /// List all tasks, finished ones included.
    List {
        /// Hide finished tasks.
        #[arg(long)]
        open: bool,
        #[arg(long, value_enum, default_value_t = SortKey::Id)]
        sort: SortKey,
    },

    /// Apply the daily rollover if the date changed and redraw the working set.
    Refresh,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Start an interactive session.
    Shell,
}

pub fn open_session(config: &Config) -> AppSession {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Session::new(
        TaskStore::new(config.store_path.clone()),
        LocalClock,
        rng,
        config.session_options(),
    )
}

fn start(session: &mut AppSession) -> Result<Vec<Task>> {
    let working = session.initialize()?;
    if let Some(warning) = session.startup_warning() {
        eprintln!("Warning: {warning}");
        eprintln!("Starting with an empty task list.");
    }
    Ok(working)
}

/// Run a single command against the store and save the result.
pub fn cmd_once(config: &Config, command: Commands) -> Result<()> {
    let mut session = open_session(config);
    start(&mut session)?;
    execute(&mut session, command)?;
    session.shutdown()
}

/// Read commands from stdin until `quit` or end of input.
pub fn cmd_shell(config: &Config) -> Result<()> {
    let mut session = open_session(config);
    let working = start(&mut session)?;
    print_working_set(&working, &session);

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("dt> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            return session.shutdown();
        };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => match session.shutdown() {
                Ok(()) => return Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    eprintln!("Nothing was lost; quit again to retry.");
                    continue;
                }
            },
            _ => {}
        }
        match ShellLine::try_parse_from(words) {
            Ok(parsed) => {
                if let Err(e) = execute(&mut session, parsed.command) {
                    eprintln!("Error: {e}");
                }
            }
            Err(e) => {
                let _ = e.print();
            }
        }
    }
}

pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

/// Dispatch one command against an active session.
pub fn execute(session: &mut AppSession, command: Commands) -> Result<()> {
    match command {
        Commands::Today => {
            let working = session.working_set()?;
            print_working_set(&working, session);
        }
        Commands::Add { name, weight } => {
            let (id, working) = session.add_task(&name.join(" "), weight)?;
            println!("Added task {id}");
            print_working_set(&working, session);
        }
        Commands::Rename { id, name } => {
            session.rename_task(id, &name.join(" "))?;
            println!("Renamed task {id}");
        }
        Commands::Weight { id, weight } => {
            let working = session.change_weight(id, weight)?;
            println!("Task {id} now has weight {weight}");
            print_working_set(&working, session);
        }
        Commands::Done { id } => {
            session.mark_complete(id)?;
            println!("Marked task {id} complete");
        }
        Commands::Miss { id } => {
            session.mark_incomplete(id)?;
            println!("Marked task {id} incomplete");
        }
        Commands::Finish { id } => {
            let working = session.finish_task(id)?;
            println!("Finished task {id}");
            print_working_set(&working, session);
        }
        Commands::Show { id } => print_details(&session.details(id)?),
        Commands::List { open, sort } => {
            let mut tasks = session.list_all()?;
            if open {
                tasks.retain(Task::is_selectable);
            }
            sort_tasks(&mut tasks, sort);
            print_table(&tasks);
        }
        Commands::Refresh => {
            let working = session.refresh()?;
            print_working_set(&working, session);
        }
        Commands::Completions { .. } | Commands::Shell => {
            eprintln!("Not available inside the interactive shell.");
        }
    }
    Ok(())
}

pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::Id => tasks.sort_by_key(|t| t.id),
        SortKey::Weight => tasks.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.id.cmp(&b.id))),
        SortKey::Name => tasks.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        }),
    }
}

fn print_working_set(working: &[Task], session: &AppSession) {
    let open = session
        .list_all()
        .map(|all| all.iter().filter(|t| t.is_selectable()).count())
        .unwrap_or(working.len());
    if working.is_empty() {
        println!("Nothing to focus on today. Add a task with `dt add <name> --weight N`.");
        return;
    }
    println!("Today's focus ({} of {} open tasks):", working.len(), open);
    println!("{:<5} {:<4} {:<11} {}", "ID", "Wt", "Status", "Task");
    for t in working {
        println!("{:<5} {:<4} {:<11} {}", t.id, t.weight, t.status, t.name);
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[Task]) {
    println!(
        "{:<5} {:<4} {:<11} {:<5} {:<5} {:<5} {:<8} {}",
        "ID", "Wt", "Status", "Days", "Done", "Miss", "Finished", "Task"
    );
    for t in tasks {
        println!(
            "{:<5} {:<4} {:<11} {:<5} {:<5} {:<5} {:<8} {}",
            t.id,
            t.weight,
            t.status,
            t.days_worked,
            t.times_completed,
            t.times_incomplete,
            if t.is_finished { "yes" } else { "-" },
            truncate(&t.name, 48)
        );
    }
}

pub fn print_details(task: &Task) {
    println!("ID:               {}", task.id);
    println!("Task:             {}", task.name);
    println!("Weight:           {}", task.weight);
    println!("Status:           {}", task.status);
    println!("Days worked on:   {}", task.days_worked);
    println!("Times completed:  {}", task.times_completed);
    println!("Times incomplete: {}", task.times_incomplete);
    println!("Last updated:     {}", task.last_updated);
    println!("Finished:         {}", if task.is_finished { "yes" } else { "no" });
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
