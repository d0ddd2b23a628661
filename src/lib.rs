//! # dt - daily focus list
//!
//! Keeps a backlog of tasks, each with an importance weight from 1 to 5, and
//! every day draws a small weighted-random working set to focus on.
//!
//! - **Weighted draw**: heavier tasks are more likely to be picked; nothing is
//!   picked twice and finished tasks are never picked.
//! - **Daily rollover**: on the first run of a new day, tasks left `Ongoing`
//!   are recorded as incomplete, day counters advance, and every status
//!   resets.
//! - **Soft delete**: finishing a task removes it from the draw but keeps it,
//!   and its history, in the store.
//! - **Local storage**: one JSON file, `~/.dt/tasks.json` by default.
//!
//! ```bash
//! dt add Write the quarterly report --weight 4
//! dt today
//! dt done 2
//! dt list
//! dt shell
//! ```
//!
//! Front ends drive a [`session::Session`], which owns the collection from
//! load to save.

pub mod cli;
pub mod clock;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod rollover;
pub mod selector;
pub mod session;
pub mod task;
