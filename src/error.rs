//! Error types for the scheduler core.
//!
//! `ValidationError` covers rejected user input and never changes state.
//! `SchedulerError` is what every session operation returns.

use std::path::PathBuf;

use thiserror::Error;

use crate::fields::TaskId;
use crate::session::SessionState;

/// Bad user input: the operation is rejected and nothing is modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("weight {0} is outside the allowed range 1-5")]
    WeightOutOfRange(i64),

    #[error("task name cannot be empty")]
    EmptyName,
}

/// Main error type for scheduler operations.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The store exists but does not hold valid task records.
    #[error("Task store {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Task {0} not found")]
    UnknownTask(TaskId),

    #[error("Session is {0}; this operation needs an active session")]
    NotActive(SessionState),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
