//! File-backed task store.
//!
//! The whole collection, finished tasks included, lives in one JSON file:
//!
//! ```json
//! { "tasks": [ { "id": 1, "name": "...", "weight": 3, "status": "Ongoing",
//!               "days_worked": 0, "times_completed": 0, "times_incomplete": 0,
//!               "last_updated": "2024-03-01", "is_finished": false } ] }
//! ```
//!
//! A bare top-level array of the same records, without `id`, is also read.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, SchedulerError};
use crate::fields::TaskId;
use crate::task::Task;

#[derive(Debug, Deserialize)]
struct StoreFile {
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    tasks: &'a [Task],
}

/// Reads and writes the task collection at a fixed path.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every stored task. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task store yet");
            return Ok(Vec::new());
        }
        let mut buf = String::new();
        match File::open(&self.path) {
            Ok(mut f) => {
                f.read_to_string(&mut buf).map_err(|e| match e.kind() {
                    ErrorKind::InvalidData => self.corrupt("file is not valid UTF-8"),
                    _ => e.into(),
                })?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }

        let mut tasks = self.parse(&buf)?;
        self.check_and_assign_ids(&mut tasks)?;
        info!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Write the full collection using a temp file + rename.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.sibling(".tmp");
        let data = serde_json::to_string_pretty(&StoreFileRef { tasks })?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Move an unreadable store out of the way so it survives the next save.
    pub fn quarantine(&self) -> Result<PathBuf> {
        let target = self.sibling(".corrupt");
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("tasks.json"));
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn corrupt(&self, reason: impl Into<String>) -> SchedulerError {
        SchedulerError::CorruptStore {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn parse(&self, buf: &str) -> Result<Vec<Task>> {
        let value: Value = serde_json::from_str(buf).map_err(|e| self.corrupt(e.to_string()))?;
        let parsed = match value {
            Value::Array(_) => serde_json::from_value::<Vec<Task>>(value),
            Value::Object(_) => serde_json::from_value::<StoreFile>(value).map(|f| f.tasks),
            _ => return Err(self.corrupt("expected a list of tasks")),
        };
        parsed.map_err(|e| self.corrupt(e.to_string()))
    }

    fn check_and_assign_ids(&self, tasks: &mut [Task]) -> Result<()> {
        let mut seen = HashSet::new();
        for t in tasks.iter() {
            if t.name.trim().is_empty() {
                return Err(self.corrupt("task with an empty name"));
            }
            if t.id != TaskId(0) && !seen.insert(t.id) {
                return Err(self.corrupt(format!("duplicate task id {}", t.id)));
            }
        }

        let mut next = tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
        for t in tasks.iter_mut().filter(|t| t.id == TaskId(0)) {
            t.id = TaskId(next);
            next += 1;
        }
        Ok(())
    }
}
