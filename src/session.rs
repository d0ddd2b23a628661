//! Session controller: the command surface a front end drives.
//!
//! A session owns the in-memory task collection for its lifetime and moves
//! through `Uninitialized -> Loaded -> Active -> Closed`. Loading seeds an
//! empty store with one placeholder task and applies the daily rollover;
//! activation draws the working set. Every edit that changes who is eligible
//! (new task, weight change, finish) draws again. Shutting down writes the
//! full collection back; if that fails the session stays active so the
//! caller can retry.

use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::db::TaskStore;
use crate::error::{Result, SchedulerError};
use crate::fields::{Status, TaskId};
use crate::rollover::roll_over;
use crate::selector::{WeightedSelector, DEFAULT_LIMIT};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loaded,
    Active,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Loaded => "loaded",
            SessionState::Active => "active",
            SessionState::Closed => "closed",
        })
    }
}

/// What to do when the store exists but cannot be read as tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptStorePolicy {
    /// Move the bad file aside, warn, and start from an empty collection.
    /// If the file cannot be moved, `initialize` fails as with `Fail`.
    #[default]
    StartFresh,
    /// Fail `initialize` with the corrupt-store error.
    Fail,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub selection_limit: usize,
    pub seed_task_name: String,
    pub seed_task_weight: i64,
    pub corrupt_store: CorruptStorePolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            selection_limit: DEFAULT_LIMIT,
            seed_task_name: "Add tasks".to_string(),
            seed_task_weight: 4,
            corrupt_store: CorruptStorePolicy::default(),
        }
    }
}

pub struct Session<C, R> {
    store: TaskStore,
    clock: C,
    selector: WeightedSelector<R>,
    options: SessionOptions,
    state: SessionState,
    tasks: Vec<Task>,
    working_set: Vec<TaskId>,
    startup_warning: Option<String>,
}

impl<C: Clock, R: Rng> Session<C, R> {
    pub fn new(store: TaskStore, clock: C, rng: R, options: SessionOptions) -> Self {
        let selector = WeightedSelector::new(rng, options.selection_limit);
        Session {
            store,
            clock,
            selector,
            options,
            state: SessionState::Uninitialized,
            tasks: Vec::new(),
            working_set: Vec::new(),
            startup_warning: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Set when `initialize` recovered from a corrupt store.
    pub fn startup_warning(&self) -> Option<&str> {
        self.startup_warning.as_deref()
    }

    /// Load, seed if empty, roll over, and draw the day's working set.
    pub fn initialize(&mut self) -> Result<Vec<Task>> {
        match self.state {
            SessionState::Uninitialized => {}
            SessionState::Active => return Ok(self.snapshot_working_set()),
            other => return Err(SchedulerError::NotActive(other)),
        }

        let today = self.clock.today();
        let mut tasks = match self.store.load() {
            Ok(tasks) => tasks,
            Err(err @ SchedulerError::CorruptStore { .. })
                if self.options.corrupt_store == CorruptStorePolicy::StartFresh =>
            {
                // Only start fresh once the corrupt file is out of the way.
                if let Err(e) = self.store.quarantine() {
                    warn!("could not move corrupt store aside: {e}");
                    return Err(err);
                }
                warn!("{err}; starting with an empty task list");
                self.startup_warning = Some(err.to_string());
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        if tasks.is_empty() {
            let seed = Task::new(
                TaskId(1),
                &self.options.seed_task_name,
                self.options.seed_task_weight,
                today,
            )?;
            info!(name = %seed.name, "seeding empty store");
            tasks.push(seed);
        }

        let rolled = roll_over(&mut tasks, today);
        debug!(rolled, %today, "applied daily rollover");
        self.tasks = tasks;
        self.state = SessionState::Loaded;

        self.reselect();
        self.state = SessionState::Active;
        Ok(self.snapshot_working_set())
    }

    /// Append a new task and redraw. Returns its id and the new working set.
    pub fn add_task(&mut self, name: &str, weight: i64) -> Result<(TaskId, Vec<Task>)> {
        self.require_active()?;
        let id = self.next_id();
        let task = Task::new(id, name, weight, self.clock.today())?;
        info!(%id, name = %task.name, weight = %task.weight, "added task");
        self.tasks.push(task);
        self.reselect();
        Ok((id, self.snapshot_working_set()))
    }

    pub fn rename_task(&mut self, id: TaskId, name: &str) -> Result<()> {
        self.task_mut(id)?.rename(name)?;
        Ok(())
    }

    /// Change a task's weight and redraw. A rejected weight changes nothing.
    pub fn change_weight(&mut self, id: TaskId, weight: i64) -> Result<Vec<Task>> {
        self.task_mut(id)?.set_weight(weight)?;
        self.reselect();
        Ok(self.snapshot_working_set())
    }

    pub fn mark_complete(&mut self, id: TaskId) -> Result<()> {
        self.task_mut(id)?.update_status(Status::Complete);
        Ok(())
    }

    pub fn mark_incomplete(&mut self, id: TaskId) -> Result<()> {
        self.task_mut(id)?.update_status(Status::Incomplete);
        Ok(())
    }

    /// Retire a task from selection for good and redraw.
    pub fn finish_task(&mut self, id: TaskId) -> Result<Vec<Task>> {
        self.task_mut(id)?.finish();
        self.reselect();
        Ok(self.snapshot_working_set())
    }

    pub fn details(&self, id: TaskId) -> Result<Task> {
        self.require_active()?;
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(SchedulerError::UnknownTask(id))
    }

    /// Every task, finished or not.
    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.require_active()?;
        Ok(self.tasks.clone())
    }

    pub fn working_set(&self) -> Result<Vec<Task>> {
        self.require_active()?;
        Ok(self.snapshot_working_set())
    }

    /// Re-apply rollover for the current date and redraw.
    pub fn refresh(&mut self) -> Result<Vec<Task>> {
        self.require_active()?;
        let rolled = roll_over(&mut self.tasks, self.clock.today());
        if rolled > 0 {
            info!(rolled, "new day detected during session");
        }
        self.reselect();
        Ok(self.snapshot_working_set())
    }

    /// Persist everything and release in-memory state.
    pub fn shutdown(&mut self) -> Result<()> {
        self.require_active()?;
        self.store.save(&self.tasks)?;
        self.tasks.clear();
        self.working_set.clear();
        self.state = SessionState::Closed;
        debug!("session closed");
        Ok(())
    }

    fn require_active(&self) -> Result<()> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(SchedulerError::NotActive(self.state))
        }
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.require_active()?;
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(SchedulerError::UnknownTask(id))
    }

    fn next_id(&self) -> TaskId {
        TaskId(self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1)
    }

    fn reselect(&mut self) {
        self.working_set = self.selector.select(&self.tasks);
    }

    fn snapshot_working_set(&self) -> Vec<Task> {
        self.working_set
            .iter()
            .filter_map(|id| self.tasks.iter().find(|t| t.id == *id))
            .cloned()
            .collect()
    }
}
