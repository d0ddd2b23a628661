//! Task data structure and its lifecycle operations.
//!
//! A task is never physically deleted. Finishing it is a soft delete that only
//! removes it from daily selection; its history keeps accumulating.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fields::*;

/// A backlog item with its importance and day-by-day counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Absent in stores written before ids existed; backfilled on load.
    #[serde(default)]
    pub id: TaskId,
    pub name: String,
    pub weight: Weight,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub days_worked: u32,
    #[serde(default)]
    pub times_completed: u32,
    #[serde(default)]
    pub times_incomplete: u32,
    pub last_updated: NaiveDate,
    #[serde(default)]
    pub is_finished: bool,
}

/// Trim a proposed task name, rejecting blank ones.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

impl Task {
    /// Create a fresh `Ongoing` task stamped with `today`.
    pub fn new(id: TaskId, name: &str, weight: i64, today: NaiveDate) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        let weight = Weight::new(weight)?;
        Ok(Task {
            id,
            name,
            weight,
            status: Status::Ongoing,
            days_worked: 0,
            times_completed: 0,
            times_incomplete: 0,
            last_updated: today,
            is_finished: false,
        })
    }

    /// Set the status, counting transitions into `Complete` or `Incomplete`.
    pub fn update_status(&mut self, new_status: Status) {
        match new_status {
            Status::Complete => self.times_completed += 1,
            Status::Incomplete => self.times_incomplete += 1,
            Status::Ongoing => {}
        }
        self.status = new_status;
    }

    /// Advance the day counter and stamp `today`. Status is left alone.
    ///
    /// `last_updated` never moves backward, even if the clock does.
    pub fn increment_day(&mut self, today: NaiveDate) {
        self.days_worked += 1;
        if today > self.last_updated {
            self.last_updated = today;
        }
    }

    /// Permanently exclude the task from selection.
    pub fn finish(&mut self) {
        self.is_finished = true;
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    /// Change the weight; an out-of-range value leaves the old one in place.
    pub fn set_weight(&mut self, weight: i64) -> Result<(), ValidationError> {
        self.weight = Weight::new(weight)?;
        Ok(())
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_finished
    }
}
