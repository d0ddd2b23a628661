//! Daily rollover: advance task state when a new calendar day is seen.

use chrono::NaiveDate;
use tracing::debug;

use crate::fields::Status;
use crate::task::Task;

/// Roll every task whose `last_updated` predates `today` into the new day.
///
/// An `Ongoing` task that was left open is recorded as `Incomplete` once, then
/// every rolled task has its day counter advanced and starts over as `Ongoing`.
/// Finished tasks take the same penalty and day count, but a non-`Ongoing`
/// status on a finished task is frozen.
/// Only one day is processed per call, however many calendar days have
/// passed. Returns the number of tasks rolled.
pub fn roll_over(tasks: &mut [Task], today: NaiveDate) -> usize {
    let mut rolled = 0;
    for task in tasks.iter_mut().filter(|t| t.last_updated < today) {
        if task.is_finished {
            if task.status == Status::Ongoing {
                task.times_incomplete += 1;
            }
            task.increment_day(today);
        } else {
            if task.status == Status::Ongoing {
                task.update_status(Status::Incomplete);
            }
            task.increment_day(today);
            task.status = Status::Ongoing;
        }
        rolled += 1;
        debug!(task = %task.id, days_worked = task.days_worked, "rolled over");
    }
    rolled
}
