//! Where "today" comes from.

use std::cell::Cell;

use chrono::{Local, NaiveDate};

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Calendar date in the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A settable date, for tests and for replaying a specific day.
#[derive(Debug, Clone)]
pub struct FixedClock(Cell<NaiveDate>);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        FixedClock(Cell::new(date))
    }

    pub fn set(&self, date: NaiveDate) {
        self.0.set(date);
    }

    pub fn advance_days(&self, days: u64) {
        if let Some(next) = self.0.get().checked_add_days(chrono::Days::new(days)) {
            self.0.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
