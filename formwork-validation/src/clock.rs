//! Source of "today" for date rules.

use chrono::NaiveDate;

pub trait Clock: Send + Sync {
    /// Current local date, time of day discarded.
    fn today(&self) -> NaiveDate;
}

/// Reads the system's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
