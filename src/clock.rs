use chrono::{DateTime, NaiveDate, Utc};

use crate::models::Month;

/// Source of "now". Account setup seeds months up to the current one, so
/// tests pin this to a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// UTC calendar date of `now`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn current_month(&self) -> Month {
        Month::of(self.today())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
