//! Time source shared by the repository and the command layer.
//!
//! Views never read the clock themselves; callers pass `now` in so every
//! projection stays a pure function of its inputs.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    /// Instant used for `createdAt` / `updatedAt` / `exportDate`.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Wall-clock time the user sees; node times are compared against this.
    fn now_local(&self) -> NaiveDateTime;

    fn now_millis(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant. Local time is the UTC instant's wall time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    pub fn at_local(at: NaiveDateTime) -> Self {
        Self { at: at.and_utc() }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.at
    }

    fn now_local(&self) -> NaiveDateTime {
        self.at.naive_utc()
    }
}
