use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Source of the current wall-clock time in the clinic's local zone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Timestamp recorded on stored records.
    fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reads the host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }
}
