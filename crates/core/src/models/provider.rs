use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::clock_time;
use crate::errors::{BookingError, BookingResult};

pub const DEFAULT_SLOT_MINUTES: u32 = 30;
/// A slot can never be longer than a day.
pub const MAX_SLOT_MINUTES: u32 = 24 * 60;

fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Doctor,
    Lab,
}

/// A half-open `[start, end)` window of wall-clock time during which a provider sees subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenInterval {
    #[serde(with = "clock_time")]
    pub start: NaiveTime,
    #[serde(with = "clock_time")]
    pub end: NaiveTime,
}

impl OpenInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// Open intervals keyed by day of week (`"Mon"`, `"Tue"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule(HashMap<Weekday, Vec<OpenInterval>>);

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: Weekday, intervals: Vec<OpenInterval>) -> Self {
        self.0.insert(day, intervals);
        self
    }

    pub fn intervals(&self, day: Weekday) -> &[OpenInterval] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rejects inverted or overlapping intervals on any day.
    pub fn validate(&self) -> BookingResult<()> {
        for (day, intervals) in &self.0 {
            let mut sorted = intervals.clone();
            sorted.sort_by_key(|interval| interval.start);

            for interval in &sorted {
                if interval.start >= interval.end {
                    return Err(BookingError::Validation(format!(
                        "interval {}-{} on {} must start before it ends",
                        interval.start.format("%H:%M"),
                        interval.end.format("%H:%M"),
                        day
                    )));
                }
            }

            for pair in sorted.windows(2) {
                if pair[1].start < pair[0].end {
                    return Err(BookingError::Validation(format!(
                        "intervals on {} overlap at {}",
                        day,
                        pair[1].start.format("%H:%M")
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub kind: ProviderKind,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default)]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub blocked_dates: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests_offered: Vec<String>,
}

impl Provider {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            specialization: None,
            location: None,
            verified: false,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            schedule: WeeklySchedule::new(),
            blocked_dates: BTreeSet::new(),
            tests_offered: Vec::new(),
        }
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    pub fn validate(&self) -> BookingResult<()> {
        if self.id.trim().is_empty() {
            return Err(BookingError::Validation("provider id must not be empty".into()));
        }
        if self.slot_minutes == 0 || self.slot_minutes > MAX_SLOT_MINUTES {
            return Err(BookingError::Validation(format!(
                "provider {} must have a slot length between 1 and {} minutes",
                self.id, MAX_SLOT_MINUTES
            )));
        }
        self.schedule.validate().map_err(|e| match e {
            BookingError::Validation(msg) => {
                BookingError::Validation(format!("provider {}: {}", self.id, msg))
            }
            other => other,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuery {
    pub location: Option<String>,
    pub specialization: Option<String>,
    pub kind: Option<ProviderKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSearchResponse {
    pub count: usize,
    pub providers: Vec<Provider>,
}
