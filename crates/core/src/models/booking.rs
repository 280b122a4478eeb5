use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock_time;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingKind {
    #[default]
    #[serde(rename = "in-person")]
    InPerson,
    #[serde(rename = "remote")]
    Remote,
}

impl BookingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingKind::InPerson => "in-person",
            BookingKind::Remote => "remote",
        }
    }
}

impl FromStr for BookingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-person" => Ok(BookingKind::InPerson),
            "remote" => Ok(BookingKind::Remote),
            other => Err(format!("unknown booking kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Live bookings hold their slot; only cancellation releases it.
    pub fn is_live(self) -> bool {
        self != BookingStatus::Cancelled
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Whether `actor` may move a booking from `self` to `next`.
    ///
    /// Confirmation and completion belong to the provider; either side may cancel
    /// while the booking is still `booked` or `confirmed`.
    pub fn permits(self, next: BookingStatus, actor: ActorRole) -> bool {
        match (self, next) {
            (BookingStatus::Booked, BookingStatus::Confirmed)
            | (BookingStatus::Confirmed, BookingStatus::Completed) => actor == ActorRole::Provider,
            (BookingStatus::Booked, BookingStatus::Cancelled)
            | (BookingStatus::Confirmed, BookingStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(BookingStatus::Booked),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Patient,
    Provider,
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(ActorRole::Patient),
            "provider" | "doctor" | "lab" => Ok(ActorRole::Provider),
            other => Err(format!("unknown actor role '{}'", other)),
        }
    }
}

/// Identity of a bookable slot. At most one live booking may exist per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub provider_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} at {}",
            self.provider_id,
            self.date,
            self.start_time.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: String,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    pub subject_id: String,
    pub kind: BookingKind,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Builds a fresh `booked` record for a validated request.
    pub fn new(request: NewBooking, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider_id: request.provider_id,
            date: request.date,
            start_time: request.start_time,
            subject_id: request.subject_id,
            kind: request.kind,
            status: BookingStatus::Booked,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            provider_id: self.provider_id.clone(),
            date: self.date,
            start_time: self.start_time,
        }
    }
}

/// A compare-and-set status write: applied only while the booking still holds `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub booking_id: Uuid,
    pub expected: BookingStatus,
    pub next: BookingStatus,
    pub at: DateTime<Utc>,
}

/// A validated booking request as seen by the booking service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub provider_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub subject_id: String,
    pub kind: BookingKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    pub provider_id: Option<String>,
    pub subject_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.provider_id
            .as_deref()
            .map_or(true, |id| booking.provider_id == id)
            && self
                .subject_id
                .as_deref()
                .map_or(true, |id| booking.subject_id == id)
            && self.date.map_or(true, |date| booking.date == date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub provider_id: String,
    pub date: String,
    pub start_time: String,
    pub subject_id: Option<String>,
    pub kind: Option<BookingKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking: Booking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}
