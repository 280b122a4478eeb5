use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::booking::{Booking, BookingFilter, StatusChange};

/// Durable home of every booking record.
///
/// Implementations must make [`BookingStore::append`] atomic per slot key: among
/// concurrent appends for the same provider, date and start time, at most one may
/// succeed while the slot already holds a live booking. A store that cannot reach
/// its serialization point within its configured bound returns
/// [`BookingError::Timeout`](crate::errors::BookingError::Timeout).
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Live (non-cancelled) bookings for a provider on a given day.
    async fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>>;

    /// Commits a new booking, or fails with `Conflict` if its slot is taken.
    async fn append(&self, booking: Booking) -> BookingResult<Booking>;

    /// Moves a booking from `change.expected` to `change.next`, stamping `change.at`.
    ///
    /// Fails with `NotFound` for an unknown id and with `InvalidTransition` when the
    /// stored status is no longer `change.expected`.
    async fn update_status(&self, change: StatusChange) -> BookingResult<Booking>;

    async fn get(&self, booking_id: Uuid) -> BookingResult<Option<Booking>>;

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>>;
}
