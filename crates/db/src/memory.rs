use std::time::Duration;

use async_trait::async_trait;
use careslot_core::{
    errors::BookingResult,
    models::booking::{Booking, BookingFilter, StatusChange},
    store::BookingStore,
};
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::ledger::{BookingLedger, LockedLedger};

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Volatile booking store; every write serializes on a single lock.
#[derive(Debug)]
pub struct MemoryBookingStore {
    ledger: LockedLedger,
}

impl MemoryBookingStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self::with_bookings(Vec::new(), lock_timeout)
    }

    pub fn with_bookings(bookings: Vec<Booking>, lock_timeout: Duration) -> Self {
        Self {
            ledger: LockedLedger::new(BookingLedger::from_records(bookings), lock_timeout),
        }
    }
}

impl Default for MemoryBookingStore {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        let bookings = self.ledger.read().await?.live_for(provider_id, date);
        debug!(provider_id, %date, count = bookings.len(), "loaded live bookings");
        Ok(bookings)
    }

    async fn append(&self, booking: Booking) -> BookingResult<Booking> {
        self.ledger.write().await?.insert(booking)
    }

    async fn update_status(&self, change: StatusChange) -> BookingResult<Booking> {
        self.ledger.write().await?.set_status(change)
    }

    async fn get(&self, booking_id: Uuid) -> BookingResult<Option<Booking>> {
        Ok(self.ledger.read().await?.get(booking_id).cloned())
    }

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        Ok(self.ledger.read().await?.filter(filter))
    }
}
