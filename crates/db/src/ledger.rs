use std::collections::HashMap;
use std::time::Duration;

use careslot_core::{
    errors::{BookingError, BookingResult},
    models::booking::{Booking, BookingFilter, SlotKey, StatusChange},
};
use chrono::NaiveDate;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;
use uuid::Uuid;

/// A [`BookingLedger`] behind a lock whose every acquisition gives up after `timeout`.
#[derive(Debug)]
pub(crate) struct LockedLedger {
    pub(crate) lock: RwLock<BookingLedger>,
    timeout: Duration,
}

impl LockedLedger {
    pub fn new(ledger: BookingLedger, timeout: Duration) -> Self {
        Self {
            lock: RwLock::new(ledger),
            timeout,
        }
    }

    pub async fn read(&self) -> BookingResult<RwLockReadGuard<'_, BookingLedger>> {
        tokio::time::timeout(self.timeout, self.lock.read())
            .await
            .map_err(|_| self.timed_out())
    }

    pub async fn write(&self) -> BookingResult<RwLockWriteGuard<'_, BookingLedger>> {
        tokio::time::timeout(self.timeout, self.lock.write())
            .await
            .map_err(|_| self.timed_out())
    }

    fn timed_out(&self) -> BookingError {
        BookingError::Timeout(format!(
            "could not acquire the booking store within {} ms",
            self.timeout.as_millis()
        ))
    }
}

/// In-process booking records plus an index of which slots are held by live bookings.
///
/// Not synchronized on its own; the stores wrap it in a lock and hold the write
/// side across every check-and-insert.
#[derive(Debug, Clone, Default)]
pub(crate) struct BookingLedger {
    bookings: Vec<Booking>,
    by_id: HashMap<Uuid, usize>,
    live: HashMap<SlotKey, Uuid>,
}

impl BookingLedger {
    /// Rebuilds the indexes from previously persisted records.
    pub fn from_records(records: Vec<Booking>) -> Self {
        let mut ledger = Self::default();

        for booking in records {
            if booking.is_live() {
                let key = booking.slot_key();
                if let Some(holder) = ledger.live.get(&key) {
                    warn!(
                        booking_id = %booking.id,
                        holder = %holder,
                        slot = %key,
                        "persisted booking shares a slot with an earlier live booking"
                    );
                } else {
                    ledger.live.insert(key, booking.id);
                }
            }
            ledger.by_id.insert(booking.id, ledger.bookings.len());
            ledger.bookings.push(booking);
        }

        ledger
    }

    pub fn records(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn get(&self, booking_id: Uuid) -> Option<&Booking> {
        self.by_id.get(&booking_id).map(|&index| &self.bookings[index])
    }

    pub fn live_for(&self, provider_id: &str, date: NaiveDate) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|b| b.is_live() && b.provider_id == provider_id && b.date == date)
            .cloned()
            .collect()
    }

    pub fn filter(&self, filter: &BookingFilter) -> Vec<Booking> {
        let mut matches: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            (a.date, a.start_time, a.created_at).cmp(&(b.date, b.start_time, b.created_at))
        });
        matches
    }

    pub fn insert(&mut self, booking: Booking) -> BookingResult<Booking> {
        if self.by_id.contains_key(&booking.id) {
            return Err(BookingError::Validation(format!(
                "booking {} already exists",
                booking.id
            )));
        }

        if booking.is_live() {
            let key = booking.slot_key();
            if self.live.contains_key(&key) {
                return Err(BookingError::Conflict(format!(
                    "{} is already booked. Please choose another slot",
                    key
                )));
            }
            self.live.insert(key, booking.id);
        }

        self.by_id.insert(booking.id, self.bookings.len());
        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Applies `change` only if the booking still holds `change.expected`.
    pub fn set_status(&mut self, change: StatusChange) -> BookingResult<Booking> {
        let booking_id = change.booking_id;
        let index = *self
            .by_id
            .get(&booking_id)
            .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", booking_id)))?;

        let current = self.bookings[index].status;
        if current != change.expected {
            return Err(BookingError::InvalidTransition(format!(
                "booking {} is no longer {}; it is {}",
                booking_id, change.expected, current
            )));
        }

        let key = self.bookings[index].slot_key();

        match (current.is_live(), change.next.is_live()) {
            (true, false) => {
                if self.live.get(&key) == Some(&booking_id) {
                    self.live.remove(&key);
                }
            }
            (false, true) => {
                if self.live.contains_key(&key) {
                    return Err(BookingError::Conflict(format!(
                        "{} is already booked",
                        key
                    )));
                }
                self.live.insert(key, booking_id);
            }
            _ => {}
        }

        let booking = &mut self.bookings[index];
        booking.status = change.next;
        booking.updated_at = change.at;
        Ok(booking.clone())
    }
}
