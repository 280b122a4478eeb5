use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::clock::Clock;
use crate::errors::BookingResult;
use crate::models::{availability::SlotAvailability, booking::Booking, provider::Provider};
use crate::slots::generate_slots;
use crate::store::BookingStore;

/// Computes the point-in-time view of which slots a provider still has free.
#[derive(Clone)]
pub struct AvailabilityResolver {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityResolver {
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn resolve(
        &self,
        provider: &Provider,
        date: NaiveDate,
    ) -> BookingResult<Vec<SlotAvailability>> {
        let slots = generate_slots(provider, date);
        if slots.is_empty() {
            debug!(provider_id = %provider.id, %date, "no slots scheduled");
            return Ok(Vec::new());
        }

        let bookings = self
            .store
            .find_by_provider_and_date(&provider.id, date)
            .await?;

        Ok(mark_availability(&slots, &bookings, date, self.clock.now()))
    }
}

/// Marks each slot free unless a live booking holds it or its start has already passed.
pub fn mark_availability(
    slots: &[NaiveTime],
    bookings: &[Booking],
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<SlotAvailability> {
    let taken: HashSet<NaiveTime> = bookings
        .iter()
        .filter(|b| b.is_live() && b.date == date)
        .map(|b| b.start_time)
        .collect();

    slots
        .iter()
        .map(|&time| SlotAvailability {
            time,
            available: !taken.contains(&time) && has_not_started(date, time, now),
        })
        .collect()
}

/// Bookings must be for a present-or-future slot; a slot starting right now is gone.
pub fn has_not_started(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    date.and_time(time) > now
}
