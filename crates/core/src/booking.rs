//! Booking service: validates requests against the slot grid and the clock, commits
//! through the store and drives the booking status state machine.
//!
//! ```text
//! booked --confirm--> confirmed --complete--> completed
//!   |                     |
//!   +------cancel---------+--> cancelled
//! ```

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::availability::has_not_started;
use crate::catalog::ProviderCatalog;
use crate::clock::Clock;
use crate::errors::{BookingError, BookingResult};
use crate::models::booking::{
    ActorRole, Booking, BookingFilter, BookingStatus, NewBooking, StatusChange,
};
use crate::notify::NotificationSink;
use crate::slots::is_generated_slot;
use crate::store::BookingStore;

#[derive(Clone)]
pub struct BookingService {
    catalog: Arc<ProviderCatalog>,
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSink>,
}

impl BookingService {
    pub fn new(
        catalog: Arc<ProviderCatalog>,
        store: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
            notifier,
        }
    }

    /// Commits a booking for a slot, or explains why it cannot be taken.
    ///
    /// Slot-grid and clock checks run before the store is touched; the store then
    /// decides between competing requests. Conflicts are returned as-is and never
    /// retried, so the caller can re-query availability.
    #[instrument(skip(self, request), fields(provider_id = %request.provider_id, date = %request.date, start_time = %request.start_time))]
    pub async fn book(&self, request: NewBooking) -> BookingResult<Booking> {
        let provider = self.catalog.require(&request.provider_id)?;

        if request.subject_id.trim().is_empty() {
            return Err(BookingError::Validation("subjectId must not be empty".to_string()));
        }

        if !is_generated_slot(provider, request.date, request.start_time) {
            return Err(BookingError::InvalidSlot(format!(
                "{} is not a bookable slot for provider {} on {}",
                request.start_time.format("%H:%M"),
                provider.id,
                request.date
            )));
        }

        if !has_not_started(request.date, request.start_time, self.clock.now()) {
            return Err(BookingError::PastDate(format!(
                "{} {} has already passed",
                request.date,
                request.start_time.format("%H:%M")
            )));
        }

        let booking = Booking::new(request, self.clock.timestamp());
        let booking = match self.store.append(booking).await {
            Ok(booking) => booking,
            Err(err) => {
                if let BookingError::Conflict(_) = err {
                    warn!("slot already taken");
                }
                return Err(err);
            }
        };

        info!(booking_id = %booking.id, subject_id = %booking.subject_id, "booking committed");
        self.dispatch_notification(booking.id);

        Ok(booking)
    }

    /// Applies a status transition on behalf of `actor`.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        actor: ActorRole,
        next: BookingStatus,
    ) -> BookingResult<Booking> {
        let booking = self
            .store
            .get(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", booking_id)))?;

        if !booking.status.permits(next, actor) {
            return Err(BookingError::InvalidTransition(format!(
                "{:?} may not move booking {} from {} to {}",
                actor, booking_id, booking.status, next
            )));
        }

        if next == BookingStatus::Cancelled
            && !has_not_started(booking.date, booking.start_time, self.clock.now())
        {
            return Err(BookingError::InvalidTransition(format!(
                "booking {} has already started and can no longer be cancelled",
                booking_id
            )));
        }

        // Concurrent transitions race here; the store only applies the one that still
        // sees the status validated above.
        let updated = self
            .store
            .update_status(StatusChange {
                booking_id,
                expected: booking.status,
                next,
                at: self.clock.timestamp(),
            })
            .await?;
        info!(%booking_id, from = %booking.status, to = %updated.status, "booking status changed");

        Ok(updated)
    }

    pub async fn get(&self, booking_id: Uuid) -> BookingResult<Booking> {
        self.store
            .get(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", booking_id)))
    }

    pub async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        self.store.list(filter).await
    }

    fn dispatch_notification(&self, booking_id: Uuid) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(booking_id).await {
                warn!(%booking_id, error = %e, "failed to deliver booking notification");
            }
        });
    }
}
