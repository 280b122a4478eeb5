use async_trait::async_trait;
use careslot_core::{
    errors::BookingResult,
    models::booking::{Booking, BookingFilter, StatusChange},
    notify::NotificationSink,
    store::BookingStore,
};
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

// Mock collaborators for testing
mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingStore for BookingRepo {
        async fn find_by_provider_and_date(
            &self,
            provider_id: &str,
            date: NaiveDate,
        ) -> BookingResult<Vec<Booking>>;

        async fn append(&self, booking: Booking) -> BookingResult<Booking>;

        async fn update_status(&self, change: StatusChange) -> BookingResult<Booking>;

        async fn get(&self, booking_id: Uuid) -> BookingResult<Option<Booking>>;

        async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>>;
    }
}

mock! {
    pub Notifier {}

    #[async_trait]
    impl NotificationSink for Notifier {
        async fn notify(&self, booking_id: Uuid) -> eyre::Result<()>;
    }
}
