use async_trait::async_trait;
use eyre::Result;
use tracing::info;
use uuid::Uuid;

/// Receives a signal after a booking has been committed.
///
/// Delivery is fire-and-forget: a failing sink never affects the booking.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, booking_id: Uuid) -> Result<()>;
}

/// Writes a structured log line in place of a real delivery channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, booking_id: Uuid) -> Result<()> {
        info!(%booking_id, "booking confirmation notification dispatched");
        Ok(())
    }
}
