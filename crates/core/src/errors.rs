use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Date has already passed: {0}")]
    PastDate(String),

    #[error("Slot already booked: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Booking store unavailable: {0}")]
    Timeout(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Stable, machine-readable code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::InvalidSlot(_) => "invalid_slot",
            BookingError::PastDate(_) => "past_date",
            BookingError::Conflict(_) => "conflict",
            BookingError::NotFound(_) => "not_found",
            BookingError::InvalidTransition(_) => "invalid_transition",
            BookingError::Timeout(_) => "timeout",
            BookingError::Validation(_) => "validation",
            BookingError::Storage(_) => "storage",
            BookingError::Internal(_) => "internal",
        }
    }

    /// Whether the message may carry infrastructure detail that must not leave the process.
    pub fn is_internal(&self) -> bool {
        matches!(self, BookingError::Storage(_) | BookingError::Internal(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
