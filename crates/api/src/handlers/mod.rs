pub mod availability;
pub mod bookings;
pub mod providers;
pub mod symptoms;

use careslot_core::errors::BookingError;
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` calendar date from a request.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}
