//! # Availability Handlers
//!
//! Serves the free/taken view of a provider's slot grid for one day.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use careslot_core::{
    errors::BookingError,
    models::availability::{AvailabilityQuery, AvailabilityResponse},
};
use std::sync::Arc;

use super::parse_date;
use crate::{middleware::error_handling::AppError, ApiState};

/// Lists every slot of a provider on a date with its availability
///
/// # Endpoint
///
/// ```text
/// GET /availability?providerId=doc-1&date=2025-06-02
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - Missing parameters or malformed date
/// * `BookingError::NotFound` - Unknown provider
/// * `BookingError::Timeout` - Booking store did not answer in time
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Query(query) = query?;

    if query.provider_id.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "providerId must not be empty".to_string(),
        )));
    }
    let date = parse_date(&query.date)?;
    let provider = state.catalog.require(&query.provider_id)?;

    let slots = state.availability.resolve(provider, date).await?;

    Ok(Json(AvailabilityResponse {
        provider_id: provider.id.clone(),
        date,
        slots,
    }))
}
