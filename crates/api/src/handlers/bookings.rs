use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use careslot_core::{
    errors::BookingError,
    models::{
        booking::{
            Booking, BookingFilter, BookingResponse, CreateBookingRequest, NewBooking,
            UpdateStatusRequest,
        },
        parse_clock_time,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::parse_date;
use crate::{
    middleware::{error_handling::AppError, identity::Identity},
    ApiState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub provider_id: Option<String>,
    pub subject_id: Option<String>,
    pub date: Option<String>,
}

/// Books a slot.
///
/// The subject may come from the body or, when omitted there, from the identity
/// header. Responds `201 Created` with the new booking.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    identity: Option<Identity>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let Json(payload) = payload?;

    let date = parse_date(&payload.date)?;
    let start_time = parse_clock_time(&payload.start_time).map_err(|_| {
        BookingError::Validation(format!(
            "Invalid startTime '{}', expected HH:MM",
            payload.start_time
        ))
    })?;
    let subject_id = payload
        .subject_id
        .or_else(|| identity.and_then(|id| id.subject_id))
        .ok_or_else(|| BookingError::Validation("subjectId is required".to_string()))?;

    let booking = state
        .bookings
        .book(NewBooking {
            provider_id: payload.provider_id,
            date,
            start_time,
            subject_id,
            kind: payload.kind.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse { booking })))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<ListBookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let Query(query) = query?;

    let filter = BookingFilter {
        provider_id: query.provider_id,
        subject_id: query.subject_id,
        date: query.date.as_deref().map(parse_date).transpose()?,
    };

    Ok(Json(state.bookings.list(&filter).await?))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.bookings.get(id).await?))
}

/// Moves a booking through its lifecycle on behalf of the calling actor.
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    id: Result<Path<Uuid>, PathRejection>,
    identity: Identity,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let booking = state
        .bookings
        .update_status(id, identity.role, payload.status)
        .await?;

    Ok(Json(booking))
}
