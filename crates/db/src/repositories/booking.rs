use async_trait::async_trait;
use careslot_core::{
    errors::{BookingError, BookingResult},
    models::booking::{Booking, BookingFilter, StatusChange},
    store::BookingStore,
};
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::models::DbBooking;

const BOOKING_COLUMNS: &str =
    "id, provider_id, slot_date, start_time, subject_id, kind, status, created_at, updated_at";

/// Translates driver failures into the booking taxonomy.
///
/// The partial unique index on live slots surfaces as a unique violation, and an
/// exhausted pool as `PoolTimedOut`.
fn map_sqlx_error(err: sqlx::Error) -> BookingError {
    match err {
        sqlx::Error::PoolTimedOut => {
            BookingError::Timeout("timed out waiting for a database connection".to_string())
        }
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            BookingError::Conflict("slot is already booked. Please choose another".to_string())
        }
        other => BookingError::Storage(other.into()),
    }
}

fn into_booking(row: DbBooking) -> BookingResult<Booking> {
    Booking::try_from(row).map_err(BookingError::Storage)
}

pub async fn insert_booking(pool: &Pool<Postgres>, booking: &Booking) -> BookingResult<Booking> {
    let row = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings ({BOOKING_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking.id)
    .bind(&booking.provider_id)
    .bind(booking.date)
    .bind(booking.start_time)
    .bind(&booking.subject_id)
    .bind(booking.kind.as_str())
    .bind(booking.status.as_str())
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .fetch_one(pool)
    .await
    .map_err(map_sqlx_error)?;

    into_booking(row)
}

pub async fn get_live_bookings(
    pool: &Pool<Postgres>,
    provider_id: &str,
    date: NaiveDate,
) -> BookingResult<Vec<Booking>> {
    let rows = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE provider_id = $1 AND slot_date = $2 AND status <> 'cancelled'
        ORDER BY start_time ASC
        "#
    ))
    .bind(provider_id)
    .bind(date)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_error)?;

    debug!(provider_id, %date, count = rows.len(), "loaded live bookings");
    rows.into_iter().map(into_booking).collect()
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> BookingResult<Option<Booking>> {
    let row = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_sqlx_error)?;

    row.map(into_booking).transpose()
}

/// Conditional update: the row changes only while it still holds `change.expected`.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    change: &StatusChange,
) -> BookingResult<Booking> {
    let row = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = $3
        WHERE id = $1 AND status = $4
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(change.booking_id)
    .bind(change.next.as_str())
    .bind(change.at)
    .bind(change.expected.as_str())
    .fetch_optional(pool)
    .await
    .map_err(map_sqlx_error)?;

    match row {
        Some(row) => into_booking(row),
        None => match get_booking_by_id(pool, change.booking_id).await? {
            None => Err(BookingError::NotFound(format!(
                "Booking with ID {} not found",
                change.booking_id
            ))),
            Some(current) => Err(BookingError::InvalidTransition(format!(
                "booking {} is no longer {}; it is {}",
                change.booking_id, change.expected, current.status
            ))),
        },
    }
}

pub async fn list_bookings(
    pool: &Pool<Postgres>,
    filter: &BookingFilter,
) -> BookingResult<Vec<Booking>> {
    let rows = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE ($1::text IS NULL OR provider_id = $1)
          AND ($2::text IS NULL OR subject_id = $2)
          AND ($3::date IS NULL OR slot_date = $3)
        ORDER BY slot_date ASC, start_time ASC, created_at ASC
        "#
    ))
    .bind(filter.provider_id.as_deref())
    .bind(filter.subject_id.as_deref())
    .bind(filter.date)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_error)?;

    rows.into_iter().map(into_booking).collect()
}

/// PostgreSQL-backed [`BookingStore`]; slot exclusivity is enforced by the
/// `uniq_bookings_live_slot` partial index.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: Pool<Postgres>,
}

impl PgBookingStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        get_live_bookings(&self.pool, provider_id, date).await
    }

    async fn append(&self, booking: Booking) -> BookingResult<Booking> {
        insert_booking(&self.pool, &booking).await
    }

    async fn update_status(&self, change: StatusChange) -> BookingResult<Booking> {
        update_booking_status(&self.pool, &change).await
    }

    async fn get(&self, booking_id: Uuid) -> BookingResult<Option<Booking>> {
        get_booking_by_id(&self.pool, booking_id).await
    }

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        list_bookings(&self.pool, filter).await
    }
}
