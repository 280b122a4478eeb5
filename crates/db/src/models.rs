use careslot_core::models::booking::Booking;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub provider_id: String,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub subject_id: String,
    pub kind: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = Report;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            provider_id: row.provider_id,
            date: row.slot_date,
            start_time: row.start_time,
            subject_id: row.subject_id,
            kind: row.kind.parse().map_err(|e: String| eyre!(e))?,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
