use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY,
            provider_id VARCHAR(255) NOT NULL,
            slot_date DATE NOT NULL,
            start_time TIME NOT NULL,
            subject_id VARCHAR(255) NOT NULL,
            kind VARCHAR(16) NOT NULL,
            status VARCHAR(16) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_kind CHECK (kind IN ('in-person', 'remote')),
            CONSTRAINT valid_status CHECK (status IN ('booked', 'confirmed', 'cancelled', 'completed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one live booking per slot
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_bookings_live_slot
            ON bookings(provider_id, slot_date, start_time)
            WHERE status <> 'cancelled';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_bookings_provider_date ON bookings(provider_id, slot_date)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_subject_id ON bookings(subject_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
