pub mod catalog;
pub mod json_file;
mod ledger;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use std::time::Duration;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use json_file::JsonFileBookingStore;
pub use memory::MemoryBookingStore;
pub use repositories::booking::PgBookingStore;

pub type DbPool = Pool<Postgres>;

/// Connects to PostgreSQL; `acquire_timeout` bounds how long a caller waits for a
/// free connection before the store reports a timeout.
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;

    Ok(pool)
}
