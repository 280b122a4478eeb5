//! Booking store persisted as a single JSON array of booking records.
//!
//! The file is rewritten in full on every mutation while the write lock is held,
//! so the on-disk state always reflects a prefix of the serialized write order.
//! Writes go to a sibling temp file first and are then renamed into place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use careslot_core::{
    errors::BookingResult,
    models::booking::{Booking, BookingFilter, StatusChange},
    store::BookingStore,
};
use chrono::NaiveDate;
use eyre::{eyre, Result, WrapErr};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::ledger::{BookingLedger, LockedLedger};

#[derive(Debug)]
pub struct JsonFileBookingStore {
    path: PathBuf,
    ledger: LockedLedger,
}

impl JsonFileBookingStore {
    /// Opens the store at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>, lock_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = read_records(&path).await?;
        info!(path = %path.display(), count = records.len(), "opened booking file");

        Ok(Self {
            path,
            ledger: LockedLedger::new(BookingLedger::from_records(records), lock_timeout),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `change` against the ledger and persists the result, undoing the change
    /// in memory if the file cannot be written.
    async fn mutate<F>(&self, change: F) -> BookingResult<Booking>
    where
        F: FnOnce(&mut BookingLedger) -> BookingResult<Booking>,
    {
        let mut ledger = self.ledger.write().await?;
        let snapshot = (*ledger).clone();
        let booking = change(&mut *ledger)?;

        if let Err(e) = write_records(&self.path, ledger.records()).await {
            error!(path = %self.path.display(), error = %e, "failed to persist bookings");
            *ledger = snapshot;
            return Err(e.into());
        }

        Ok(booking)
    }
}

async fn read_records(path: &Path) -> Result<Vec<Booking>> {
    let exists = tokio::fs::try_exists(path)
        .await
        .wrap_err_with(|| format!("failed to check {}", path.display()))?;
    if !exists {
        return Ok(Vec::new());
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

async fn write_records(path: &Path, records: &[Booking]) -> Result<()> {
    let json = serde_json::to_vec_pretty(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("booking path {} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    debug!(path = %path.display(), count = records.len(), "persisted bookings");
    Ok(())
}

#[async_trait]
impl BookingStore for JsonFileBookingStore {
    async fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        Ok(self.ledger.read().await?.live_for(provider_id, date))
    }

    async fn append(&self, booking: Booking) -> BookingResult<Booking> {
        self.mutate(|ledger| ledger.insert(booking)).await
    }

    async fn update_status(&self, change: StatusChange) -> BookingResult<Booking> {
        self.mutate(|ledger| ledger.set_status(change)).await
    }

    async fn get(&self, booking_id: Uuid) -> BookingResult<Option<Booking>> {
        Ok(self.ledger.read().await?.get(booking_id).cloned())
    }

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        Ok(self.ledger.read().await?.filter(filter))
    }
}
