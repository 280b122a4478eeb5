use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::clock_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub provider_id: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub provider_id: String,
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}
