pub mod availability;
pub mod booking;
pub mod provider;
pub mod symptom;

use chrono::NaiveTime;

/// Parses a wall-clock time as `HH:MM`, `HH:MM:SS` or the 12-hour `hh:MM AM` form.
pub fn parse_clock_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(raw, "%I:%M %p"))
}

/// Serde adapter writing times as `HH:MM`.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw)
            .map_err(|e| de::Error::custom(format!("invalid clock time '{}': {}", raw, e)))
    }
}
