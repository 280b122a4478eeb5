//! Slot generation from a provider's weekly schedule.
//!
//! Slots are never stored. The canonical grid for a provider and day is recomputed
//! from the schedule whenever it is needed, so the same inputs always produce the
//! same sequence of start times.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::models::provider::Provider;

/// Produces the ordered start times of every bookable slot for `provider` on `date`.
///
/// Each open interval is walked in `slot_minutes` steps from its start; a slot whose
/// end would fall past the interval end is dropped. Blocked dates and weekdays
/// without a schedule entry yield no slots.
pub fn generate_slots(provider: &Provider, date: NaiveDate) -> Vec<NaiveTime> {
    if provider.is_blocked(date) || provider.slot_minutes == 0 {
        return Vec::new();
    }

    let step = u64::from(provider.slot_minutes) * 60;
    let mut intervals = provider.schedule.intervals(date.weekday()).to_vec();
    intervals.sort_by_key(|interval| interval.start);

    let mut slots = Vec::new();
    // End of the last emitted slot, in seconds from midnight.
    let mut cursor = 0;

    for interval in intervals {
        let end = u64::from(interval.end.num_seconds_from_midnight());
        let mut start = u64::from(interval.start.num_seconds_from_midnight()).max(cursor);

        while start + step <= end {
            let time = u32::try_from(start)
                .ok()
                .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0));
            if let Some(time) = time {
                slots.push(time);
            }
            start += step;
            cursor = start;
        }
    }

    slots
}

/// Whether `time` is one of the slots produced by [`generate_slots`].
pub fn is_generated_slot(provider: &Provider, date: NaiveDate, time: NaiveTime) -> bool {
    generate_slots(provider, date).contains(&time)
}
