use chrono::{DateTime, Timelike, Utc};

use crate::time_index::local_now;

pub const NIGHT_STARTS_AT: u32 = 18;
pub const DAY_STARTS_AT: u32 = 6;

/// Whether it is night (18:00..06:00 local) at a location `utc_offset_seconds`
/// east of UTC. A missing offset is read as UTC.
pub fn is_night(utc_offset_seconds: Option<i32>, now: DateTime<Utc>) -> bool {
    let hour = local_now(now, utc_offset_seconds.unwrap_or(0)).hour();
    hour >= NIGHT_STARTS_AT || hour < DAY_STARTS_AT
}
