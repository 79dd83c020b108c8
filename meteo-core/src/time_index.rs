use chrono::{DateTime, Duration, NaiveDateTime, Utc};

const HOURLY_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a provider-local hourly timestamp such as `2026-02-12T10:00`.
pub fn parse_local_timestamp(value: &str) -> Option<NaiveDateTime> {
    HOURLY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Wall-clock time at a location `utc_offset_seconds` east of UTC.
pub fn local_now(now: DateTime<Utc>, utc_offset_seconds: i32) -> NaiveDateTime {
    now.naive_utc() + Duration::seconds(i64::from(utc_offset_seconds))
}

/// Index of the hourly sample covering "now" at the target location.
///
/// Returns the last timestamp that is not later than local now. Before the
/// first sample this is 0; past the last sample it is the last index.
/// Unparseable timestamps never count as later. An empty series yields 0,
/// so callers must not index with it unchecked.
pub fn find_current_hour_index<S: AsRef<str>>(
    timestamps: &[S],
    utc_offset_seconds: i32,
    now: DateTime<Utc>,
) -> usize {
    let local = local_now(now, utc_offset_seconds);

    timestamps
        .iter()
        .position(|ts| parse_local_timestamp(ts.as_ref()).is_some_and(|t| t > local))
        .map(|first_later| first_later.saturating_sub(1))
        .unwrap_or_else(|| timestamps.len().saturating_sub(1))
}
