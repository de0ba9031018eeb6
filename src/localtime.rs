//! UTC-offset application and local timestamp formatting
//!
//! The corrected time is computed exactly as the data model demands: convert
//! the UTC calendar fields to seconds since the Unix epoch, add the zone's
//! UTC offset, and convert back to calendar fields under Gregorian rules.
//! No time-zone database is consulted; the single additive correction
//! supplied by the lookup is all that is applied.

use chrono::{DateTime, NaiveDateTime};

/// Output format for corrected local timestamps.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Apply a UTC offset to a timestamp, renormalizing the calendar fields.
///
/// Offsets of any sign and magnitude are supported; rolling over midnight,
/// month boundaries, and leap days falls out of the epoch round-trip.
/// Returns `None` only when the shifted value leaves the representable
/// range, which no sane offset can cause.
pub fn apply_offset(timestamp: NaiveDateTime, offset_secs: i64) -> Option<NaiveDateTime> {
    let unix = timestamp.and_utc().timestamp();
    let shifted = unix.checked_add(offset_secs)?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.naive_utc())
}

/// Format a corrected timestamp as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_local(timestamp: NaiveDateTime) -> String {
    timestamp.format(LOCAL_TIME_FORMAT).to_string()
}
