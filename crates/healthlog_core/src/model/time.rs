//! Text codecs for calendar dates and entry timestamps.
//!
//! # Invariants
//! - Dates are always `YYYY-MM-DD`.
//! - Timestamps are written as local wall-clock `YYYY-MM-DDTHH:MM:SS`.
//! - Readers also accept RFC 3339 (converted to local time) and the SQLite
//!   `YYYY-MM-DD HH:MM:SS` form.
//! - The calendar date of a stored timestamp is the date of its parsed local
//!   wall-clock value, never the raw text prefix.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored timestamp, truncated to second precision.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    parse_timestamp_in(value, &Local)
}

/// Parses a stored timestamp as wall-clock time in `zone`.
///
/// Naive forms are taken as already being in `zone`; RFC 3339 instants are
/// shifted into it.
pub fn parse_timestamp_in<Tz: TimeZone>(value: &str, zone: &Tz) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    let parsed = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|instant| instant.with_timezone(zone).naive_local())
        })?;
    parsed.with_nanosecond(0)
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a strict `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, TIME_OF_DAY_FORMAT).ok()
}

pub fn format_time_of_day(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIME_OF_DAY_FORMAT).to_string()
}

/// Combines a calendar date and a time of day; seconds are always zero.
pub fn at_time_of_day(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    let time = time.with_second(0).unwrap_or(time);
    date.and_time(time)
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
