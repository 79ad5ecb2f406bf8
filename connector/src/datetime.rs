//! Parsing of platform datetime inputs.
//!
//! Inputs keep the zone they were written in: an explicit offset is honored
//! as-is and never normalized to UTC. Inputs without any zone are read as
//! `+00:00`.

use crate::error::{ConnectorError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a datetime string, keeping the offset embedded in it.
pub fn parse_zoned(input: &str) -> Result<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ConnectorError::invalid_input("invalid UTC offset"))?;

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc().with_timezone(&utc));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ConnectorError::invalid_input(format!("invalid date '{}'", input)))?;
        return Ok(midnight.and_utc().with_timezone(&utc));
    }

    Err(ConnectorError::invalid_input(format!(
        "'{}' is not a valid date or datetime",
        input
    )))
}

/// Zero seconds and sub-second precision, keeping the offset.
pub fn truncate_to_minute(dt: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .ok_or_else(|| ConnectorError::invalid_input(format!("cannot truncate {}", dt)))
}

/// Parse, truncate to the minute and render as RFC 3339 with offset
/// (`2022-11-14T16:00:00+02:00`).
pub fn normalize_timestamp(input: &str) -> Result<String> {
    let dt = truncate_to_minute(parse_zoned(input)?)?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// Calendar date of the input in its own zone.
pub fn local_date(input: &str) -> Result<NaiveDate> {
    Ok(truncate_to_minute(parse_zoned(input)?)?.date_naive())
}
