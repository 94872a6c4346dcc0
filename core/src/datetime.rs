//! Canonicalization of human-entered date/time strings.
//!
//! Every date field sent to the inventory API uses the strict
//! `YYYY-MM-DDTHH:MM:SS` form. Users may type a bare date, a date with
//! hours and minutes, or the full form, with either `T` or a space between
//! date and time. A blank field means "now".

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::ValidationError;

/// strftime pattern of the canonical form.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Human-readable name of the canonical form, used in error messages.
pub const ISO_PATTERN: &str = "YYYY-MM-DDTHH:MM:SS";

/// Render a timestamp in the canonical form.
pub fn to_iso(value: &NaiveDateTime) -> String {
    value.format(ISO_FORMAT).to_string()
}

/// Normalize `raw` against the local clock.
pub fn normalize_datetime(raw: &str) -> Result<String, ValidationError> {
    normalize_datetime_at(raw, Local::now().naive_local())
}

/// Normalize `raw`, substituting `now` when it is blank.
///
/// The result is re-rendered from the parsed value, so feeding it back in
/// yields the same string.
pub fn normalize_datetime_at(raw: &str, now: NaiveDateTime) -> Result<String, ValidationError> {
    parse_datetime_at(raw, now).map(|value| to_iso(&value))
}

/// Parse `raw` into a timestamp using the same shapes as
/// [`normalize_datetime_at`].
pub fn parse_datetime_at(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(now.with_nanosecond(0).unwrap_or(now));
    }

    let mut candidate = trimmed.replace(' ', "T");
    match candidate.len() {
        // YYYY-MM-DD
        10 => candidate.push_str("T00:00:00"),
        // YYYY-MM-DDTHH:MM
        16 => candidate.push_str(":00"),
        _ => {}
    }

    let format_error = || ValidationError::Format {
        input: raw.to_string(),
        expected: ISO_PATTERN,
    };
    let parsed = NaiveDateTime::parse_from_str(&candidate, ISO_FORMAT).map_err(|_| format_error())?;
    // chrono encodes a :60 leap second as an overflowing nanosecond field
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(format_error());
    }
    Ok(parsed)
}
