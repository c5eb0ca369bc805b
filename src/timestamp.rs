//! Normalization of user-supplied date bounds into the 17-digit
//! `yyyyMMddHHmmssSSS` form accepted by the Movebank direct-read service.
use chrono::{NaiveDate, NaiveDateTime};

/// Width of a canonical service timestamp.
const CANONICAL_LEN: usize = 17;
/// Digit-only inputs at least this long are padded instead of parsed.
const PAD_THRESHOLD: usize = 14;
const DATE_ONLY_LEN: usize = 10;
const DATE_TIME_SECONDS_LEN: usize = 19;
const DATE_TIME_MINUTES_LEN: usize = 16;
const CANONICAL_FORMAT: &str = "%Y%m%d%H%M%S000";

/// Converts a date/time bound into the canonical service format.
///
/// Returns `None` when no bound was given. Inputs that cannot be interpreted
/// are passed through unchanged so the service can reject them.
#[must_use]
pub fn normalize_timestamp(input: Option<&str>) -> Option<String> {
    let raw = input?;
    if raw.is_empty() {
        return None;
    }

    let stripped: String = raw
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | ':'))
        .collect();
    if !stripped.is_empty()
        && stripped.chars().all(|ch| ch.is_ascii_digit())
        && stripped.len() >= PAD_THRESHOLD
    {
        return Some(format!("{stripped:0<CANONICAL_LEN$}"));
    }

    Some(parse_literal_patterns(raw).unwrap_or_else(|| raw.to_owned()))
}

fn parse_literal_patterns(raw: &str) -> Option<String> {
    let parsed = if raw.len() == DATE_ONLY_LEN && raw.matches('-').count() == 2 {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    } else if raw.len() == DATE_TIME_SECONDS_LEN {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
    } else if raw.len() == DATE_TIME_MINUTES_LEN {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").ok()
    } else {
        None
    }?;
    Some(parsed.format(CANONICAL_FORMAT).to_string())
}
