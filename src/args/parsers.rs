use std::time::Duration;

use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, ValidationError};
use crate::playback::{MAX_SPEED, MAX_TRAIL_LENGTH, MIN_SPEED};

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}

fn parse_bounded(s: &str, field: &'static str, min: u64, max: u64) -> AppResult<u64> {
    let value: u64 = s.trim().parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidNumber {
            value: s.to_owned(),
            source: err,
        })
    })?;
    if !(min..=max).contains(&value) {
        return Err(AppError::validation(ValidationError::ValueOutOfRange {
            field,
            value,
            min,
            max,
        }));
    }
    Ok(value)
}

pub(crate) fn parse_speed(s: &str) -> AppResult<u32> {
    let value = parse_bounded(s, "speed", u64::from(MIN_SPEED), u64::from(MAX_SPEED))?;
    u32::try_from(value).map_err(|_err| {
        AppError::validation(ValidationError::ValueOutOfRange {
            field: "speed",
            value,
            min: u64::from(MIN_SPEED),
            max: u64::from(MAX_SPEED),
        })
    })
}

pub(crate) fn parse_trail_length(s: &str) -> AppResult<usize> {
    let max = u64::try_from(MAX_TRAIL_LENGTH).unwrap_or(u64::MAX);
    let value = parse_bounded(s, "trail_length", 0, max)?;
    usize::try_from(value).map_err(|_err| {
        AppError::validation(ValidationError::ValueOutOfRange {
            field: "trail_length",
            value,
            min: 0,
            max,
        })
    })
}

/// Accepts a `YYYY-MM-DD` date (or a datetime, truncated to its date) and
/// keeps the original text.
pub(crate) fn parse_date_arg(s: &str) -> AppResult<String> {
    crate::track::DateBounds::parse_date(s)?;
    Ok(s.trim().to_owned())
}

pub(crate) fn parse_utc_offset(s: &str) -> AppResult<String> {
    crate::geo::ReferenceZone::parse_offset(s)?;
    Ok(s.trim().to_owned())
}
