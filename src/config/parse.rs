use std::time::Duration;

use crate::error::ValidationError;

/// Parses `<number>[ms|s|m|h]`; a bare number is seconds.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, ValidationError> {
    let value = value.trim();
    let invalid = |reason: &str| ValidationError::InvalidDuration {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };
    if value.is_empty() {
        return Err(invalid("empty value"));
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(invalid("expected a number"));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|_err| invalid("number too large"))?;

    let seconds_per_unit = match unit_part {
        "ms" => return positive(Duration::from_millis(number), value),
        "" | "s" => 1,
        "m" => 60,
        "h" => 3_600,
        _ => return Err(invalid("unit must be one of ms, s, m, h")),
    };
    let seconds = number
        .checked_mul(seconds_per_unit)
        .ok_or_else(|| invalid("overflow"))?;
    positive(Duration::from_secs(seconds), value)
}

fn positive(duration: Duration, value: &str) -> Result<Duration, ValidationError> {
    if duration.is_zero() {
        return Err(ValidationError::InvalidDuration {
            value: value.to_owned(),
            reason: "must be > 0".to_owned(),
        });
    }
    Ok(duration)
}
