use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

use crate::error::ValidationError;

use super::LatLon;
use super::solar::sun_times;

/// East Africa Time, UTC+3.
const DEFAULT_OFFSET_SECONDS: i32 = 3 * 3600;
const DEFAULT_ZONE_LABEL: &str = "EAT";
/// Fallback daytime window, local hours `[start, end)`.
const FALLBACK_DAY_START_HOUR: u32 = 6;
const FALLBACK_DAY_END_HOUR: u32 = 18;

/// The fixed-offset zone in which calendar dates and clock times are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceZone {
    offset: FixedOffset,
    label: String,
}

impl ReferenceZone {
    #[must_use]
    pub fn new(offset: FixedOffset, label: impl Into<String>) -> Self {
        Self {
            offset,
            label: label.into(),
        }
    }

    /// Parses `+HH:MM`, `-HH:MM`, `+HH` or `Z`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not a valid offset.
    pub fn parse_offset(value: &str) -> Result<FixedOffset, ValidationError> {
        let invalid = || ValidationError::InvalidUtcOffset {
            value: value.to_owned(),
        };
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return FixedOffset::east_opt(0).ok_or_else(invalid);
        }
        let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
            (1, rest)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (-1, rest)
        } else {
            return Err(invalid());
        };
        let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours = hours.parse::<i32>().ok().ok_or_else(invalid)?;
        let minutes = minutes.parse::<i32>().ok().ok_or_else(invalid)?;
        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }
        let seconds = hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_mul(sign);
        FixedOffset::east_opt(seconds).ok_or_else(invalid)
    }

    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn localize(&self, timestamp: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        timestamp.with_timezone(&self.offset)
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix());
        Self::new(offset, DEFAULT_ZONE_LABEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Day,
    Night,
}

impl From<bool> for DayPhase {
    fn from(is_day: bool) -> Self {
        if is_day { Self::Day } else { Self::Night }
    }
}

impl DayPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
        }
    }
}

enum Classification {
    Solar(bool),
    LocalHour(bool),
}

/// Reports whether `timestamp` falls between sunrise and sunset at
/// `position` on its calendar date in `zone`.
///
/// Never fails: without a usable sunrise/sunset the local hour is checked
/// against a 06:00-18:00 window, and when the location itself is unusable the
/// same window is applied to the timestamp's own clock hour.
#[must_use]
pub fn is_daytime(position: LatLon, timestamp: &DateTime<FixedOffset>, zone: &ReferenceZone) -> bool {
    match classify(position, timestamp, zone) {
        Some(Classification::Solar(is_day) | Classification::LocalHour(is_day)) => is_day,
        None => {
            tracing::debug!("Day/night classification fell back to the raw timestamp hour.");
            in_fallback_window(timestamp.hour())
        }
    }
}

fn classify(
    position: LatLon,
    timestamp: &DateTime<FixedOffset>,
    zone: &ReferenceZone,
) -> Option<Classification> {
    if !position.is_valid() {
        return None;
    }
    let local = zone.localize(timestamp);
    let classification = match sun_times(position, local.date_naive()) {
        Some(times) => {
            let instant = timestamp.with_timezone(&Utc);
            Classification::Solar(times.sunrise <= instant && instant <= times.sunset)
        }
        None => Classification::LocalHour(in_fallback_window(local.hour())),
    };
    Some(classification)
}

const fn in_fallback_window(hour: u32) -> bool {
    hour >= FALLBACK_DAY_START_HOUR && hour < FALLBACK_DAY_END_HOUR
}

/// Sunrise and sunset for the timestamp's local date, expressed in `zone`.
#[must_use]
pub fn reference_sun_times(
    position: LatLon,
    timestamp: &DateTime<FixedOffset>,
    zone: &ReferenceZone,
) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    if !position.is_valid() {
        return None;
    }
    let local = zone.localize(timestamp);
    let times = sun_times(position, local.date_naive())?;
    Some((
        times.sunrise.with_timezone(&zone.offset),
        times.sunset.with_timezone(&zone.offset),
    ))
}
