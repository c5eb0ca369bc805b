use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::error::ValidationError;
use crate::geo::{DistanceProfile, LatLon};

use super::{GpsDataset, TrackPoint};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

/// Inclusive start date and inclusive end date, both as UTC calendar days.
///
/// A timestamp matches when `start 00:00 <= ts < (end + 1 day) 00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateBounds {
    /// # Errors
    ///
    /// Returns an error when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::DateBoundsReversed {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a `YYYY-MM-DD` bound; longer date-time values are truncated to
    /// their date part.
    ///
    /// # Errors
    ///
    /// Returns an error when the leading ten characters are not a valid date.
    pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
        let trimmed = value.trim();
        let date_part = trimmed.get(..DATE_LEN).unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .ok()
            .ok_or_else(|| ValidationError::InvalidDateBound {
                value: value.to_owned(),
            })
    }

    /// First and last UTC date covered by `points`.
    #[must_use]
    pub fn covering<'data>(points: impl IntoIterator<Item = &'data TrackPoint>) -> Option<Self> {
        let mut range: Option<(NaiveDate, NaiveDate)> = None;
        for point in points {
            let date = utc_date(&point.timestamp);
            range = Some(match range {
                Some((start, end)) => (start.min(date), end.max(date)),
                None => (date, date),
            });
        }
        range.map(|(start, end)| Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        let instant = timestamp.with_timezone(&Utc);
        let lower = self.start.and_time(NaiveTime::MIN).and_utc();
        if instant < lower {
            return false;
        }
        match self.end.checked_add_days(Days::new(1)) {
            Some(day_after) => instant < day_after.and_time(NaiveTime::MIN).and_utc(),
            None => true,
        }
    }
}

fn utc_date(timestamp: &DateTime<FixedOffset>) -> NaiveDate {
    timestamp.with_timezone(&Utc).date_naive()
}

/// The points of one subject inside a date range, in timestamp order.
#[derive(Debug, Clone, Default)]
pub struct TrackView {
    subject: String,
    bounds: Option<DateBounds>,
    points: Vec<TrackPoint>,
    positions: Vec<LatLon>,
    profile: DistanceProfile,
}

impl TrackView {
    /// Selects the subject's points inside `bounds` and sorts them by
    /// timestamp. The sort is stable, so duplicate timestamps keep file order.
    #[must_use]
    pub fn select(dataset: &GpsDataset, subject: &str, bounds: DateBounds) -> Self {
        let points = dataset
            .subject_points(subject)
            .filter(|point| bounds.contains(&point.timestamp))
            .cloned()
            .collect();
        Self::from_points(subject, Some(bounds), points)
    }

    /// Builds a view from already-selected points, sorting them by timestamp.
    #[must_use]
    pub fn from_points(
        subject: impl Into<String>,
        bounds: Option<DateBounds>,
        mut points: Vec<TrackPoint>,
    ) -> Self {
        points.sort_by_key(|point| point.timestamp);
        let positions: Vec<LatLon> = points.iter().map(|point| point.position).collect();
        let profile = DistanceProfile::new(&positions);
        Self {
            subject: subject.into(),
            bounds,
            points,
            positions,
            profile,
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub const fn bounds(&self) -> Option<DateBounds> {
        self.bounds
    }

    #[must_use]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    #[must_use]
    pub fn positions(&self) -> &[LatLon] {
        &self.positions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TrackPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn total_km(&self) -> f64 {
        self.profile.total_km()
    }

    /// Distance from the first point through the `revealed`-th point.
    #[must_use]
    pub fn distance_revealed_km(&self, revealed: usize) -> f64 {
        self.profile.distance_revealed(revealed)
    }

    /// Arithmetic mean position, used to center map documents.
    #[must_use]
    pub fn center(&self) -> Option<LatLon> {
        if self.positions.is_empty() {
            return None;
        }
        let count = self.positions.len() as f64;
        let (lat_sum, lon_sum) = self
            .positions
            .iter()
            .fold((0.0, 0.0), |(lat, lon), point| (lat + point.lat, lon + point.lon));
        Some(LatLon::new(lat_sum / count, lon_sum / count))
    }
}
