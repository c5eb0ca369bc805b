use chrono::{NaiveDate, Utc};

use super::{SubjectDirectory, TrackView};

/// Kilometers to statute miles.
pub const KM_TO_MILES: f64 = 0.621_371;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Summary figures for one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStats {
    pub subject: String,
    pub taxon: Option<String>,
    pub points: usize,
    pub total_km: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Whole days between the first and last fix.
    pub duration_days: i64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// Mean and max ground speed in m/s over the points that carry one.
    pub speed: Option<SpeedStats>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedStats {
    pub mean: f64,
    pub max: f64,
}

impl TrackStats {
    /// Returns `None` for an empty view.
    #[must_use]
    pub fn compute(view: &TrackView, directory: &SubjectDirectory) -> Option<Self> {
        let first = view.first()?;
        let last = view.last()?;

        let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for position in view.positions() {
            lat_min = lat_min.min(position.lat);
            lat_max = lat_max.max(position.lat);
            lon_min = lon_min.min(position.lon);
            lon_max = lon_max.max(position.lon);
        }

        let speeds: Vec<f64> = view
            .points()
            .iter()
            .filter_map(|point| point.ground_speed)
            .filter(|speed| speed.is_finite())
            .collect();
        let speed = (!speeds.is_empty()).then(|| SpeedStats {
            mean: speeds.iter().sum::<f64>() / speeds.len() as f64,
            max: speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        });

        Some(Self {
            subject: view.subject().to_owned(),
            taxon: directory.taxon(view.subject()).map(str::to_owned),
            points: view.len(),
            total_km: view.total_km(),
            first_date: first.timestamp.with_timezone(&Utc).date_naive(),
            last_date: last.timestamp.with_timezone(&Utc).date_naive(),
            duration_days: last.timestamp.signed_duration_since(first.timestamp).num_days(),
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            speed,
        })
    }

    #[must_use]
    pub fn total_miles(&self) -> f64 {
        self.total_km * KM_TO_MILES
    }

    /// Average distance per day; only defined for multi-day views.
    #[must_use]
    pub fn km_per_day(&self) -> Option<f64> {
        (self.duration_days > 0).then(|| self.total_km / self.duration_days as f64)
    }

    /// Display lines for the statistics panel and the non-interactive report.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!("Animal: {}", self.subject));
        if let Some(taxon) = &self.taxon {
            lines.push(format!("Taxon: {taxon}"));
        }
        lines.push(format!("Total Points: {}", self.points));
        lines.push(String::new());
        lines.push("Distance Traveled:".to_owned());
        lines.push(format!("  {:.2} km", self.total_km));
        lines.push(format!("  {:.2} miles", self.total_miles()));
        lines.push(String::new());
        lines.push("Date Range:".to_owned());
        lines.push(format!("  {}", self.first_date.format(DATE_FORMAT)));
        lines.push(format!("  to {}", self.last_date.format(DATE_FORMAT)));
        lines.push(format!("Duration: {} days", self.duration_days));
        if let Some(average) = self.km_per_day() {
            lines.push(format!("Avg: {average:.2} km/day"));
        }
        lines.push(String::new());
        lines.push("Bounding Box:".to_owned());
        lines.push(format!("  Lat: {:.4}° to {:.4}°", self.lat_min, self.lat_max));
        lines.push(format!("  Lon: {:.4}° to {:.4}°", self.lon_min, self.lon_max));
        if let Some(speed) = self.speed {
            lines.push(String::new());
            lines.push("Speed (m/s):".to_owned());
            lines.push(format!("  Mean: {:.2}", speed.mean));
            lines.push(format!("  Max: {:.2}", speed.max));
        }
        lines
    }
}
