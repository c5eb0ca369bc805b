use chrono::{DateTime, FixedOffset};

use crate::geo::LatLon;

/// One GPS fix parsed from an events table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub subject: String,
    pub timestamp: DateTime<FixedOffset>,
    pub position: LatLon,
    /// Ground speed in m/s, when the tag reported one.
    pub ground_speed: Option<f64>,
    /// Remaining columns, aligned with [`GpsDataset::extra_columns`].
    ///
    /// [`GpsDataset::extra_columns`]: super::GpsDataset::extra_columns
    pub extra: Vec<String>,
}
