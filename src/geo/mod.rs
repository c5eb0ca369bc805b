//! Spherical-earth helpers used by track statistics and playback frames.
mod daynight;
mod distance;
mod solar;


pub use daynight::{DayPhase, ReferenceZone, is_daytime, reference_sun_times};
pub use distance::{DistanceProfile, EARTH_RADIUS_KM, haversine_km, total_distance_km};
pub use solar::{SunTimes, sun_times};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
