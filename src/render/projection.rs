//! Planar projections for drawing tracks.
use crate::geo::LatLon;

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;
/// Smallest half-extent of a fitted viewport, in projected degrees.
const MIN_HALF_EXTENT: f64 = 0.005;

/// Web Mercator northing expressed in degrees, so it shares units with
/// longitude.
#[must_use]
pub fn mercator_y(lat: f64) -> f64 {
    let phi = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln().to_degrees()
}

/// Projects a position to `(x, y)` Web Mercator coordinates in degrees.
#[must_use]
pub fn project_mercator(position: LatLon) -> (f64, f64) {
    (position.lon, mercator_y(position.lat))
}

/// Axis-aligned viewport around a set of planar points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PlotBounds {
    /// Fits the points and pads each axis by `pad_fraction` of its extent.
    /// Returns `None` for an empty input.
    #[must_use]
    pub fn fit(points: impl IntoIterator<Item = (f64, f64)>, pad_fraction: f64) -> Option<Self> {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let mut bounds = Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        };
        for (x, y) in points {
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
        }
        let (min_x, max_x) = pad(bounds.min_x, bounds.max_x, pad_fraction);
        let (min_y, max_y) = pad(bounds.min_y, bounds.max_y, pad_fraction);
        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    #[must_use]
    pub const fn x_bounds(&self) -> [f64; 2] {
        [self.min_x, self.max_x]
    }

    #[must_use]
    pub const fn y_bounds(&self) -> [f64; 2] {
        [self.min_y, self.max_y]
    }

    #[must_use]
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

fn pad(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let center = (min + max) / 2.0;
    let half = ((max - min) / 2.0 * (1.0 + 2.0 * fraction)).max(MIN_HALF_EXTENT);
    (center - half, center + half)
}
