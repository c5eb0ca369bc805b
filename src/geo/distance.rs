use super::LatLon;

/// Mean earth radius used for all distance figures.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two positions.
#[must_use]
pub fn haversine_km(from: LatLon, to: LatLon) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = to.lon.to_radians() - from.lon.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    c * EARTH_RADIUS_KM
}

/// Sum of consecutive pairwise distances, accumulated front to back.
#[must_use]
pub fn total_distance_km(points: &[LatLon]) -> f64 {
    points
        .windows(2)
        .filter_map(|pair| match pair {
            [from, to] => Some(haversine_km(*from, *to)),
            _ => None,
        })
        .fold(0.0, |total, step| total + step)
}

/// Running distance from the first point of a track to every later point.
///
/// Built with the same front-to-back accumulation as [`total_distance_km`],
/// so `distance_to(len - 1)` is bit-identical to a fresh total.
#[derive(Debug, Clone, Default)]
pub struct DistanceProfile {
    prefix_km: Vec<f64>,
}

impl DistanceProfile {
    #[must_use]
    pub fn new(points: &[LatLon]) -> Self {
        let mut prefix_km = Vec::with_capacity(points.len());
        let mut running = 0.0;
        let mut previous: Option<LatLon> = None;
        for point in points {
            if let Some(prev) = previous {
                running += haversine_km(prev, *point);
            }
            prefix_km.push(running);
            previous = Some(*point);
        }
        Self { prefix_km }
    }

    /// Distance covered once the first `revealed` points have been visited.
    #[must_use]
    pub fn distance_revealed(&self, revealed: usize) -> f64 {
        if revealed == 0 {
            return 0.0;
        }
        let last = revealed.min(self.prefix_km.len()).saturating_sub(1);
        self.prefix_km.get(last).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn total_km(&self) -> f64 {
        self.prefix_km.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prefix_km.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix_km.is_empty()
    }
}
