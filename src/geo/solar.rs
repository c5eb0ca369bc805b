use chrono::{DateTime, NaiveDate, Utc};

use super::LatLon;

/// Julian date of the J2000.0 epoch.
const J2000: f64 = 2_451_545.0;
/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;
/// Axial tilt of the earth in degrees.
const OBLIQUITY_DEG: f64 = 23.4397;
/// Solar altitude at apparent sunrise/sunset (refraction plus solar disc).
const HORIZON_ALTITUDE_DEG: f64 = -0.833;
const PERIHELION_DEG: f64 = 102.9372;

/// Sunrise and sunset instants for one calendar date at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Computes sunrise and sunset with the standard sunrise equation.
///
/// Returns `None` for polar day or night, where the sun never crosses the
/// horizon, and for inputs that produce non-finite intermediate values.
#[must_use]
pub fn sun_times(position: LatLon, date: NaiveDate) -> Option<SunTimes> {
    let epoch = NaiveDate::from_ymd_opt(2000, 1, 1)?;
    let day_number = date.signed_duration_since(epoch).num_days() as f64;

    let mean_solar_time = day_number - position.lon / 360.0;
    let mean_anomaly = (357.5291 + 0.985_600_28 * mean_solar_time).rem_euclid(360.0);
    let m = mean_anomaly.to_radians();
    let center = 1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic_longitude = (mean_anomaly + center + 180.0 + PERIHELION_DEG).rem_euclid(360.0);
    let lambda = ecliptic_longitude.to_radians();

    let transit = J2000 + mean_solar_time + 0.0053 * m.sin() - 0.0069 * (2.0 * lambda).sin();
    let declination = (lambda.sin() * OBLIQUITY_DEG.to_radians().sin()).asin();

    let phi = position.lat.to_radians();
    let cos_hour_angle = (HORIZON_ALTITUDE_DEG.to_radians().sin()
        - phi.sin() * declination.sin())
        / (phi.cos() * declination.cos());
    if !cos_hour_angle.is_finite() || !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }
    let hour_angle_days = cos_hour_angle.acos().to_degrees() / 360.0;

    Some(SunTimes {
        sunrise: julian_to_utc(transit - hour_angle_days)?,
        sunset: julian_to_utc(transit + hour_angle_days)?,
    })
}

fn julian_to_utc(julian: f64) -> Option<DateTime<Utc>> {
    let seconds = (julian - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
