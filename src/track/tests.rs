use std::path::Path;

use chrono::NaiveDate;
use tempfile::tempdir;

use super::{
    DateBounds, GPS_EVENTS_FILE, INDIVIDUALS_FILE, TrackStats, TrackView, load_dataset,
    parse_event_timestamp,
};
use crate::error::{AppError, AppResult, TrackError};

const HEADER: &str = "event_id,individual_local_identifier,timestamp,location_lat,location_long,ground_speed,tag_local_identifier";

const TWO_DAY_TRACK: &str = "\
event_id,individual_local_identifier,timestamp,location_lat,location_long,ground_speed,tag_local_identifier
3,Zebra-1,2024-06-02 08:00:00.000,-1.2700,36.8300,2.5,T1
1,Zebra-1,2024-06-01 06:00:00.000,-1.3000,36.8000,1.0,T1
2,Zebra-1,2024-06-01 18:30:00.000,-1.3100,36.8200,,T1
9,Zebra-1,2024-06-01 19:00:00.000,,36.9000,,T1
4,Zebra-1,2024-06-02 12:00:00.000,-1.2650,36.8400,4.0,T1
5,Zebra-1,2024-06-02 23:59:59.000,-1.2600,36.8500,,T1
7,Lion-2,2024-06-01 10:00:00.000,-2.0000,35.0000,,T9
";

fn write(dir: &Path, name: &str, contents: &str) -> AppResult<()> {
    std::fs::write(dir.join(name), contents)?;
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::validation("invalid fixture date"))
}

fn reference_haversine(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * 6371.0 * h.sqrt().asin()
}

#[test]
fn two_day_track_matches_hand_computed_distance() -> AppResult<()> {
    let dir = tempdir()?;
    write(dir.path(), GPS_EVENTS_FILE, TWO_DAY_TRACK)?;
    let dataset = load_dataset(dir.path())?;

    if dataset.subjects() != ["Lion-2", "Zebra-1"] {
        return Err(AppError::validation(format!(
            "unexpected subjects {:?}",
            dataset.subjects()
        )));
    }

    let bounds = DateBounds::new(date(2024, 6, 1)?, date(2024, 6, 2)?)?;
    let view = TrackView::select(&dataset, "Zebra-1", bounds);
    if view.len() != 5 {
        return Err(AppError::validation(format!(
            "expected all 5 rows, got {}",
            view.len()
        )));
    }

    let ordered = [
        (-1.3000, 36.8000),
        (-1.3100, 36.8200),
        (-1.2700, 36.8300),
        (-1.2650, 36.8400),
        (-1.2600, 36.8500),
    ];
    let expected: f64 = ordered
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(reference_haversine(*a, *b)),
            _ => None,
        })
        .sum();
    let relative = ((view.total_km() - expected) / expected).abs();
    if relative > 1e-6 {
        return Err(AppError::validation(format!(
            "distance {} differs from {expected} (relative {relative})",
            view.total_km()
        )));
    }

    let ids: Vec<&str> = view
        .points()
        .iter()
        .filter_map(|point| dataset.extra_field(point, "event_id"))
        .collect();
    if ids != ["1", "2", "3", "4", "5"] {
        return Err(AppError::validation(format!("not sorted by time: {ids:?}")));
    }
    Ok(())
}

#[test]
fn end_bound_includes_the_whole_last_day() -> AppResult<()> {
    let dir = tempdir()?;
    write(dir.path(), GPS_EVENTS_FILE, TWO_DAY_TRACK)?;
    let dataset = load_dataset(dir.path())?;

    let first_day = DateBounds::new(date(2024, 6, 1)?, date(2024, 6, 1)?)?;
    let view = TrackView::select(&dataset, "Zebra-1", first_day);
    if view.len() != 2 {
        return Err(AppError::validation(format!(
            "expected 2 points on the first day, got {}",
            view.len()
        )));
    }

    let second_day = DateBounds::new(date(2024, 6, 2)?, date(2024, 6, 2)?)?;
    let view = TrackView::select(&dataset, "Zebra-1", second_day);
    if view.len() != 3 {
        return Err(AppError::validation(format!(
            "expected 3 points on the second day, got {}",
            view.len()
        )));
    }
    Ok(())
}

#[test]
fn covering_bounds_span_subject_dates() -> AppResult<()> {
    let dir = tempdir()?;
    write(dir.path(), GPS_EVENTS_FILE, TWO_DAY_TRACK)?;
    let dataset = load_dataset(dir.path())?;
    let bounds = DateBounds::covering(dataset.subject_points("Zebra-1"))
        .ok_or_else(|| AppError::validation("expected bounds"))?;
    if bounds.start() != date(2024, 6, 1)? || bounds.end() != date(2024, 6, 2)? {
        return Err(AppError::validation(format!("unexpected bounds {bounds:?}")));
    }
    if DateBounds::covering(dataset.subject_points("Nobody")).is_some() {
        return Err(AppError::validation("unknown subject has no bounds"));
    }
    Ok(())
}

#[test]
fn date_bounds_parse_and_validate() -> AppResult<()> {
    if DateBounds::parse_date("2024-06-01 13:45:00")? != date(2024, 6, 1)? {
        return Err(AppError::validation("datetime should truncate to its date"));
    }
    if DateBounds::parse_date("06/01/2024").is_ok() {
        return Err(AppError::validation("slash dates are not accepted"));
    }
    if DateBounds::new(date(2024, 6, 2)?, date(2024, 6, 1)?).is_ok() {
        return Err(AppError::validation("reversed bounds should be rejected"));
    }
    Ok(())
}

#[test]
fn stats_summarize_the_view() -> AppResult<()> {
    let dir = tempdir()?;
    write(dir.path(), GPS_EVENTS_FILE, TWO_DAY_TRACK)?;
    write(
        dir.path(),
        INDIVIDUALS_FILE,
        "id,local_identifier,taxon_canonical_name\n1,Zebra-1,Equus quagga\n",
    )?;
    let dataset = load_dataset(dir.path())?;
    let bounds = DateBounds::new(date(2024, 6, 1)?, date(2024, 6, 2)?)?;
    let view = TrackView::select(&dataset, "Zebra-1", bounds);
    let stats = TrackStats::compute(&view, dataset.directory())
        .ok_or_else(|| AppError::validation("expected stats"))?;

    if stats.points != 5 || stats.duration_days != 1 {
        return Err(AppError::validation(format!("unexpected stats {stats:?}")));
    }
    if stats.taxon.as_deref() != Some("Equus quagga") {
        return Err(AppError::validation("taxon should come from individuals.csv"));
    }
    let speed = stats
        .speed
        .ok_or_else(|| AppError::validation("expected speed stats"))?;
    if (speed.mean - 2.5).abs() > 1e-9 || (speed.max - 4.0).abs() > 1e-9 {
        return Err(AppError::validation(format!("unexpected speed {speed:?}")));
    }
    if (stats.lat_min + 1.31).abs() > 1e-9 || (stats.lon_max - 36.85).abs() > 1e-9 {
        return Err(AppError::validation("unexpected bounding box"));
    }
    let per_day = stats
        .km_per_day()
        .ok_or_else(|| AppError::validation("expected a daily average"))?;
    if (per_day - stats.total_km).abs() > 1e-9 {
        return Err(AppError::validation("one-day duration averages to the total"));
    }
    let lines = stats.lines();
    if !lines.iter().any(|line| line == "Duration: 1 days") {
        return Err(AppError::validation(format!("missing duration line: {lines:?}")));
    }
    Ok(())
}

#[test]
fn empty_view_has_no_stats() -> AppResult<()> {
    let view = TrackView::from_points("Nobody", None, Vec::new());
    if TrackStats::compute(&view, &super::SubjectDirectory::default()).is_some() {
        return Err(AppError::validation("empty view should have no stats"));
    }
    Ok(())
}

#[test]
fn missing_gps_file_is_reported() -> AppResult<()> {
    let dir = tempdir()?;
    match load_dataset(dir.path()) {
        Err(TrackError::MissingFile { path }) if path.ends_with(GPS_EVENTS_FILE) => Ok(()),
        Err(err) => Err(AppError::validation(format!("unexpected error {err}"))),
        Ok(_) => Err(AppError::validation("expected a missing file error")),
    }
}

#[test]
fn missing_required_column_is_reported() -> AppResult<()> {
    let dir = tempdir()?;
    write(
        dir.path(),
        GPS_EVENTS_FILE,
        "individual_local_identifier,timestamp,location_lat\nA,2024-01-01 00:00:00,1.0\n",
    )?;
    match load_dataset(dir.path()) {
        Err(TrackError::MissingColumn { column, .. }) if column == "location_long" => Ok(()),
        Err(err) => Err(AppError::validation(format!("unexpected error {err}"))),
        Ok(_) => Err(AppError::validation("expected a missing column error")),
    }
}

#[test]
fn bad_timestamp_names_the_row() -> AppResult<()> {
    let dir = tempdir()?;
    let contents = format!(
        "{HEADER}\n1,A,2024-01-01 00:00:00,1.0,2.0,,T\n2,A,not a time,1.0,2.0,,T\n"
    );
    write(dir.path(), GPS_EVENTS_FILE, &contents)?;
    match load_dataset(dir.path()) {
        Err(TrackError::InvalidTimestamp { row: 3, value, .. }) if value == "not a time" => Ok(()),
        Err(err) => Err(AppError::validation(format!("unexpected error {err}"))),
        Ok(_) => Err(AppError::validation("expected a timestamp error")),
    }
}

#[test]
fn out_of_range_coordinates_are_dropped() -> AppResult<()> {
    let dir = tempdir()?;
    let contents = format!(
        "{HEADER}\n1,A,2024-01-01 00:00:00,91.0,2.0,,T\n2,A,2024-01-01 01:00:00,1.0,2.0,,T\n"
    );
    write(dir.path(), GPS_EVENTS_FILE, &contents)?;
    let dataset = load_dataset(dir.path())?;
    if dataset.points().len() != 1 {
        return Err(AppError::validation("latitude 91 should be excluded"));
    }
    Ok(())
}

#[test]
fn event_timestamps_accept_common_shapes() -> AppResult<()> {
    let expected = parse_event_timestamp("2024-06-01T09:00:00Z")
        .ok_or_else(|| AppError::validation("rfc3339 should parse"))?;
    for value in [
        "2024-06-01 09:00:00",
        "2024-06-01 09:00:00.000",
        "2024-06-01T09:00:00",
        "2024-06-01T12:00:00+03:00",
    ] {
        let parsed = parse_event_timestamp(value)
            .ok_or_else(|| AppError::validation(format!("{value} should parse")))?;
        if parsed != expected {
            return Err(AppError::validation(format!("{value} parsed to {parsed}")));
        }
    }
    if parse_event_timestamp("2024-06-01").is_some() {
        return Err(AppError::validation("date-only values are not event timestamps"));
    }
    Ok(())
}
