use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{FetchArgs, ViewArgs};
use crate::error::{AppError, AppResult, ValidationError};
use crate::geo::ReferenceZone;
use crate::playback::{MAX_SPEED, MAX_TRAIL_LENGTH, MIN_SPEED};
use crate::track::DateBounds;

use super::types::ConfigFile;

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_range(field: &'static str, value: u64, min: u64, max: u64) -> AppResult<u64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::validation(ValidationError::ValueOutOfRange {
            field,
            value,
            min,
            max,
        }))
    }
}

/// Fills fetch options the command line left unset.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_fetch_config(
    args: &mut FetchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if let Some(service) = config.service.as_ref() {
        if !is_cli(matches, "base_url")
            && let Some(base_url) = service.base_url.clone()
        {
            args.base_url = base_url;
        }
        if !is_cli(matches, "timeout")
            && let Some(timeout) = service.timeout.as_ref()
        {
            args.timeout = timeout.to_duration("service.timeout")?;
        }
    }

    let Some(fetch) = config.fetch.as_ref() else {
        return Ok(());
    };
    if !is_cli(matches, "study_id")
        && let Some(study_id) = fetch.study_id
    {
        args.study_id = Some(study_id);
    }
    if !is_cli(matches, "sensors")
        && let Some(sensors) = fetch.sensors.clone()
    {
        args.sensors = sensors;
    }
    if !is_cli(matches, "start")
        && let Some(start) = fetch.start.clone()
    {
        args.start = Some(start);
    }
    if !is_cli(matches, "end")
        && let Some(end) = fetch.end.clone()
    {
        args.end = Some(end);
    }
    if !is_cli(matches, "output")
        && let Some(output_dir) = fetch.output_dir.as_ref()
    {
        args.output = PathBuf::from(output_dir);
    }
    if !is_cli(matches, "individual")
        && let Some(individual) = fetch.individual.clone()
    {
        args.individual = Some(individual);
    }
    if !is_cli(matches, "no_metadata")
        && let Some(metadata) = fetch.metadata
    {
        args.no_metadata = !metadata;
    }
    Ok(())
}

/// Fills viewer options the command line left unset.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_view_config(
    args: &mut ViewArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    let Some(viewer) = config.viewer.as_ref() else {
        return Ok(());
    };
    if !is_cli(matches, "data_dir")
        && let Some(data_dir) = viewer.data_dir.as_ref()
    {
        args.data_dir = PathBuf::from(data_dir);
    }
    if !is_cli(matches, "subject")
        && let Some(subject) = viewer.subject.clone()
    {
        args.subject = Some(subject);
    }
    if !is_cli(matches, "start")
        && let Some(start) = viewer.start.as_ref()
    {
        DateBounds::parse_date(start)?;
        args.start = Some(start.clone());
    }
    if !is_cli(matches, "end")
        && let Some(end) = viewer.end.as_ref()
    {
        DateBounds::parse_date(end)?;
        args.end = Some(end.clone());
    }
    if !is_cli(matches, "base_map")
        && let Some(base_map) = viewer.base_map
    {
        args.base_map = base_map;
    }
    if !is_cli(matches, "trail_length")
        && let Some(trail_length) = viewer.trail_length
    {
        let max = u64::try_from(MAX_TRAIL_LENGTH).unwrap_or(u64::MAX);
        let value = u64::try_from(trail_length).unwrap_or(u64::MAX);
        ensure_range("viewer.trail_length", value, 0, max)?;
        args.trail_length = trail_length;
    }
    if !is_cli(matches, "speed")
        && let Some(speed) = viewer.speed
    {
        ensure_range(
            "viewer.speed",
            u64::from(speed),
            u64::from(MIN_SPEED),
            u64::from(MAX_SPEED),
        )?;
        args.speed = speed;
    }
    if !is_cli(matches, "utc_offset")
        && let Some(offset) = viewer.utc_offset.as_ref()
    {
        ReferenceZone::parse_offset(offset)?;
        args.utc_offset = offset.clone();
    }
    if !is_cli(matches, "zone_label")
        && let Some(label) = viewer.zone_label.clone()
    {
        args.zone_label = label;
    }
    if !is_cli(matches, "map_out")
        && let Some(map_out) = viewer.map_out.as_ref()
    {
        args.map_out = Some(PathBuf::from(map_out));
    }
    if !is_cli(matches, "image_out")
        && let Some(image_out) = viewer.image_out.as_ref()
    {
        args.image_out = Some(PathBuf::from(image_out));
    }
    apply_flag(matches, "heatmap", viewer.heatmap, &mut args.heatmap);
    apply_flag(matches, "no_track", viewer.no_track, &mut args.no_track);
    apply_flag(matches, "no_markers", viewer.no_markers, &mut args.no_markers);
    apply_flag(matches, "no_ui", viewer.no_ui, &mut args.no_ui);
    Ok(())
}

fn apply_flag(matches: &ArgMatches, name: &str, value: Option<bool>, target: &mut bool) {
    if !is_cli(matches, name)
        && let Some(value) = value
    {
        *target = value;
    }
}
