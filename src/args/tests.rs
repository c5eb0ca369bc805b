use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::{BaseMap, Cli, Command, DEFAULT_DATA_DIR, FetchArgs, ViewArgs};
use crate::error::{AppError, AppResult};

fn fetch_args(argv: &[&str]) -> AppResult<FetchArgs> {
    let cli = Cli::try_parse_from(argv)?;
    match cli.command {
        Command::Fetch(args) => Ok(args),
        Command::View(_) => Err(AppError::validation("Expected fetch subcommand")),
    }
}

fn view_args(argv: &[&str]) -> AppResult<ViewArgs> {
    let cli = Cli::try_parse_from(argv)?;
    match cli.command {
        Command::View(args) => Ok(args),
        Command::Fetch(_) => Err(AppError::validation("Expected view subcommand")),
    }
}

#[test]
fn fetch_defaults() -> AppResult<()> {
    let args = fetch_args(&["movetrack", "fetch"])?;
    if args.study_id.is_some() || !args.sensors.is_empty() {
        return Err(AppError::validation("Unexpected study or sensors"));
    }
    if args.output != PathBuf::from(DEFAULT_DATA_DIR) {
        return Err(AppError::validation("Unexpected output directory"));
    }
    if args.timeout != Duration::from_secs(300) {
        return Err(AppError::validation("Unexpected default timeout"));
    }
    if args.no_metadata || args.list_sensors {
        return Err(AppError::validation("Flags should default to off"));
    }
    Ok(())
}

#[test]
fn fetch_options() -> AppResult<()> {
    let args = fetch_args(&[
        "movetrack",
        "fetch",
        "--study-id",
        "3445611111",
        "--sensors",
        "gps",
        "acc",
        "--start",
        "2024-01-01",
        "--timeout",
        "2m",
        "--no-metadata",
    ])?;
    if args.study_id != Some(3_445_611_111) {
        return Err(AppError::validation("Unexpected study id"));
    }
    if args.sensors != ["gps", "acc"] {
        return Err(AppError::validation(format!(
            "Unexpected sensors {:?}",
            args.sensors
        )));
    }
    if args.timeout != Duration::from_secs(120) || !args.no_metadata {
        return Err(AppError::validation("Unexpected timeout or metadata flag"));
    }
    Ok(())
}

#[test]
fn global_flags_follow_subcommand() -> AppResult<()> {
    let cli = Cli::try_parse_from(["movetrack", "view", "--verbose", "--config", "mt.toml"])?;
    if !cli.verbose || cli.config.as_deref() != Some("mt.toml") {
        return Err(AppError::validation("Global flags were not parsed"));
    }
    Ok(())
}

#[test]
fn view_defaults() -> AppResult<()> {
    let args = view_args(&["movetrack", "view"])?;
    if args.data_dir != PathBuf::from(DEFAULT_DATA_DIR) {
        return Err(AppError::validation("Unexpected data directory"));
    }
    if args.base_map != BaseMap::OpenStreetMap || args.trail_length != 50 || args.speed != 100 {
        return Err(AppError::validation("Unexpected viewer defaults"));
    }
    if args.utc_offset != "+03:00" || args.zone_label != "EAT" {
        return Err(AppError::validation("Unexpected reference zone"));
    }
    Ok(())
}

#[test]
fn view_options() -> AppResult<()> {
    let args = view_args(&[
        "movetrack",
        "view",
        "data",
        "--subject",
        "Zebra-1",
        "--start",
        "2024-06-01",
        "--end",
        "2024-06-02 23:00:00",
        "--base-map",
        "osm",
        "--trail-length",
        "0",
        "--speed",
        "1000",
        "--utc-offset=-05:00",
        "--heatmap",
        "--no-ui",
    ])?;
    if args.data_dir != PathBuf::from("data") || args.subject.as_deref() != Some("Zebra-1") {
        return Err(AppError::validation("Unexpected data dir or subject"));
    }
    if args.end.as_deref() != Some("2024-06-02 23:00:00") {
        return Err(AppError::validation("Datetime bounds should be kept as given"));
    }
    if args.trail_length != 0 || args.speed != 1000 || args.utc_offset != "-05:00" {
        return Err(AppError::validation("Unexpected numeric options"));
    }
    if !args.heatmap || !args.no_ui {
        return Err(AppError::validation("Unexpected flags"));
    }
    Ok(())
}

#[test]
fn view_rejects_out_of_range_values() -> AppResult<()> {
    let cases: [&[&str]; 5] = [
        &["movetrack", "view", "--speed", "5"],
        &["movetrack", "view", "--speed", "1001"],
        &["movetrack", "view", "--trail-length", "201"],
        &["movetrack", "view", "--start", "June 1st"],
        &["movetrack", "view", "--utc-offset", "3"],
    ];
    for argv in cases {
        if Cli::try_parse_from(argv).is_ok() {
            return Err(AppError::validation(format!("Expected {argv:?} to fail")));
        }
    }
    Ok(())
}

#[test]
fn base_map_cycles_through_every_layer() -> AppResult<()> {
    let mut layer = BaseMap::default();
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(layer.label());
        layer = layer.next();
    }
    if seen != ["OpenStreetMap", "Satellite", "Terrain"] || layer != BaseMap::OpenStreetMap {
        return Err(AppError::validation(format!("Unexpected cycle {seen:?}")));
    }
    Ok(())
}
