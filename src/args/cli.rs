use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::movebank::DEFAULT_BASE_URL;
use crate::playback::{DEFAULT_SPEED, DEFAULT_TRAIL_LENGTH};

use super::parsers::{
    parse_date_arg, parse_duration_arg, parse_speed, parse_trail_length, parse_utc_offset,
};
use super::types::BaseMap;

/// Directory shared by `fetch` (output) and `view` (input).
pub const DEFAULT_DATA_DIR: &str = "movebank_data";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Download animal tracking data from Movebank and replay GPS tracks with day/night shading, distance and statistics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML or JSON); defaults to movetrack.toml/movetrack.json
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Download study metadata and sensor events as CSV files
    Fetch(FetchArgs),
    /// Replay GPS tracks from downloaded CSV files
    View(ViewArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Movebank study id
    #[arg(long = "study-id")]
    pub study_id: Option<u64>,

    /// Sensor types to fetch by name, alias or numeric id (default: all in the study)
    #[arg(long, num_args = 1..)]
    pub sensors: Vec<String>,

    /// Start of the time range (e.g. 2024-01-01 or "2024-01-01 12:00:00")
    #[arg(long)]
    pub start: Option<String>,

    /// End of the time range
    #[arg(long)]
    pub end: Option<String>,

    /// Output directory for CSV files
    #[arg(long, short, default_value = DEFAULT_DATA_DIR)]
    pub output: PathBuf,

    /// Restrict event requests to one individual id
    #[arg(long)]
    pub individual: Option<String>,

    /// Skip individuals, tags and deployments
    #[arg(long = "no-metadata")]
    pub no_metadata: bool,

    /// Print the sensor types available in the study and exit
    #[arg(long = "list-sensors")]
    pub list_sensors: bool,

    /// Movebank username (falls back to $mbus, then the config file)
    #[arg(long)]
    pub username: Option<String>,

    /// Movebank password (falls back to $mbpw, then the config file)
    #[arg(long)]
    pub password: Option<String>,

    /// Direct-read service URL
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, default_value = "300s", value_parser = parse_duration_arg)]
    pub timeout: Duration,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Directory containing events_gps.csv
    #[arg(default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Subject (individual_local_identifier) to show first
    #[arg(long)]
    pub subject: Option<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<String>,

    /// Last day to include (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<String>,

    /// Base layer of the map document
    #[arg(long = "base-map", value_enum, default_value = "openstreetmap")]
    pub base_map: BaseMap,

    /// Number of trailing points drawn behind the marker
    #[arg(
        long = "trail-length",
        default_value_t = DEFAULT_TRAIL_LENGTH,
        value_parser = parse_trail_length
    )]
    pub trail_length: usize,

    /// Playback speed in points per second
    #[arg(long, default_value_t = DEFAULT_SPEED, value_parser = parse_speed)]
    pub speed: u32,

    /// Write the interactive map document to this file
    #[arg(long = "map-out")]
    pub map_out: Option<PathBuf>,

    /// Write a PNG snapshot of the track to this file
    #[arg(long = "image-out")]
    pub image_out: Option<PathBuf>,

    /// Add a point-density heat map to the map document
    #[arg(long)]
    pub heatmap: bool,

    /// Leave the track line out of the map document
    #[arg(long = "no-track")]
    pub no_track: bool,

    /// Leave the point markers out of the map document
    #[arg(long = "no-markers")]
    pub no_markers: bool,

    /// Print statistics and write outputs without the terminal UI
    #[arg(long = "no-ui")]
    pub no_ui: bool,

    /// Reference timezone for day/night and local times (+HH:MM)
    #[arg(
        long = "utc-offset",
        default_value = "+03:00",
        allow_hyphen_values = true,
        value_parser = parse_utc_offset
    )]
    pub utc_offset: String,

    /// Label shown next to local times
    #[arg(long = "zone-label", default_value = "EAT")]
    pub zone_label: String,
}
