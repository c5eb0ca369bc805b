use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::{debug, info};

use crate::error::TrackError;
use crate::geo::LatLon;

use super::TrackPoint;

pub const GPS_EVENTS_FILE: &str = "events_gps.csv";
pub const INDIVIDUALS_FILE: &str = "individuals.csv";

const SUBJECT_COLUMN: &str = "individual_local_identifier";
const TIMESTAMP_COLUMN: &str = "timestamp";
const LAT_COLUMN: &str = "location_lat";
const LON_COLUMN: &str = "location_long";
const SPEED_COLUMN: &str = "ground_speed";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// All GPS points of a data directory plus the optional subject metadata.
#[derive(Debug, Clone, Default)]
pub struct GpsDataset {
    points: Vec<TrackPoint>,
    extra_columns: Vec<String>,
    subjects: Vec<String>,
    directory: SubjectDirectory,
    source: PathBuf,
}

impl GpsDataset {
    #[must_use]
    pub fn new(points: Vec<TrackPoint>, extra_columns: Vec<String>) -> Self {
        let subjects = points
            .iter()
            .map(|point| point.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            points,
            extra_columns,
            subjects,
            directory: SubjectDirectory::default(),
            source: PathBuf::new(),
        }
    }

    #[must_use]
    pub fn with_directory(mut self, directory: SubjectDirectory) -> Self {
        self.directory = directory;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Distinct subject identifiers, sorted.
    #[must_use]
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    #[must_use]
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    #[must_use]
    pub const fn directory(&self) -> &SubjectDirectory {
        &self.directory
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Looks up an additional column of a point by header name.
    #[must_use]
    pub fn extra_field<'point>(&self, point: &'point TrackPoint, column: &str) -> Option<&'point str> {
        let index = self.extra_columns.iter().position(|name| name == column)?;
        point.extra.get(index).map(String::as_str)
    }

    pub fn subject_points<'data>(
        &'data self,
        subject: &'data str,
    ) -> impl Iterator<Item = &'data TrackPoint> + 'data {
        self.points
            .iter()
            .filter(move |point| point.subject == subject)
    }
}

/// Optional `individuals.csv` metadata keyed by local identifier.
#[derive(Debug, Clone, Default)]
pub struct SubjectDirectory {
    taxa: BTreeMap<String, String>,
}

impl SubjectDirectory {
    #[must_use]
    pub fn taxon(&self, subject: &str) -> Option<&str> {
        self.taxa.get(subject).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }
}

/// Loads `events_gps.csv` and, when present, `individuals.csv` from `dir`.
///
/// # Errors
///
/// Returns an error when the GPS file is missing or malformed, or when it
/// holds no point with usable coordinates.
pub fn load_dataset(dir: &Path) -> Result<GpsDataset, TrackError> {
    let gps_path = dir.join(GPS_EVENTS_FILE);
    if !gps_path.is_file() {
        return Err(TrackError::MissingFile { path: gps_path });
    }
    info!("Loading GPS data from {}", gps_path.display());
    let (points, extra_columns) = load_gps_events(&gps_path)?;
    if points.is_empty() {
        return Err(TrackError::NoPoints { path: gps_path });
    }

    let individuals_path = dir.join(INDIVIDUALS_FILE);
    let directory = if individuals_path.is_file() {
        load_subject_directory(&individuals_path)?
    } else {
        SubjectDirectory::default()
    };

    let dataset = GpsDataset::new(points, extra_columns)
        .with_directory(directory)
        .with_source(dir.to_path_buf());
    info!(
        "Loaded {} GPS points from {} subjects",
        dataset.points().len(),
        dataset.subjects().len()
    );
    Ok(dataset)
}

struct Columns {
    subject: usize,
    timestamp: usize,
    lat: usize,
    lon: usize,
    speed: Option<usize>,
    extra: Vec<usize>,
}

impl Columns {
    fn locate(path: &Path, headers: &csv::StringRecord) -> Result<Self, TrackError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|name| name.trim() == column)
                .ok_or_else(|| TrackError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        let subject = find(SUBJECT_COLUMN)?;
        let timestamp = find(TIMESTAMP_COLUMN)?;
        let lat = find(LAT_COLUMN)?;
        let lon = find(LON_COLUMN)?;
        let speed = find(SPEED_COLUMN).ok();
        let known = [Some(subject), Some(timestamp), Some(lat), Some(lon), speed];
        let extra = (0..headers.len())
            .filter(|index| !known.contains(&Some(*index)))
            .collect();
        Ok(Self {
            subject,
            timestamp,
            lat,
            lon,
            speed,
            extra,
        })
    }
}

/// Parses a GPS events table.
///
/// Rows with an empty subject, empty coordinates, or coordinates outside the
/// WGS84 ranges are skipped. Returns the points and the names of the columns
/// carried in [`TrackPoint::extra`].
///
/// # Errors
///
/// Returns an error for unreadable files, missing required columns and
/// unparseable timestamps or numbers.
pub fn load_gps_events(path: &Path) -> Result<(Vec<TrackPoint>, Vec<String>), TrackError> {
    let read_error = |source: csv::Error| TrackError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;
    let headers = reader.headers().map_err(read_error)?.clone();
    let columns = Columns::locate(path, &headers)?;
    let extra_columns = columns
        .extra
        .iter()
        .filter_map(|index| headers.get(*index))
        .map(str::to_owned)
        .collect();

    let mut points = Vec::new();
    let mut skipped = 0_usize;
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        let row = record
            .position()
            .and_then(|position| usize::try_from(position.line()).ok())
            .unwrap_or(index + 2);
        let cell = |column: usize| record.get(column).map(str::trim).unwrap_or_default();

        let subject = cell(columns.subject);
        let lat = cell(columns.lat);
        let lon = cell(columns.lon);
        if subject.is_empty() || lat.is_empty() || lon.is_empty() {
            skipped += 1;
            continue;
        }
        let position = LatLon::new(
            parse_number(path, row, LAT_COLUMN, lat)?,
            parse_number(path, row, LON_COLUMN, lon)?,
        );
        if !position.is_valid() {
            skipped += 1;
            continue;
        }

        let raw_timestamp = cell(columns.timestamp);
        let timestamp =
            parse_event_timestamp(raw_timestamp).ok_or_else(|| TrackError::InvalidTimestamp {
                path: path.to_path_buf(),
                row,
                value: raw_timestamp.to_owned(),
            })?;
        let ground_speed = match columns.speed.map(cell) {
            Some(value) if !value.is_empty() => {
                Some(parse_number(path, row, SPEED_COLUMN, value)?)
            }
            Some(_) | None => None,
        };
        let extra = columns
            .extra
            .iter()
            .map(|column| cell(*column).to_owned())
            .collect();

        points.push(TrackPoint {
            subject: subject.to_owned(),
            timestamp,
            position,
            ground_speed,
            extra,
        });
    }
    debug!(
        "Parsed {} points from {} ({} rows without usable coordinates)",
        points.len(),
        path.display(),
        skipped
    );
    Ok((points, extra_columns))
}

fn parse_number(
    path: &Path,
    row: usize,
    column: &'static str,
    value: &str,
) -> Result<f64, TrackError> {
    value.parse::<f64>().ok().ok_or_else(|| TrackError::InvalidNumber {
        path: path.to_path_buf(),
        row,
        column,
        value: value.to_owned(),
    })
}

/// Parses an event timestamp. Values without an offset are taken as UTC.
#[must_use]
pub fn parse_event_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed);
    }
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Reads subject metadata from `individuals.csv`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or lacks `local_identifier`.
pub fn load_subject_directory(path: &Path) -> Result<SubjectDirectory, TrackError> {
    let read_error = |source: csv::Error| TrackError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;
    let headers = reader.headers().map_err(read_error)?.clone();
    let position = |column: &str| headers.iter().position(|name| name.trim() == column);
    let id_column = position("local_identifier").ok_or_else(|| TrackError::MissingColumn {
        path: path.to_path_buf(),
        column: "local_identifier",
    })?;
    let Some(taxon_column) = position("taxon_canonical_name") else {
        debug!("{} has no taxon column", path.display());
        return Ok(SubjectDirectory::default());
    };

    let mut taxa = BTreeMap::new();
    for record in reader.records() {
        let record = record.map_err(read_error)?;
        let id = record.get(id_column).map(str::trim).unwrap_or_default();
        let taxon = record.get(taxon_column).map(str::trim).unwrap_or_default();
        if !id.is_empty() && !taxon.is_empty() {
            taxa.insert(id.to_owned(), taxon.to_owned());
        }
    }
    debug!("Loaded {} subjects from {}", taxa.len(), path.display());
    Ok(SubjectDirectory { taxa })
}
