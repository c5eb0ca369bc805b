use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("GPS data file not found: {path}")]
    MissingFile { path: PathBuf },
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("'{path}' is missing the required column '{column}'.")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },
    #[error("'{path}' row {row}: invalid timestamp '{value}'.")]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },
    #[error("'{path}' row {row}: invalid number '{value}' in column '{column}'.")]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("'{path}' contains no GPS points with coordinates.")]
    NoPoints { path: PathBuf },
}
