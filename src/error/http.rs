use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid service URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request for {entity} failed: {source}")]
    RequestFailed {
        entity: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read {entity} response body: {source}")]
    ReadBody {
        entity: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Access denied (403) for {entity}. Check your permissions for this study.")]
    PermissionDenied { entity: String },
    #[error("License terms for {entity} were not accepted (incorrect license hash).")]
    LicenseRejected { entity: String },
    #[error("Request for {entity} returned HTTP {status}: {body}")]
    Status {
        entity: String,
        status: u16,
        body: String,
    },
    #[error("The service returned an empty response for {entity}.")]
    EmptyResponse { entity: String },
    #[error("Failed to parse {entity} table: {source}")]
    ParseTable {
        entity: String,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    WriteTable {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
