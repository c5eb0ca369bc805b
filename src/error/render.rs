use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No data to display for the current selection.")]
    EmptyView,
    #[error("Failed to write map document '{path}': {source}")]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode map data: {source}")]
    EncodeMapData {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
