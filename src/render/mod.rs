//! Map document and static image output for track views.
mod html;
mod image;
mod projection;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::error::RenderError;

pub use html::{
    MAX_MARKERS, MapOptions, ZOOM_START, escape_html, map_document, marker_stride,
    write_map_document,
};
pub use image::{IMAGE_SIZE, export_image};
pub use projection::{MAX_MERCATOR_LAT, PlotBounds, mercator_y, project_mercator};

fn ensure_parent_dir(path: &Path) -> Result<(), RenderError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|source| RenderError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            }),
        Some(_) | None => Ok(()),
    }
}
