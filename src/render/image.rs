use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{AppError, AppResult, RenderError};
use crate::geo::DayPhase;
use crate::playback::RenderModel;

use super::ensure_parent_dir;
use super::projection::{PlotBounds, project_mercator};

pub const IMAGE_SIZE: (u32, u32) = (1280, 960);
const IMAGE_MARGIN: u32 = 20;
const PAD_FRACTION: f64 = 0.05;
const TRACK_COLOR: RGBColor = RGBColor(0x1e, 0x90, 0xff);
const TRAIL_COLOR: RGBColor = RGBColor(0xff, 0xa5, 0x00);
const START_COLOR: RGBColor = RGBColor(0x22, 0xc5, 0x5e);
const END_COLOR: RGBColor = RGBColor(0xef, 0x44, 0x44);
const DAY_FILL: RGBColor = RGBColor(0xff, 0xd7, 0x00);
const DAY_EDGE: RGBColor = RGBColor(0xff, 0x8c, 0x00);
const NIGHT_FILL: RGBColor = RGBColor(0x00, 0x00, 0x80);
const NIGHT_EDGE: RGBColor = RGBColor(0x00, 0xff, 0xff);

const fn marker_colors(phase: DayPhase) -> (RGBColor, RGBColor) {
    match phase {
        DayPhase::Day => (DAY_FILL, DAY_EDGE),
        DayPhase::Night => (NIGHT_FILL, NIGHT_EDGE),
    }
}

/// Draws the render model as a Web Mercator PNG: the full track with start
/// and end markers, plus the trail and day/night marker when a frame is
/// active.
///
/// # Errors
///
/// Returns an error when the model has no track or the image cannot be
/// drawn or written.
pub fn export_image(model: &RenderModel<'_>, path: &Path) -> AppResult<()> {
    let (Some(start), Some(end)) = (model.start(), model.end()) else {
        return Err(AppError::render(RenderError::EmptyView));
    };
    let bounds = PlotBounds::fit(
        model.full_track.iter().copied().map(project_mercator),
        PAD_FRACTION,
    )
    .ok_or_else(|| AppError::render(RenderError::EmptyView))?;
    ensure_parent_dir(path)?;

    let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(IMAGE_MARGIN)
        .build_cartesian_2d(bounds.min_x..bounds.max_x, bounds.min_y..bounds.max_y)?;

    chart.draw_series(LineSeries::new(
        model.full_track.iter().copied().map(project_mercator),
        TRACK_COLOR.stroke_width(2),
    ))?;
    chart.draw_series([
        Circle::new(project_mercator(start), 7, START_COLOR.filled()),
        Circle::new(project_mercator(end), 7, END_COLOR.filled()),
    ])?;

    if let Some(frame) = model.frame.as_ref() {
        chart.draw_series(LineSeries::new(
            frame.trail.iter().copied().map(project_mercator),
            TRAIL_COLOR.stroke_width(3),
        ))?;
        let (fill, edge) = marker_colors(frame.phase);
        let marker = project_mercator(frame.marker);
        chart.draw_series([
            Circle::new(marker, 9, fill.filled()),
            Circle::new(marker, 9, edge.stroke_width(2)),
        ])?;
    }

    root.present()?;
    info!("Image exported to {}", path.display());
    Ok(())
}
