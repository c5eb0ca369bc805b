use ratatui::{
    layout::Rect,
    prelude::{Backend, Frame},
    symbols::Marker,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Line, Map, MapResolution, Points},
    },
};

use crate::geo::LatLon;
use crate::playback::RenderModel;
use crate::render::PlotBounds;

use super::theme::{
    COASTLINE_RGB, END_RGB, MAP_PAD_FRACTION, MIN_CANVAS_SIDE, START_RGB, TRACK_RGB, TRAIL_RGB,
    panel_border_style, phase_color, rgb,
};

/// Canvas coordinates are plain longitude/latitude so the world outline
/// lines up with the track.
const fn canvas_point(position: LatLon) -> (f64, f64) {
    (position.lon, position.lat)
}

fn segments(positions: &[LatLon]) -> impl Iterator<Item = (LatLon, LatLon)> + '_ {
    positions
        .windows(2)
        .filter_map(|pair| Some((*pair.first()?, *pair.get(1)?)))
}

pub(super) fn render_map<B: Backend>(f: &mut Frame<'_, B>, model: &RenderModel<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border_style())
        .title(" Map ");
    let inner = block.inner(area);
    if inner.width < MIN_CANVAS_SIDE || inner.height < MIN_CANVAS_SIDE {
        f.render_widget(block, area);
        return;
    }
    let Some(bounds) = PlotBounds::fit(
        model.full_track.iter().copied().map(canvas_point),
        MAP_PAD_FRACTION,
    ) else {
        f.render_widget(block, area);
        return;
    };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(bounds.x_bounds())
        .y_bounds(bounds.y_bounds())
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: rgb(COASTLINE_RGB),
            });
            ctx.layer();
            for (from, to) in segments(model.full_track) {
                ctx.draw(&Line {
                    x1: from.lon,
                    y1: from.lat,
                    x2: to.lon,
                    y2: to.lat,
                    color: rgb(TRACK_RGB),
                });
            }
            if let Some(start) = model.start() {
                ctx.draw(&Points {
                    coords: &[canvas_point(start)],
                    color: rgb(START_RGB),
                });
            }
            if let Some(end) = model.end() {
                ctx.draw(&Points {
                    coords: &[canvas_point(end)],
                    color: rgb(END_RGB),
                });
            }
            if let Some(frame) = model.frame.as_ref() {
                ctx.layer();
                for (from, to) in segments(frame.trail) {
                    ctx.draw(&Line {
                        x1: from.lon,
                        y1: from.lat,
                        x2: to.lon,
                        y2: to.lat,
                        color: rgb(TRAIL_RGB),
                    });
                }
                ctx.draw(&Points {
                    coords: &[canvas_point(frame.marker)],
                    color: phase_color(frame.phase),
                });
            }
        });
    f.render_widget(canvas, area);
}
