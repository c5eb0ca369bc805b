use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::{Backend, Frame},
    widgets::Block,
};

use crate::ui::model::UiRenderData;

use super::map::render_map;
use super::panels::{render_help, render_slider, render_stats, render_status, render_title};
use super::theme::{
    MAP_WIDTH_PERCENT, SLIDER_HEIGHT, STATS_WIDTH_PERCENT, TITLE_HEIGHT, app_background_style,
};

/// Lays out title, map and statistics, slider, status and key help.
pub fn draw_frame<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData<'_>) {
    let size = f.size();
    f.render_widget(Block::default().style(app_background_style()), size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(SLIDER_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);
    let (title_chunk, body_chunk, slider_chunk, status_chunk, help_chunk) = match rows.as_ref() {
        [a, b, c, d, e] => (a, b, c, d, e),
        _ => return,
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(MAP_WIDTH_PERCENT),
            Constraint::Percentage(STATS_WIDTH_PERCENT),
        ])
        .split(*body_chunk);
    let (map_chunk, stats_chunk) = match columns.as_ref() {
        [a, b] => (a, b),
        _ => return,
    };

    render_title(f, data, *title_chunk);
    render_map(f, &data.model, *map_chunk);
    render_stats(f, data, *stats_chunk);
    render_slider(f, data, *slider_chunk);
    render_status(f, data, *status_chunk);
    render_help(f, *help_chunk);
}
