use ratatui::{
    layout::{Alignment, Rect},
    prelude::{Backend, Frame},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::playback::PlaybackStatus;
use crate::ui::model::UiRenderData;

use super::theme::{
    MIN_CANVAS_SIDE, PROGRESS_RGB, muted_style, panel_border_style, panel_text_style, rgb,
    title_style,
};

const HELP_TEXT: &str = "space play/pause  r reset  \u{2190}/\u{2192} seek  0-9 jump  n/p subject  ,/. start  </> end  a all dates  +/- speed  [/] trail  b base map  g map  i image  q quit";

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border_style())
        .title(Span::styled(title, title_style()))
}

const fn status_label(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Idle => "Idle",
        PlaybackStatus::Playing => "Playing",
        PlaybackStatus::Paused => "Paused",
    }
}

pub(super) fn render_title<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData<'_>, area: Rect) {
    let heading = if data.subject_count > 0 {
        format!(
            " movetrack | subject {}/{} ",
            data.subject_index.saturating_add(1),
            data.subject_count
        )
    } else {
        " movetrack ".to_owned()
    };
    let lines: Vec<Line<'_>> = data
        .model
        .title
        .iter()
        .map(|line| Line::from(Span::styled(line.as_str(), panel_text_style())))
        .collect();
    let title = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(panel(heading));
    f.render_widget(title, area);
}

pub(super) fn render_stats<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = if data.stats_lines.is_empty() {
        vec![Line::from(Span::styled("No data", muted_style()))]
    } else {
        data.stats_lines
            .iter()
            .map(|line| Line::from(Span::styled(line.as_str(), panel_text_style())))
            .collect()
    };
    let stats = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(" Statistics ".to_owned()));
    f.render_widget(stats, area);
}

pub(super) fn render_slider<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData<'_>, area: Rect) {
    let label = match data.model.frame.as_ref() {
        Some(frame) => format!("{}/{} ({}%)", frame.cursor, frame.len, frame.progress_percent),
        None => format!("{} points", data.model.full_track.len()),
    };
    let block = panel(format!(" {} ", status_label(data.playback)));
    let inner = block.inner(area);
    if inner.width < MIN_CANVAS_SIDE || inner.height == 0 {
        f.render_widget(block, area);
        return;
    }
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(panel_text_style().fg(rgb(PROGRESS_RGB)))
        .percent(u16::from(data.model.slider_percent.min(100)))
        .label(label);
    f.render_widget(gauge, area);
}

pub(super) fn render_status<B: Backend>(f: &mut Frame<'_, B>, data: &UiRenderData<'_>, area: Rect) {
    let range = data.bounds.map_or_else(
        || "all dates".to_owned(),
        |bounds| format!("{} to {}", bounds.start(), bounds.end()),
    );
    let text = format!(
        " {} | {} pts/s | trail {} | {} | {} | times in {}",
        data.status,
        data.speed,
        data.trail_length,
        data.base_map.label(),
        range,
        data.zone_label
    );
    f.render_widget(Paragraph::new(Span::styled(text, panel_text_style())), area);
}

pub(super) fn render_help<B: Backend>(f: &mut Frame<'_, B>, area: Rect) {
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {HELP_TEXT}"), muted_style())),
        area,
    );
}
