use ratatui::style::{Color, Modifier, Style};

use crate::geo::DayPhase;

pub(super) const TITLE_HEIGHT: u16 = 5;
pub(super) const SLIDER_HEIGHT: u16 = 3;
pub(super) const MAP_WIDTH_PERCENT: u16 = 70;
pub(super) const STATS_WIDTH_PERCENT: u16 = 30;
/// Viewport padding around the track, as a fraction of its extent.
pub(super) const MAP_PAD_FRACTION: f64 = 0.1;
/// Smaller canvas and gauge interiors are drawn as an empty frame.
pub(super) const MIN_CANVAS_SIDE: u16 = 2;

pub(super) const BACKGROUND_RGB: (u8, u8, u8) = (0x0a, 0x0a, 0x0a);
pub(super) const PANEL_BORDER_RGB: (u8, u8, u8) = (0xe5, 0xe7, 0xeb);
pub(super) const PANEL_TEXT_RGB: (u8, u8, u8) = (0xff, 0xff, 0xff);
pub(super) const PANEL_MUTED_RGB: (u8, u8, u8) = (0x9c, 0xa3, 0xaf);
pub(super) const COASTLINE_RGB: (u8, u8, u8) = (0x4b, 0x55, 0x63);
pub(super) const TRACK_RGB: (u8, u8, u8) = (0x38, 0xbd, 0xf8);
pub(super) const TRAIL_RGB: (u8, u8, u8) = (0xff, 0xa5, 0x00);
pub(super) const START_RGB: (u8, u8, u8) = (0x22, 0xc5, 0x5e);
pub(super) const END_RGB: (u8, u8, u8) = (0xef, 0x44, 0x44);
pub(super) const DAY_RGB: (u8, u8, u8) = (0xff, 0xd7, 0x00);
pub(super) const NIGHT_RGB: (u8, u8, u8) = (0x00, 0xff, 0xff);
pub(super) const PROGRESS_RGB: (u8, u8, u8) = (0x22, 0xd3, 0xee);

pub(super) const fn rgb(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub(super) const fn phase_color(phase: DayPhase) -> Color {
    match phase {
        DayPhase::Day => rgb(DAY_RGB),
        DayPhase::Night => rgb(NIGHT_RGB),
    }
}

pub(super) fn app_background_style() -> Style {
    Style::default().bg(rgb(BACKGROUND_RGB))
}

pub(super) fn panel_border_style() -> Style {
    Style::default().fg(rgb(PANEL_BORDER_RGB))
}

pub(super) fn panel_text_style() -> Style {
    Style::default().fg(rgb(PANEL_TEXT_RGB))
}

pub(super) fn muted_style() -> Style {
    Style::default().fg(rgb(PANEL_MUTED_RGB))
}

pub(super) fn title_style() -> Style {
    panel_text_style().add_modifier(Modifier::BOLD)
}
