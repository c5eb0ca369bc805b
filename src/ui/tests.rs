use chrono::{DateTime, TimeDelta};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::model::UiRenderData;
use super::render::{Ui, UiActions};
use crate::args::BaseMap;
use crate::error::{AppError, AppResult};
use crate::geo::{LatLon, ReferenceZone};
use crate::playback::{PlaybackStatus, build_render_model};
use crate::track::{SubjectDirectory, TrackPoint, TrackStats, TrackView};

fn sample_view() -> AppResult<TrackView> {
    let start = DateTime::parse_from_rfc3339("2024-06-01T06:00:00+00:00")
        .map_err(|err| AppError::validation(format!("bad fixture: {err}")))?;
    let points = [(-1.30, 36.80), (-1.31, 36.82), (-1.33, 36.85), (-1.36, 36.86)]
        .into_iter()
        .zip(0..)
        .map(|((lat, lon), step)| TrackPoint {
            subject: "Zebra-1".to_owned(),
            timestamp: start + TimeDelta::hours(step),
            position: LatLon::new(lat, lon),
            ground_speed: Some(2.0),
            extra: Vec::new(),
        })
        .collect();
    Ok(TrackView::from_points("Zebra-1", None, points))
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol.as_str())
        .collect()
}

fn render(view: &TrackView, cursor: usize, playback: PlaybackStatus) -> AppResult<String> {
    let zone = ReferenceZone::default();
    let stats_lines = TrackStats::compute(view, &SubjectDirectory::default())
        .map(|stats| stats.lines())
        .unwrap_or_default();
    let data = UiRenderData {
        model: build_render_model(view, cursor, 2, &zone),
        stats_lines,
        status: "Loaded 4 points".to_owned(),
        playback,
        subject_index: 0,
        subject_count: 2,
        bounds: None,
        speed: 100,
        trail_length: 2,
        base_map: BaseMap::Terrain,
        zone_label: zone.label().to_owned(),
    };
    let mut terminal = Terminal::new(TestBackend::new(140, 40))?;
    Ui::render(&mut terminal, &data)?;
    Ok(screen_text(&terminal))
}

#[test]
fn full_track_screen_shows_title_and_stats() -> AppResult<()> {
    let view = sample_view()?;
    let text = render(&view, 0, PlaybackStatus::Idle)?;
    for expected in [
        "Zebra-1 - GPS Track",
        "4 points | Total Distance:",
        "subject 1/2",
        "Animal: Zebra-1",
        "Loaded 4 points",
        "Terrain",
        "Idle",
    ] {
        if !text.contains(expected) {
            return Err(AppError::validation(format!("screen lacks {expected:?}")));
        }
    }
    Ok(())
}

#[test]
fn playback_screen_shows_progress() -> AppResult<()> {
    let view = sample_view()?;
    let text = render(&view, 2, PlaybackStatus::Playing)?;
    for expected in ["2/4 (50%)", "Playing", "Sunrise:"] {
        if !text.contains(expected) {
            return Err(AppError::validation(format!("screen lacks {expected:?}")));
        }
    }
    Ok(())
}

#[test]
fn empty_view_renders_without_a_track() -> AppResult<()> {
    let view = TrackView::from_points("nobody", None, Vec::new());
    let text = render(&view, 0, PlaybackStatus::Idle)?;
    if !text.contains("No data") {
        return Err(AppError::validation("empty statistics should say so"));
    }
    Ok(())
}

#[test]
fn tiny_terminals_do_not_panic() -> AppResult<()> {
    let view = sample_view()?;
    let zone = ReferenceZone::default();
    let data = UiRenderData {
        model: build_render_model(&view, 3, 50, &zone),
        stats_lines: Vec::new(),
        status: String::new(),
        playback: PlaybackStatus::Paused,
        subject_index: 0,
        subject_count: 1,
        bounds: None,
        speed: 10,
        trail_length: 50,
        base_map: BaseMap::OpenStreetMap,
        zone_label: "EAT".to_owned(),
    };
    for (width, height) in [(10, 4), (1, 1), (12, 14), (24, 11), (40, 12), (3, 30)] {
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        Ui::render(&mut terminal, &data)?;
    }
    Ok(())
}
