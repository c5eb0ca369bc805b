use chrono::{DateTime, TimeDelta};
use serde_json::Value;
use tempfile::tempdir;

use super::{
    MapOptions, PlotBounds, escape_html, export_image, map_document, marker_stride, mercator_y,
    write_map_document,
};
use crate::args::BaseMap;
use crate::error::{AppError, AppResult, RenderError};
use crate::geo::{LatLon, ReferenceZone};
use crate::playback::build_render_model;
use crate::track::{TrackPoint, TrackView};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn view_of(subject: &str, len: usize) -> AppResult<TrackView> {
    let start = DateTime::parse_from_rfc3339("2024-06-01T06:00:00+00:00")
        .map_err(|err| AppError::validation(format!("bad fixture: {err}")))?;
    let mut points = Vec::with_capacity(len);
    let mut lat = -1.3;
    let mut lon = 36.8;
    let mut timestamp = start;
    for index in 0..len {
        points.push(TrackPoint {
            subject: subject.to_owned(),
            timestamp,
            position: LatLon::new(lat, lon),
            ground_speed: (index % 2 == 0).then_some(1.5),
            extra: Vec::new(),
        });
        lat += 0.001;
        lon += 0.002;
        timestamp += TimeDelta::minutes(10);
    }
    Ok(TrackView::from_points(subject, None, points))
}

fn embedded_data(html: &str) -> AppResult<Value> {
    let start = html
        .find("const data = ")
        .ok_or_else(|| AppError::validation("map data not found"))?;
    let rest = html
        .get(start + "const data = ".len()..)
        .ok_or_else(|| AppError::validation("map data truncated"))?;
    let end = rest
        .find(";\n")
        .ok_or_else(|| AppError::validation("map data not terminated"))?;
    let json = rest.get(..end).unwrap_or_default().replace("<\\/", "</");
    Ok(serde_json::from_str(&json)?)
}

#[test]
fn mercator_is_symmetric_and_clamped() -> AppResult<()> {
    if mercator_y(0.0).abs() > 1e-12 {
        return Err(AppError::validation("equator should project to 0"));
    }
    if (mercator_y(45.0) + mercator_y(-45.0)).abs() > 1e-9 {
        return Err(AppError::validation("projection should be odd"));
    }
    if mercator_y(45.0) <= 45.0 {
        return Err(AppError::validation("mercator stretches high latitudes"));
    }
    if (mercator_y(90.0) - 180.0).abs() > 1e-6 || (mercator_y(-90.0) + 180.0).abs() > 1e-6 {
        return Err(AppError::validation("poles should be clamped to a finite value"));
    }
    Ok(())
}

#[test]
fn plot_bounds_pad_and_widen_single_points() -> AppResult<()> {
    let bounds = PlotBounds::fit([(0.0, 0.0), (10.0, 20.0)], 0.1)
        .ok_or_else(|| AppError::validation("expected bounds"))?;
    if (bounds.min_x + 1.0).abs() > 1e-9 || (bounds.max_y - 22.0).abs() > 1e-9 {
        return Err(AppError::validation(format!("unexpected bounds {bounds:?}")));
    }
    let single = PlotBounds::fit([(36.8, -1.3)], 0.1)
        .ok_or_else(|| AppError::validation("expected bounds"))?;
    if single.max_x <= single.min_x || !single.contains((36.8, -1.3)) {
        return Err(AppError::validation("a single point needs a non-empty viewport"));
    }
    if PlotBounds::fit(std::iter::empty(), 0.1).is_some() {
        return Err(AppError::validation("no points, no bounds"));
    }
    Ok(())
}

#[test]
fn html_escaping() -> AppResult<()> {
    let escaped = escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#);
    if escaped != "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;" {
        return Err(AppError::validation(format!("unexpected escape {escaped}")));
    }
    Ok(())
}

#[test]
fn markers_are_thinned_above_the_cap() -> AppResult<()> {
    let cases = [(0, 1), (500, 1), (999, 1), (1000, 2), (1600, 3)];
    for (len, expected) in cases {
        if marker_stride(len) != expected {
            return Err(AppError::validation(format!("stride for {len}")));
        }
    }
    let view = view_of("Zebra-1", 1000)?;
    let data = embedded_data(&map_document(&view, &MapOptions::default())?)?;
    let markers = data["markers"].as_array().map_or(0, Vec::len);
    if markers != 500 {
        return Err(AppError::validation(format!("expected 500 markers, got {markers}")));
    }
    Ok(())
}

#[test]
fn map_document_layers_follow_options() -> AppResult<()> {
    let view = view_of("Zebra-1", 4)?;
    let options = MapOptions {
        base_map: BaseMap::Satellite,
        show_track: false,
        show_markers: false,
        heatmap: true,
    };
    let html = map_document(&view, &options)?;
    let data = embedded_data(&html)?;
    if !data["track"].is_null() || data["markers"].as_array().is_none_or(|m| !m.is_empty()) {
        return Err(AppError::validation("track and markers should be off"));
    }
    if data["heat"].as_array().map(Vec::len) != Some(4) {
        return Err(AppError::validation("heat layer should carry every point"));
    }
    if !data["tiles"]["url"]
        .as_str()
        .is_some_and(|url| url.contains("World_Imagery"))
    {
        return Err(AppError::validation("satellite tiles expected"));
    }
    if data["zoom"] != 13 || data["start"]["color"] != "green" || data["end"]["color"] != "red" {
        return Err(AppError::validation("unexpected zoom or endpoint colors"));
    }
    let popup = data["start"]["popup"].as_str().unwrap_or_default();
    if popup != "Start: 2024-06-01 06:00:00+00:00" {
        return Err(AppError::validation(format!("unexpected start popup {popup}")));
    }
    Ok(())
}

#[test]
fn marker_popups_include_speed_when_present() -> AppResult<()> {
    let view = view_of("Zebra-1", 2)?;
    let data = embedded_data(&map_document(&view, &MapOptions::default())?)?;
    let first = data["markers"][0]["popup"].as_str().unwrap_or_default();
    let second = data["markers"][1]["popup"].as_str().unwrap_or_default();
    if !first.contains("<b>Speed:</b> 1.50 m/s") || second.contains("Speed") {
        return Err(AppError::validation(format!("unexpected popups {first} / {second}")));
    }
    if !first.contains("<b>Lat:</b> -1.300000") {
        return Err(AppError::validation(format!("unexpected latitude in {first}")));
    }
    Ok(())
}

#[test]
fn subject_names_cannot_break_out_of_the_page() -> AppResult<()> {
    let view = view_of("</script><b>x", 2)?;
    let html = map_document(&view, &MapOptions::default())?;
    if html.matches("</script>").count() != 3 {
        return Err(AppError::validation("subject text closed a script element"));
    }
    if !html.contains("<title>&lt;/script&gt;&lt;b&gt;x - GPS Track</title>") {
        return Err(AppError::validation("title should be escaped"));
    }
    let data = embedded_data(&html)?;
    if data["track_popup"] != "Track: &lt;/script&gt;&lt;b&gt;x" {
        return Err(AppError::validation("track popup should be escaped"));
    }
    Ok(())
}

#[test]
fn placeholder_like_subjects_stay_in_their_own_slot() -> AppResult<()> {
    let view = view_of("__DATA__ __TITLE__", 2)?;
    let html = map_document(&view, &MapOptions::default())?;
    if !html.contains("<title>__DATA__ __TITLE__ - GPS Track</title>") {
        return Err(AppError::validation("title should hold the subject verbatim"));
    }
    if html.matches("const data = ").count() != 1 || html.matches("\"center\"").count() != 1 {
        return Err(AppError::validation("map data should be embedded exactly once"));
    }
    let data = embedded_data(&html)?;
    if data["track_popup"] != "Track: __DATA__ __TITLE__" {
        return Err(AppError::validation(format!(
            "unexpected popup {}",
            data["track_popup"]
        )));
    }
    Ok(())
}

#[test]
fn empty_views_are_rejected() -> AppResult<()> {
    let view = TrackView::from_points("nobody", None, Vec::new());
    match map_document(&view, &MapOptions::default()) {
        Err(RenderError::EmptyView) => {}
        other => return Err(AppError::validation(format!("unexpected {other:?}"))),
    }
    let dir = tempdir()?;
    let model = build_render_model(&view, 0, 10, &ReferenceZone::default());
    if export_image(&model, &dir.path().join("empty.png")).is_ok() {
        return Err(AppError::validation("empty image export should fail"));
    }
    Ok(())
}

#[test]
fn map_document_is_written_to_nested_paths() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("maps").join("zebra.html");
    let view = view_of("Zebra-1", 3)?;
    write_map_document(&view, &MapOptions::default(), &path)?;
    let html = std::fs::read_to_string(&path)?;
    if !html.starts_with("<!DOCTYPE html>") || !html.contains("L.polyline") {
        return Err(AppError::validation("unexpected document"));
    }
    Ok(())
}

#[test]
fn image_export_writes_png() -> AppResult<()> {
    let dir = tempdir()?;
    let view = view_of("Zebra-1", 12)?;
    let zone = ReferenceZone::default();
    for (cursor, name) in [(0, "full.png"), (6, "frame.png")] {
        let path = dir.path().join(name);
        let model = build_render_model(&view, cursor, 3, &zone);
        export_image(&model, &path)?;
        let bytes = std::fs::read(&path)?;
        if bytes.get(..8) != Some(&PNG_MAGIC[..]) {
            return Err(AppError::validation(format!("{name} is not a PNG")));
        }
    }
    Ok(())
}
