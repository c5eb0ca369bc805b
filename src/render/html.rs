use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::args::BaseMap;
use crate::error::RenderError;
use crate::track::{TrackPoint, TrackView};

use super::ensure_parent_dir;

/// Point markers beyond this count are thinned by a constant stride.
pub const MAX_MARKERS: usize = 500;
pub const ZOOM_START: u8 = 13;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>"#;

const PAGE_BODY: &str = r#"</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const data = "#;

const PAGE_SCRIPT: &str = r#";
const map = L.map("map").setView(data.center, data.zoom);
L.tileLayer(data.tiles.url, { attribution: data.tiles.attribution, maxZoom: 19 }).addTo(map);
if (data.track) {
  L.polyline(data.track, { color: "blue", weight: 2, opacity: 0.7 }).bindPopup(data.track_popup).addTo(map);
}
for (const marker of data.markers) {
  L.circleMarker([marker.lat, marker.lon], {
    radius: 3, color: "red", fill: true, fillColor: "red", fillOpacity: 0.6
  }).bindPopup(marker.popup, { maxWidth: 200 }).addTo(map);
}
if (data.heat && L.heatLayer) {
  L.heatLayer(data.heat).addTo(map);
}
for (const end of [data.start, data.end]) {
  L.circleMarker([end.lat, end.lon], {
    radius: 8, color: end.color, fill: true, fillColor: end.color, fillOpacity: 0.9
  }).bindPopup(end.popup).addTo(map);
}
</script>
</body>
</html>
"#;

/// Layers included in the map document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    pub base_map: BaseMap,
    pub show_track: bool,
    pub show_markers: bool,
    pub heatmap: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            base_map: BaseMap::OpenStreetMap,
            show_track: true,
            show_markers: true,
            heatmap: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct Tiles {
    url: &'static str,
    attribution: &'static str,
}

#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    popup: String,
}

#[derive(Debug, Serialize)]
struct Endpoint {
    lat: f64,
    lon: f64,
    popup: String,
    color: &'static str,
}

#[derive(Debug, Serialize)]
struct MapData {
    center: [f64; 2],
    zoom: u8,
    tiles: Tiles,
    track: Option<Vec<[f64; 2]>>,
    track_popup: String,
    markers: Vec<Marker>,
    heat: Option<Vec<[f64; 2]>>,
    start: Endpoint,
    end: Endpoint,
}

const fn tiles(base_map: BaseMap) -> Tiles {
    match base_map {
        BaseMap::OpenStreetMap => Tiles {
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            attribution: "&copy; OpenStreetMap contributors",
        },
        BaseMap::Satellite => Tiles {
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            attribution: "Esri",
        },
        BaseMap::Terrain => Tiles {
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Terrain_Base/MapServer/tile/{z}/{y}/{x}",
            attribution: "Esri",
        },
    }
}

/// Stride used to thin point markers to roughly [`MAX_MARKERS`].
#[must_use]
pub fn marker_stride(len: usize) -> usize {
    if len > MAX_MARKERS {
        len / MAX_MARKERS
    } else {
        1
    }
}

/// Escapes text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn point_popup(point: &TrackPoint) -> String {
    let speed = point
        .ground_speed
        .map(|speed| format!("<b>Speed:</b> {speed:.2} m/s<br>"))
        .unwrap_or_default();
    format!(
        "<b>Time:</b> {}<br><b>Lat:</b> {:.6}<br><b>Lon:</b> {:.6}<br>{speed}",
        point.timestamp.format(TIME_FORMAT),
        point.position.lat,
        point.position.lon
    )
}

fn endpoint(label: &str, point: &TrackPoint, color: &'static str) -> Endpoint {
    Endpoint {
        lat: point.position.lat,
        lon: point.position.lon,
        popup: format!("{label}: {}", point.timestamp.format(TIME_FORMAT)),
        color,
    }
}

fn lat_lon_pairs(view: &TrackView) -> Vec<[f64; 2]> {
    view.positions()
        .iter()
        .map(|position| [position.lat, position.lon])
        .collect()
}

/// Renders a self-contained Leaflet page for the view.
///
/// # Errors
///
/// Returns [`RenderError::EmptyView`] when the view has no points.
pub fn map_document(view: &TrackView, options: &MapOptions) -> Result<String, RenderError> {
    let (Some(first), Some(last), Some(center)) = (view.first(), view.last(), view.center())
    else {
        return Err(RenderError::EmptyView);
    };
    let markers = if options.show_markers {
        view.points()
            .iter()
            .step_by(marker_stride(view.len()))
            .map(|point| Marker {
                lat: point.position.lat,
                lon: point.position.lon,
                popup: point_popup(point),
            })
            .collect()
    } else {
        Vec::new()
    };
    let data = MapData {
        center: [center.lat, center.lon],
        zoom: ZOOM_START,
        tiles: tiles(options.base_map),
        track: options.show_track.then(|| lat_lon_pairs(view)),
        track_popup: format!("Track: {}", escape_html(view.subject())),
        markers,
        heat: options.heatmap.then(|| lat_lon_pairs(view)),
        start: endpoint("Start", first, "green"),
        end: endpoint("End", last, "red"),
    };
    let json = serde_json::to_string(&data)
        .map_err(|source| RenderError::EncodeMapData { source })?
        .replace("</", "<\\/");
    let title = escape_html(&format!("{} - GPS Track", view.subject()));
    let mut html = String::with_capacity(
        PAGE_HEAD.len() + title.len() + PAGE_BODY.len() + json.len() + PAGE_SCRIPT.len(),
    );
    for piece in [PAGE_HEAD, title.as_str(), PAGE_BODY, json.as_str(), PAGE_SCRIPT] {
        html.push_str(piece);
    }
    Ok(html)
}

/// Writes the map document for the view to `path`.
///
/// # Errors
///
/// Returns an error when the view is empty or the file cannot be written.
pub fn write_map_document(
    view: &TrackView,
    options: &MapOptions,
    path: &Path,
) -> Result<(), RenderError> {
    let html = map_document(view, options)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, html).map_err(|source| RenderError::WriteDocument {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Map generated with {} points: {}",
        view.len(),
        path.display()
    );
    Ok(())
}
