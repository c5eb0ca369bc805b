use chrono::{DateTime, FixedOffset};

use crate::geo::{DayPhase, LatLon, ReferenceZone, is_daytime, reference_sun_times};
use crate::track::TrackView;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CLOCK_FORMAT: &str = "%H:%M";

/// Sunrise and sunset of the marker's local date, in the reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunInfo {
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

/// The animated part of a frame: where the subject is at the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInfo<'view> {
    pub cursor: usize,
    pub len: usize,
    pub marker: LatLon,
    pub phase: DayPhase,
    pub local_time: DateTime<FixedOffset>,
    pub sun: Option<SunInfo>,
    pub distance_km: f64,
    pub progress_percent: u8,
    /// The last `trail_length` revealed positions, oldest first.
    pub trail: &'view [LatLon],
}

/// Everything a presentation layer needs to draw one playback frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel<'view> {
    pub subject: &'view str,
    pub full_track: &'view [LatLon],
    pub total_km: f64,
    /// `None` at cursor 0: the full, non-incremental track view.
    pub frame: Option<FrameInfo<'view>>,
    pub title: Vec<String>,
    pub slider_percent: u8,
}

impl RenderModel<'_> {
    #[must_use]
    pub fn start(&self) -> Option<LatLon> {
        self.full_track.first().copied()
    }

    #[must_use]
    pub fn end(&self) -> Option<LatLon> {
        self.full_track.last().copied()
    }
}

/// Builds the frame for `cursor` revealed points of `view`.
///
/// The cursor is clipped to the view length.
#[must_use]
pub fn build_render_model<'view>(
    view: &'view TrackView,
    cursor: usize,
    trail_length: usize,
    zone: &ReferenceZone,
) -> RenderModel<'view> {
    let len = view.len();
    let cursor = cursor.min(len);
    let total_km = view.total_km();
    let frame = cursor
        .checked_sub(1)
        .and_then(|index| view.get(index))
        .map(|point| {
            let positions = view.positions();
            let trail_start = cursor.saturating_sub(trail_length);
            let trail = positions.get(trail_start..cursor).unwrap_or_default();
            let sun = reference_sun_times(point.position, &point.timestamp, zone)
                .map(|(sunrise, sunset)| SunInfo { sunrise, sunset });
            FrameInfo {
                cursor,
                len,
                marker: point.position,
                phase: DayPhase::from(is_daytime(point.position, &point.timestamp, zone)),
                local_time: zone.localize(&point.timestamp),
                sun,
                distance_km: view.distance_revealed_km(cursor),
                progress_percent: percent_of(cursor, len),
                trail,
            }
        });

    let title = match &frame {
        Some(info) => animated_title(view.subject(), info, total_km, zone),
        None => vec![
            format!("{} - GPS Track", view.subject()),
            format!("{len} points | Total Distance: {total_km:.2} km"),
        ],
    };

    RenderModel {
        subject: view.subject(),
        full_track: view.positions(),
        total_km,
        slider_percent: percent_of(cursor, len),
        frame,
        title,
    }
}

fn animated_title(
    subject: &str,
    info: &FrameInfo<'_>,
    total_km: f64,
    zone: &ReferenceZone,
) -> Vec<String> {
    let sun = info
        .sun
        .map(|sun| {
            format!(
                " | Sunrise: {} Sunset: {} {}",
                sun.sunrise.format(CLOCK_FORMAT),
                sun.sunset.format(CLOCK_FORMAT),
                zone.label()
            )
        })
        .unwrap_or_default();
    vec![
        format!("{subject} - GPS Track"),
        format!(
            "{}/{} ({}%) | Distance: {:.2}/{:.2} km | {}",
            info.cursor,
            info.len,
            info.progress_percent,
            info.distance_km,
            total_km,
            info.phase.label()
        ),
        format!(
            "{} {}{sun}",
            info.local_time.format(TIME_FORMAT),
            zone.label()
        ),
    ]
}

fn percent_of(cursor: usize, len: usize) -> u8 {
    let percent = cursor
        .saturating_mul(100)
        .checked_div(len)
        .unwrap_or(0)
        .min(100);
    u8::try_from(percent).unwrap_or(100)
}
