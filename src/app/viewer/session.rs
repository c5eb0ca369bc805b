use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use crossterm::event::KeyCode;
use tracing::{error, info};

use crate::args::ViewArgs;
use crate::error::{AppError, AppResult, TrackError, ValidationError};
use crate::geo::ReferenceZone;
use crate::playback::{MAX_TRAIL_LENGTH, Playback, PlaybackStatus, TickOutcome, build_render_model};
use crate::render::{MapOptions, export_image, write_map_document};
use crate::track::{DateBounds, GpsDataset, TrackStats, TrackView};
use crate::ui::UiRenderData;

const SEEK_STEP_PERCENT: i16 = 5;
const TRAIL_STEP: usize = 10;

/// A user intent, independent of the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewerAction {
    TogglePlay,
    Reset,
    SeekBack,
    SeekForward,
    SeekTo(u8),
    NextSubject,
    PreviousSubject,
    StartEarlier,
    StartLater,
    EndEarlier,
    EndLater,
    FullRange,
    SpeedUp,
    SlowDown,
    LongerTrail,
    ShorterTrail,
    CycleBaseMap,
    WriteMap,
    ExportImage,
    Quit,
}

/// Viewer settings resolved from the command line and config file.
#[derive(Debug, Clone)]
pub(crate) struct ViewerOptions {
    pub(crate) subject: Option<String>,
    pub(crate) start: Option<NaiveDate>,
    pub(crate) end: Option<NaiveDate>,
    pub(crate) trail_length: usize,
    pub(crate) speed: u32,
    pub(crate) map: MapOptions,
    pub(crate) zone: ReferenceZone,
    pub(crate) output_dir: PathBuf,
    pub(crate) map_out: Option<PathBuf>,
    pub(crate) image_out: Option<PathBuf>,
}

impl ViewerOptions {
    pub(crate) fn from_args(args: &ViewArgs) -> AppResult<Self> {
        let offset = ReferenceZone::parse_offset(&args.utc_offset)?;
        Ok(Self {
            subject: args.subject.clone(),
            start: args.start.as_deref().map(DateBounds::parse_date).transpose()?,
            end: args.end.as_deref().map(DateBounds::parse_date).transpose()?,
            trail_length: args.trail_length.min(MAX_TRAIL_LENGTH),
            speed: args.speed,
            map: MapOptions {
                base_map: args.base_map,
                show_track: !args.no_track,
                show_markers: !args.no_markers,
                heatmap: args.heatmap,
            },
            zone: ReferenceZone::new(offset, args.zone_label.clone()),
            output_dir: args.data_dir.clone(),
            map_out: args.map_out.clone(),
            image_out: args.image_out.clone(),
        })
    }
}

/// File-name friendly form of a subject identifier.
pub(crate) fn file_stem(subject: &str) -> String {
    subject
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Everything the interactive viewer tracks between key presses.
pub(crate) struct ViewerSession {
    dataset: GpsDataset,
    options: ViewerOptions,
    subject_index: usize,
    view: TrackView,
    stats: Option<TrackStats>,
    playback: Playback,
    trail_length: usize,
    deadline: Option<Instant>,
    status: String,
}

impl ViewerSession {
    pub(crate) fn new(dataset: GpsDataset, options: ViewerOptions) -> AppResult<Self> {
        let subject_index = match options.subject.as_deref() {
            Some(subject) => dataset
                .subjects()
                .iter()
                .position(|known| known == subject)
                .ok_or_else(|| {
                    AppError::validation(ValidationError::UnknownSubject {
                        subject: subject.to_owned(),
                    })
                })?,
            None if dataset.subjects().is_empty() => {
                return Err(AppError::track(TrackError::NoPoints {
                    path: dataset.source().to_path_buf(),
                }));
            }
            None => 0,
        };
        let mut session = Self {
            view: TrackView::from_points("", None, Vec::new()),
            stats: None,
            playback: Playback::new(0, options.speed),
            trail_length: options.trail_length,
            deadline: None,
            status: String::new(),
            subject_index,
            dataset,
            options,
        };
        let covering = session.subject_bounds(subject_index);
        let bounds = match covering {
            Some(covering) => Some(DateBounds::new(
                session.options.start.unwrap_or(covering.start()),
                session.options.end.unwrap_or(covering.end()),
            )?),
            None => None,
        };
        session.select(subject_index, bounds);
        Ok(session)
    }

    fn subject_bounds(&self, index: usize) -> Option<DateBounds> {
        let subject = self.dataset.subjects().get(index)?;
        DateBounds::covering(self.dataset.subject_points(subject))
    }

    /// Shows `index` within `bounds` and resets playback.
    fn select(&mut self, index: usize, bounds: Option<DateBounds>) {
        let Some(subject) = self.dataset.subjects().get(index).cloned() else {
            return;
        };
        self.subject_index = index;
        self.view = match bounds {
            Some(bounds) => TrackView::select(&self.dataset, &subject, bounds),
            None => TrackView::from_points(subject.as_str(), None, Vec::new()),
        };
        self.stats = TrackStats::compute(&self.view, self.dataset.directory());
        self.playback.load(self.view.len());
        self.deadline = None;
        self.status = match bounds {
            Some(bounds) => format!(
                "Loaded {} points for {} ({} to {})",
                self.view.len(),
                subject,
                bounds.start(),
                bounds.end()
            ),
            None => format!("No points for {subject}"),
        };
        info!("{}", self.status);
    }

    fn cycle_subject(&mut self, forward: bool) {
        let count = self.dataset.subjects().len();
        if count == 0 {
            return;
        }
        let index = if forward {
            self.subject_index.saturating_add(1) % count
        } else {
            self.subject_index
                .checked_sub(1)
                .unwrap_or(count.saturating_sub(1))
        };
        let bounds = self.subject_bounds(index);
        self.select(index, bounds);
    }

    pub(crate) const fn view(&self) -> &TrackView {
        &self.view
    }

    #[cfg(test)]
    pub(crate) const fn playback(&self) -> &Playback {
        &self.playback
    }

    pub(crate) const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> &str {
        &self.status
    }

    #[cfg(test)]
    pub(crate) const fn trail_length(&self) -> usize {
        self.trail_length
    }

    #[cfg(test)]
    pub(crate) const fn base_map(&self) -> crate::args::BaseMap {
        self.options.map.base_map
    }

    pub(crate) fn stats_lines(&self) -> Vec<String> {
        self.stats.as_ref().map(TrackStats::lines).unwrap_or_default()
    }

    /// Status followed by the statistics, or a no-data notice.
    pub(crate) fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![self.status.clone()];
        if self.stats.is_none() {
            lines.push(format!(
                "No data for {} in the selected range",
                self.view.subject()
            ));
        }
        lines.extend(self.stats_lines());
        lines
    }

    fn arm(&mut self, period: Option<Duration>, now: Instant) {
        self.deadline = period.and_then(|period| now.checked_add(period));
    }

    /// Applies one action. Returns `false` when the viewer should close.
    pub(crate) fn apply(&mut self, action: ViewerAction, now: Instant) -> bool {
        match action {
            ViewerAction::Quit => return false,
            ViewerAction::TogglePlay => {
                let period = self.playback.toggle();
                self.arm(period, now);
                self.status = match self.playback.status() {
                    PlaybackStatus::Playing => "Playing".to_owned(),
                    PlaybackStatus::Paused => "Paused".to_owned(),
                    PlaybackStatus::Idle => "Nothing to play".to_owned(),
                };
            }
            ViewerAction::Reset => {
                self.playback.reset();
                self.deadline = None;
                self.status = "Reset".to_owned();
            }
            ViewerAction::SeekBack => {
                let target = self.playback.seek_relative(-SEEK_STEP_PERCENT);
                self.after_seek(target);
            }
            ViewerAction::SeekForward => {
                let target = self.playback.seek_relative(SEEK_STEP_PERCENT);
                self.after_seek(target);
            }
            ViewerAction::SeekTo(percent) => {
                let target = self.playback.seek(percent);
                self.after_seek(target);
            }
            ViewerAction::NextSubject => self.cycle_subject(true),
            ViewerAction::PreviousSubject => self.cycle_subject(false),
            ViewerAction::StartEarlier => self.shift_bounds(Some(false), None),
            ViewerAction::StartLater => self.shift_bounds(Some(true), None),
            ViewerAction::EndEarlier => self.shift_bounds(None, Some(false)),
            ViewerAction::EndLater => self.shift_bounds(None, Some(true)),
            ViewerAction::FullRange => {
                let bounds = self.subject_bounds(self.subject_index);
                self.select(self.subject_index, bounds);
            }
            ViewerAction::SpeedUp => {
                self.change_speed(self.playback.speed().saturating_mul(2), now);
            }
            ViewerAction::SlowDown => self.change_speed(self.playback.speed() / 2, now),
            ViewerAction::LongerTrail => {
                self.trail_length = self
                    .trail_length
                    .saturating_add(TRAIL_STEP)
                    .min(MAX_TRAIL_LENGTH);
                self.status = format!("Trail length {}", self.trail_length);
            }
            ViewerAction::ShorterTrail => {
                self.trail_length = self.trail_length.saturating_sub(TRAIL_STEP);
                self.status = format!("Trail length {}", self.trail_length);
            }
            ViewerAction::CycleBaseMap => {
                self.options.map.base_map = self.options.map.base_map.next();
                self.status = format!("Base map {}", self.options.map.base_map.label());
            }
            ViewerAction::WriteMap => {
                self.status = match self.write_map() {
                    Ok(path) => format!("Map written to {}", path.display()),
                    Err(err) => {
                        error!("Map generation failed: {}", err);
                        format!("Map failed: {err}")
                    }
                };
            }
            ViewerAction::ExportImage => {
                self.status = match self.export_image() {
                    Ok(path) => format!("Image exported to {}", path.display()),
                    Err(err) => {
                        error!("Image export failed: {}", err);
                        format!("Image export failed: {err}")
                    }
                };
            }
        }
        true
    }

    /// Moves the start and/or end date by one day (`true` = later) within the
    /// subject's covering range, then reloads the view.
    fn shift_bounds(&mut self, start: Option<bool>, end: Option<bool>) {
        let (Some(current), Some(covering)) =
            (self.view.bounds(), self.subject_bounds(self.subject_index))
        else {
            self.status = "No dates to filter".to_owned();
            return;
        };
        let clamp = |date: NaiveDate| date.clamp(covering.start(), covering.end());
        let new_start = start.map_or(current.start(), |later| {
            clamp(shift_day(current.start(), later))
        });
        let new_end = end.map_or(current.end(), |later| clamp(shift_day(current.end(), later)));
        match DateBounds::new(new_start, new_end) {
            Ok(bounds) if bounds == current => {
                self.status = format!(
                    "Date range stays {} to {}",
                    current.start(),
                    current.end()
                );
            }
            Ok(bounds) => self.select(self.subject_index, Some(bounds)),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn after_seek(&mut self, target: Option<usize>) {
        self.deadline = None;
        self.status = match target {
            Some(cursor) => format!("Paused at point {cursor}/{}", self.view.len()),
            None => "Nothing to seek".to_owned(),
        };
    }

    fn change_speed(&mut self, speed: u32, now: Instant) {
        if let Some(period) = self.playback.set_speed(speed) {
            self.arm(Some(period), now);
        }
        self.status = format!("Speed {} points/s", self.playback.speed());
    }

    /// Advances playback when its pending tick is due. Returns `true` when
    /// the frame changed.
    pub(crate) fn tick_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {}
            Some(_) | None => return false,
        }
        match self.playback.tick() {
            TickOutcome::Advanced(_) => {
                let period = self.playback.tick_period();
                self.arm(Some(period), now);
                true
            }
            TickOutcome::Finished => {
                self.deadline = None;
                self.status = "Playback finished".to_owned();
                true
            }
            TickOutcome::Ignored => {
                self.deadline = None;
                false
            }
        }
    }

    /// Keeps the session alive after a failed frame draw; the message shows
    /// once a later draw succeeds.
    pub(crate) fn report_render_error(&mut self, err: &AppError) {
        self.status = format!("Render failed: {err}");
    }

    pub(crate) fn map_path(&self) -> PathBuf {
        self.options.map_out.clone().unwrap_or_else(|| {
            self.options
                .output_dir
                .join(format!("{}_track.html", file_stem(self.view.subject())))
        })
    }

    pub(crate) fn image_path(&self) -> PathBuf {
        self.options.image_out.clone().unwrap_or_else(|| {
            self.options
                .output_dir
                .join(format!("{}_track.png", file_stem(self.view.subject())))
        })
    }

    pub(crate) fn write_map(&self) -> AppResult<PathBuf> {
        let path = self.map_path();
        write_map_document(&self.view, &self.options.map, &path)?;
        Ok(path)
    }

    pub(crate) fn export_image(&self) -> AppResult<PathBuf> {
        let path = self.image_path();
        let model = build_render_model(
            &self.view,
            self.playback.cursor(),
            self.trail_length,
            &self.options.zone,
        );
        export_image(&model, &path)?;
        info!("Image exported to {}", path.display());
        Ok(path)
    }

    pub(crate) fn ui_data(&self) -> UiRenderData<'_> {
        UiRenderData {
            model: build_render_model(
                &self.view,
                self.playback.cursor(),
                self.trail_length,
                &self.options.zone,
            ),
            stats_lines: self.stats_lines(),
            status: self.status.clone(),
            playback: self.playback.status(),
            subject_index: self.subject_index,
            subject_count: self.dataset.subjects().len(),
            bounds: self.view.bounds(),
            speed: self.playback.speed(),
            trail_length: self.trail_length,
            base_map: self.options.map.base_map,
            zone_label: self.options.zone.label().to_owned(),
        }
    }
}

fn shift_day(date: NaiveDate, later: bool) -> NaiveDate {
    let shifted = if later {
        date.checked_add_days(Days::new(1))
    } else {
        date.checked_sub_days(Days::new(1))
    };
    shifted.unwrap_or(date)
}

/// Key bindings of the interactive viewer.
pub(crate) fn action_for_key(code: KeyCode) -> Option<ViewerAction> {
    if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
        return Some(ViewerAction::Quit);
    }
    if matches!(code, KeyCode::Left | KeyCode::Char('h')) {
        return Some(ViewerAction::SeekBack);
    }
    if matches!(code, KeyCode::Right | KeyCode::Char('l')) {
        return Some(ViewerAction::SeekForward);
    }
    let KeyCode::Char(ch) = code else {
        return None;
    };
    if let Some(tenth) = ch.to_digit(10).and_then(|digit| u8::try_from(digit).ok()) {
        return Some(ViewerAction::SeekTo(tenth.saturating_mul(10)));
    }
    let action = match ch {
        ' ' => ViewerAction::TogglePlay,
        'r' => ViewerAction::Reset,
        'n' => ViewerAction::NextSubject,
        'p' => ViewerAction::PreviousSubject,
        ',' => ViewerAction::StartEarlier,
        '.' => ViewerAction::StartLater,
        '<' => ViewerAction::EndEarlier,
        '>' => ViewerAction::EndLater,
        'a' => ViewerAction::FullRange,
        '+' | '=' => ViewerAction::SpeedUp,
        '-' => ViewerAction::SlowDown,
        ']' => ViewerAction::LongerTrail,
        '[' => ViewerAction::ShorterTrail,
        'b' => ViewerAction::CycleBaseMap,
        'g' => ViewerAction::WriteMap,
        'i' => ViewerAction::ExportImage,
        _ => return None,
    };
    Some(action)
}
