use std::time::Duration;

/// Floor on the tick period so very high speeds cannot spin the loop.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(10);
/// Points revealed per second.
pub const DEFAULT_SPEED: u32 = 100;
pub const MIN_SPEED: u32 = 10;
pub const MAX_SPEED: u32 = 1000;
pub const DEFAULT_TRAIL_LENGTH: usize = 50;
pub const MAX_TRAIL_LENGTH: usize = 200;

const MS_PER_SEC: u64 = 1_000;
const PERCENT_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The cursor moved to the contained value.
    Advanced(usize),
    /// Ticked past the fully revealed view; playback is back to idle at 0.
    Finished,
    /// Not playing; nothing changed.
    Ignored,
}

/// Tick period for `speed` points per second, never below [`MIN_TICK_PERIOD`].
#[must_use]
pub fn tick_period(speed: u32) -> Duration {
    let millis = MS_PER_SEC.checked_div(u64::from(speed)).unwrap_or(MS_PER_SEC);
    Duration::from_millis(millis).max(MIN_TICK_PERIOD)
}

/// Cursor and status of one replay over a view of `len` points.
///
/// The cursor counts revealed points, so it ranges over `0..=len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    status: PlaybackStatus,
    cursor: usize,
    len: usize,
    speed: u32,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(0, DEFAULT_SPEED)
    }
}

impl Playback {
    #[must_use]
    pub fn new(len: usize, speed: u32) -> Self {
        Self {
            status: PlaybackStatus::Idle,
            cursor: 0,
            len,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
        }
    }

    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        self.status
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.status, PlaybackStatus::Playing)
    }

    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Changes the speed; returns the new tick period when playing so the
    /// caller can reschedule its pending tick.
    pub fn set_speed(&mut self, speed: u32) -> Option<Duration> {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.is_playing().then(|| tick_period(self.speed))
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        tick_period(self.speed)
    }

    /// Points the replay at a new view and returns to idle.
    pub fn load(&mut self, len: usize) {
        self.len = len;
        self.reset();
    }

    /// Starts or resumes playback. Returns the tick period, or `None` when
    /// the view is empty.
    pub fn start(&mut self) -> Option<Duration> {
        if self.len == 0 {
            return None;
        }
        self.status = PlaybackStatus::Playing;
        Some(self.tick_period())
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Play/pause toggle; returns the tick period when playback started.
    pub fn toggle(&mut self) -> Option<Duration> {
        if self.is_playing() {
            self.pause();
            None
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) {
        self.status = PlaybackStatus::Idle;
        self.cursor = 0;
    }

    /// Reveals one more point. The tick after the last point is revealed
    /// finishes playback.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Ignored;
        }
        if self.cursor >= self.len {
            self.reset();
            return TickOutcome::Finished;
        }
        self.cursor = self.cursor.saturating_add(1);
        TickOutcome::Advanced(self.cursor)
    }

    /// Jumps to `percent` of the view and pauses. Ignored on an empty view.
    ///
    /// The target index is `round(percent / 100 * (len - 1))`, kept within
    /// `1..=len - 1` for views of two or more points.
    pub fn seek(&mut self, percent: u8) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let target = scale_percent(u16::from(percent), self.max_index());
        Some(self.pause_at(target))
    }

    /// Moves by `delta_percent` of the view from the current cursor and
    /// pauses. A non-zero delta always moves at least one point.
    pub fn seek_relative(&mut self, delta_percent: i16) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let max_index = self.max_index();
        let step = scale_percent(delta_percent.unsigned_abs(), max_index)
            .max(usize::from(delta_percent != 0));
        let from = self.cursor.min(max_index);
        let target = if delta_percent < 0 {
            from.saturating_sub(step)
        } else {
            from.saturating_add(step)
        };
        Some(self.pause_at(target))
    }

    const fn max_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    fn pause_at(&mut self, target: usize) -> usize {
        let max_index = self.max_index();
        let mut target = target.min(max_index);
        if self.len > 1 {
            target = target.max(1);
        }
        self.cursor = target;
        self.status = PlaybackStatus::Paused;
        target
    }

    /// `floor(cursor / len * 100)`, 0 for an empty view.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let cursor = u64::try_from(self.cursor).unwrap_or(u64::MAX);
        let len = u64::try_from(self.len).unwrap_or(u64::MAX);
        let percent = cursor
            .saturating_mul(u64::from(PERCENT_MAX))
            .checked_div(len)
            .unwrap_or(0);
        u8::try_from(percent).unwrap_or(PERCENT_MAX)
    }
}

/// `round(percent / 100 * max_index)`, with `percent` capped at 100.
fn scale_percent(percent: u16, max_index: usize) -> usize {
    let percent = u64::from(percent.min(u16::from(PERCENT_MAX)));
    let max_index = u64::try_from(max_index).unwrap_or(u64::MAX);
    let scaled = percent
        .saturating_mul(max_index)
        .saturating_add(u64::from(PERCENT_MAX / 2))
        / u64::from(PERCENT_MAX);
    usize::try_from(scaled).unwrap_or(usize::MAX)
}
