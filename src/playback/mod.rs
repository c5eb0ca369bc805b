//! Incremental point-by-point replay of a filtered track.
mod frame;
mod state;


pub use frame::{FrameInfo, RenderModel, SunInfo, build_render_model};
pub use state::{
    DEFAULT_SPEED, DEFAULT_TRAIL_LENGTH, MAX_SPEED, MAX_TRAIL_LENGTH, MIN_SPEED, MIN_TICK_PERIOD,
    Playback, PlaybackStatus, TickOutcome, tick_period,
};
