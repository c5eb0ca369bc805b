use crate::args::BaseMap;
use crate::playback::{PlaybackStatus, RenderModel};
use crate::track::DateBounds;

/// One screenful of viewer state.
#[derive(Debug, Clone)]
pub struct UiRenderData<'view> {
    pub model: RenderModel<'view>,
    pub stats_lines: Vec<String>,
    pub status: String,
    pub playback: PlaybackStatus,
    /// Zero-based index of the shown subject and the number of subjects.
    pub subject_index: usize,
    pub subject_count: usize,
    pub bounds: Option<DateBounds>,
    pub speed: u32,
    pub trail_length: usize,
    pub base_map: BaseMap,
    pub zone_label: String,
}
