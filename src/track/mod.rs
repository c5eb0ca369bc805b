//! Loading, filtering and summarizing fetched GPS events.
mod filter;
mod load;
mod point;
mod stats;

#[cfg(test)]
mod tests;

pub use filter::{DateBounds, TrackView};
pub use load::{
    GPS_EVENTS_FILE, GpsDataset, INDIVIDUALS_FILE, SubjectDirectory, load_dataset,
    load_gps_events, load_subject_directory, parse_event_timestamp,
};
pub use point::TrackPoint;
pub use stats::{KM_TO_MILES, SpeedStats, TrackStats};
