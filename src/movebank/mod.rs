//! Client and download orchestration for the Movebank direct-read service.
mod client;
mod fetch;
mod request;
mod sensors;
mod table;


pub use client::{
    ClientSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DirectRead, MovebankClient, license_digest,
};
pub use fetch::{
    DEPLOYMENTS_FILE, EntityFailure, FetchPlan, FetchReport, INDIVIDUALS_FILE, SENSORS_FILE,
    STUDY_INFO_FILE, TAGS_FILE, WrittenFile, fetch_study, list_sensors,
};
pub use request::{ALL_ATTRIBUTES, EntityRequest, EntityType};
pub use sensors::{
    GPS_SENSOR_ID, SENSOR_TYPES, SensorType, resolve_sensor_selector, resolve_sensor_selectors,
    sensor_by_id, sensor_display_name, sensor_file_stem, sensor_listing_line,
};
pub use table::Table;
