use tracing::warn;

/// A Movebank sensor type known to this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorType {
    pub id: u64,
    /// Lower-case name used in file names and on the command line.
    pub name: &'static str,
    pub display_name: &'static str,
}

const fn sensor(id: u64, name: &'static str, display_name: &'static str) -> SensorType {
    SensorType {
        id,
        name,
        display_name,
    }
}

pub const GPS_SENSOR_ID: u64 = 653;

pub const SENSOR_TYPES: [SensorType; 13] = [
    sensor(GPS_SENSOR_ID, "gps", "GPS"),
    sensor(2_365_683, "acceleration", "Acceleration"),
    sensor(397, "bird_ring", "Bird Ring"),
    sensor(673, "radio_transmitter", "Radio Transmitter"),
    sensor(82_798, "argos", "Argos Doppler Shift"),
    sensor(2_365_682, "natural_mark", "Natural Mark"),
    sensor(3_886_361, "solar_geolocator", "Solar Geolocator"),
    sensor(7_842_954, "accessory_measurements", "Accessory Measurements"),
    sensor(77_740_391, "barometer", "Barometer"),
    sensor(77_740_402, "magnetometer", "Magnetometer"),
    sensor(819_073_350, "orientation", "Orientation"),
    sensor(1_297_673_380, "gyroscope", "Gyroscope"),
    sensor(2_206_221_896, "heart_rate", "Heart Rate"),
];

/// Short command-line aliases.
const ALIASES: [(&str, u64); 4] = [
    ("acc", 2_365_683),
    ("radio", 673),
    ("geolocator", 3_886_361),
    ("accessory", 7_842_954),
];

#[must_use]
pub fn sensor_by_id(id: u64) -> Option<&'static SensorType> {
    SENSOR_TYPES.iter().find(|sensor| sensor.id == id)
}

/// File-name stem for a sensor's events: `gps`, or `sensor_<id>` if unknown.
#[must_use]
pub fn sensor_file_stem(id: u64) -> String {
    sensor_by_id(id).map_or_else(|| format!("sensor_{id}"), |sensor| sensor.name.to_owned())
}

#[must_use]
pub fn sensor_display_name(id: u64) -> &'static str {
    sensor_by_id(id).map_or("Unknown", |sensor| sensor.display_name)
}

/// Resolves one selector: a name, an alias, or a numeric id.
#[must_use]
pub fn resolve_sensor_selector(selector: &str) -> Option<u64> {
    let lowered = selector.trim().to_ascii_lowercase();
    if let Some(sensor) = SENSOR_TYPES.iter().find(|sensor| sensor.name == lowered) {
        return Some(sensor.id);
    }
    if let Some((_, id)) = ALIASES.iter().find(|(alias, _)| *alias == lowered) {
        return Some(*id);
    }
    if !lowered.is_empty() && lowered.chars().all(|ch| ch.is_ascii_digit()) {
        return lowered.parse().ok();
    }
    None
}

/// Resolves every selector, warning about and dropping the unknown ones.
/// Duplicates are removed, keeping first occurrence order.
#[must_use]
pub fn resolve_sensor_selectors(selectors: &[String]) -> Vec<u64> {
    let mut ids = Vec::with_capacity(selectors.len());
    for selector in selectors {
        match resolve_sensor_selector(selector) {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => warn!("Unknown sensor type '{}' - skipping", selector),
        }
    }
    ids
}

/// One line of the `--list-sensors` output.
#[must_use]
pub fn sensor_listing_line(id: u64) -> String {
    format!("  {:30} (ID: {id})", sensor_display_name(id))
}
