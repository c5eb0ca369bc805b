use std::time::Duration;

use serde::Deserialize;

use crate::args::BaseMap;
use crate::error::ConfigError;

/// Contents of `movetrack.toml` / `movetrack.json`. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub credentials: Option<CredentialsConfig>,
    pub service: Option<ServiceConfig>,
    pub fetch: Option<FetchConfig>,
    pub viewer: Option<ViewerConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchConfig {
    pub study_id: Option<u64>,
    pub sensors: Option<Vec<String>>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(alias = "output")]
    pub output_dir: Option<String>,
    pub individual: Option<String>,
    /// `false` skips individuals, tags and deployments.
    pub metadata: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewerConfig {
    pub data_dir: Option<String>,
    pub subject: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub base_map: Option<BaseMap>,
    pub trail_length: Option<usize>,
    pub speed: Option<u32>,
    pub utc_offset: Option<String>,
    pub zone_label: Option<String>,
    pub heatmap: Option<bool>,
    pub no_track: Option<bool>,
    pub no_markers: Option<bool>,
    pub no_ui: Option<bool>,
    pub map_out: Option<String>,
    pub image_out: Option<String>,
}

/// A duration given either as whole seconds or as text with a unit suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> Result<Duration, ConfigError> {
        match self {
            Self::Seconds(0) => Err(ConfigError::InvalidDuration {
                field,
                value: "0".to_owned(),
                reason: "must be > 0".to_owned(),
            }),
            Self::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            Self::Text(text) => {
                super::parse_duration_value(text).map_err(|err| ConfigError::InvalidDuration {
                    field,
                    value: text.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }
}
