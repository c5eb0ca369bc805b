use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Background layer of the map document.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BaseMap {
    #[default]
    #[value(name = "openstreetmap", alias = "osm")]
    #[serde(alias = "osm")]
    OpenStreetMap,
    Satellite,
    Terrain,
}

impl BaseMap {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::Satellite => "Satellite",
            Self::Terrain => "Terrain",
        }
    }

    /// The next layer in the cycle used by the viewer's `b` key.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::OpenStreetMap => Self::Satellite,
            Self::Satellite => Self::Terrain,
            Self::Terrain => Self::OpenStreetMap,
        }
    }
}
