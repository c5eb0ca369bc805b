use std::fmt;

/// Entity types served by the direct-read endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Study,
    Individual,
    Tag,
    Deployment,
    Sensor,
    Event,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Individual => "individual",
            Self::Tag => "tag",
            Self::Deployment => "deployment",
            Self::Sensor => "sensor",
            Self::Event => "event",
        }
    }
}

/// Event requests ask for every attribute unless told otherwise.
pub const ALL_ATTRIBUTES: &str = "all";

/// One direct-read query. Fields are encoded in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRequest {
    pub entity_type: EntityType,
    pub study_id: Option<u64>,
    pub tag_study_id: Option<u64>,
    pub sensor_type_id: Option<u64>,
    pub individual_id: Option<String>,
    pub attributes: Option<String>,
    pub timestamp_start: Option<String>,
    pub timestamp_end: Option<String>,
}

impl EntityRequest {
    const fn bare(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            study_id: None,
            tag_study_id: None,
            sensor_type_id: None,
            individual_id: None,
            attributes: None,
            timestamp_start: None,
            timestamp_end: None,
        }
    }

    const fn for_study(entity_type: EntityType, study_id: u64) -> Self {
        let mut request = Self::bare(entity_type);
        request.study_id = Some(study_id);
        request
    }

    #[must_use]
    pub const fn study(study_id: u64) -> Self {
        Self::for_study(EntityType::Study, study_id)
    }

    #[must_use]
    pub const fn individuals(study_id: u64) -> Self {
        Self::for_study(EntityType::Individual, study_id)
    }

    #[must_use]
    pub const fn tags(study_id: u64) -> Self {
        Self::for_study(EntityType::Tag, study_id)
    }

    #[must_use]
    pub const fn deployments(study_id: u64) -> Self {
        Self::for_study(EntityType::Deployment, study_id)
    }

    /// The sensor catalog is keyed by `tag_study_id`, not `study_id`.
    #[must_use]
    pub const fn sensors(study_id: u64) -> Self {
        let mut request = Self::bare(EntityType::Sensor);
        request.tag_study_id = Some(study_id);
        request
    }

    #[must_use]
    pub fn events(study_id: u64, sensor_type_id: u64) -> Self {
        let mut request = Self::for_study(EntityType::Event, study_id);
        request.sensor_type_id = Some(sensor_type_id);
        request.attributes = Some(ALL_ATTRIBUTES.to_owned());
        request
    }

    #[must_use]
    pub fn with_individual(mut self, individual_id: Option<String>) -> Self {
        self.individual_id = individual_id;
        self
    }

    #[must_use]
    pub fn with_time_range(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.timestamp_start = start;
        self.timestamp_end = end;
        self
    }

    /// Query pairs for the request URL.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("entity_type", self.entity_type.as_str().to_owned())];
        let numeric = [
            ("study_id", self.study_id),
            ("tag_study_id", self.tag_study_id),
            ("sensor_type_id", self.sensor_type_id),
        ];
        pairs.extend(
            numeric
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value.to_string()))),
        );
        let text = [
            ("individual_id", &self.individual_id),
            ("attributes", &self.attributes),
            ("timestamp_start", &self.timestamp_start),
            ("timestamp_end", &self.timestamp_end),
        ];
        pairs.extend(
            text.into_iter()
                .filter_map(|(key, value)| value.clone().map(|value| (key, value))),
        );
        pairs
    }
}

impl fmt::Display for EntityRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_type.as_str())?;
        if let Some(sensor) = self.sensor_type_id {
            write!(f, " (sensor_type_id={sensor})")?;
        }
        if let Some(study) = self.study_id.or(self.tag_study_id) {
            write!(f, " for study {study}")?;
        }
        Ok(())
    }
}
