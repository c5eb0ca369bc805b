use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, HttpError};
use crate::timestamp::normalize_timestamp;

use super::sensors::{sensor_file_stem, sensor_listing_line};
use super::{DirectRead, EntityRequest, Table};

pub const STUDY_INFO_FILE: &str = "study_info.csv";
pub const INDIVIDUALS_FILE: &str = "individuals.csv";
pub const TAGS_FILE: &str = "tags.csv";
pub const DEPLOYMENTS_FILE: &str = "deployments.csv";
pub const SENSORS_FILE: &str = "sensors.csv";
const SENSOR_TYPE_COLUMN: &str = "sensor_type_id";

/// What to download and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub study_id: u64,
    /// Requested sensor type ids; `None` means every sensor in the catalog.
    pub sensors: Option<Vec<u64>>,
    /// Raw start bound, normalized before use.
    pub start: Option<String>,
    pub end: Option<String>,
    pub individual: Option<String>,
    pub output_dir: PathBuf,
    pub fetch_metadata: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFailure {
    pub entity: String,
    pub message: String,
    pub permission_denied: bool,
}

/// Outcome of a fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub study_name: Option<String>,
    pub written: Vec<WrittenFile>,
    /// Sensors whose event request succeeded but returned no rows.
    pub empty_sensors: Vec<String>,
    /// Requested sensors the study does not carry.
    pub missing_sensors: Vec<u64>,
    pub failures: Vec<EntityFailure>,
}

impl FetchReport {
    #[must_use]
    pub fn wrote(&self, file_name: &str) -> bool {
        self.written
            .iter()
            .any(|file| file.path.file_name().is_some_and(|name| name == file_name))
    }

    fn record_failure(&mut self, entity: &str, err: &HttpError) {
        let permission_denied = matches!(
            err,
            HttpError::PermissionDenied { .. } | HttpError::LicenseRejected { .. }
        );
        error!("Failed to fetch {}: {}", entity, err);
        self.failures.push(EntityFailure {
            entity: entity.to_owned(),
            message: err.to_string(),
            permission_denied,
        });
    }

    /// One line per written file, empty sensor and failure.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.study_name {
            lines.push(format!("Study: {name}"));
        }
        for file in &self.written {
            lines.push(format!("Saved {} ({} rows)", file.path.display(), file.rows));
        }
        for sensor in &self.empty_sensors {
            lines.push(format!("No events found for {sensor}"));
        }
        if !self.missing_sensors.is_empty() {
            lines.push(format!(
                "Requested sensor types not found in study: {:?}",
                self.missing_sensors
            ));
        }
        for failure in &self.failures {
            lines.push(format!("Failed: {}: {}", failure.entity, failure.message));
        }
        lines
    }
}

async fn fetch_table<C>(client: &C, request: &EntityRequest) -> Result<Table, HttpError>
where
    C: DirectRead + Sync + ?Sized,
{
    let entity = request.to_string();
    let body = client.fetch_text(request).await?;
    Table::parse(&entity, &body)
}

fn save(table: &Table, dir: &Path, file_name: &str, report: &mut FetchReport) -> Result<(), HttpError> {
    let path = dir.join(file_name);
    table.write_csv(&path)?;
    info!("Saved {} rows to {}", table.len(), path.display());
    report.written.push(WrittenFile {
        path,
        rows: table.len(),
    });
    Ok(())
}

/// Downloads study metadata, the sensor catalog and per-sensor events.
///
/// Only the study information request is fatal; every later entity is
/// isolated and recorded in the report on failure.
///
/// # Errors
///
/// Returns an error when the output directory cannot be created or when the
/// study information cannot be fetched or saved.
pub async fn fetch_study<C>(client: &C, plan: &FetchPlan) -> AppResult<FetchReport>
where
    C: DirectRead + Sync + ?Sized,
{
    std::fs::create_dir_all(&plan.output_dir).map_err(|source| {
        AppError::http(HttpError::OutputDirectory {
            path: plan.output_dir.clone(),
            source,
        })
    })?;
    let start = normalize_timestamp(plan.start.as_deref());
    let end = normalize_timestamp(plan.end.as_deref());
    info!("Fetching data for study {}", plan.study_id);
    if start.is_some() || end.is_some() {
        info!(
            "Time range: {} to {}",
            plan.start.as_deref().unwrap_or("beginning"),
            plan.end.as_deref().unwrap_or("now")
        );
    }

    let mut report = FetchReport::default();
    let dir = plan.output_dir.as_path();

    let study = fetch_table(client, &EntityRequest::study(plan.study_id)).await?;
    if study.headers().is_empty() {
        return Err(AppError::http(HttpError::EmptyResponse {
            entity: EntityRequest::study(plan.study_id).to_string(),
        }));
    }
    report.study_name = study
        .column("name")
        .and_then(|mut names| names.next())
        .map(str::to_owned);
    info!("Study: {}", report.study_name.as_deref().unwrap_or("N/A"));
    save(&study, dir, STUDY_INFO_FILE, &mut report)?;

    if plan.fetch_metadata {
        let metadata = [
            (EntityRequest::individuals(plan.study_id), INDIVIDUALS_FILE),
            (EntityRequest::tags(plan.study_id), TAGS_FILE),
            (EntityRequest::deployments(plan.study_id), DEPLOYMENTS_FILE),
        ];
        for (request, file_name) in metadata {
            let outcome = match fetch_table(client, &request).await {
                Ok(table) => save(&table, dir, file_name, &mut report),
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                report.record_failure(&request.to_string(), &err);
            }
        }
    }

    let catalog_request = EntityRequest::sensors(plan.study_id);
    let catalog = match fetch_table(client, &catalog_request).await {
        Ok(table) => table,
        Err(err) => {
            report.record_failure(&catalog_request.to_string(), &err);
            return Ok(report);
        }
    };
    if let Err(err) = save(&catalog, dir, SENSORS_FILE, &mut report) {
        report.record_failure(&catalog_request.to_string(), &err);
    }

    let available = catalog_sensor_ids(&catalog);
    info!("Found {} sensor types", available.len());
    let selected = match plan.sensors.as_deref() {
        None => available,
        Some(requested) => {
            let (present, missing): (Vec<u64>, Vec<u64>) = requested
                .iter()
                .copied()
                .partition(|id| available.contains(id));
            if !missing.is_empty() {
                warn!("Requested sensor types not found in study: {:?}", missing);
            }
            report.missing_sensors = missing;
            present
        }
    };

    for sensor_id in selected {
        let stem = sensor_file_stem(sensor_id);
        info!("Fetching {} data (sensor_type_id={})", stem, sensor_id);
        let request = EntityRequest::events(plan.study_id, sensor_id)
            .with_individual(plan.individual.clone())
            .with_time_range(start.clone(), end.clone());
        let outcome = match fetch_table(client, &request).await {
            Ok(table) if table.is_empty() => {
                info!("No events found for {}", stem);
                report.empty_sensors.push(stem);
                Ok(())
            }
            Ok(table) => save(&table, dir, &format!("events_{stem}.csv"), &mut report),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            report.record_failure(&request.to_string(), &err);
        }
    }

    info!(
        "Data export complete. Files saved to {}",
        plan.output_dir.display()
    );
    Ok(report)
}

fn catalog_sensor_ids(catalog: &Table) -> Vec<u64> {
    catalog
        .distinct(SENSOR_TYPE_COLUMN)
        .iter()
        .filter_map(|value| match value.parse::<u64>() {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("Ignoring sensor_type_id '{}': {}", value, err);
                None
            }
        })
        .collect()
}

/// Fetches the sensor catalog and formats one line per catalog row.
///
/// # Errors
///
/// Returns an error when the catalog request fails.
pub async fn list_sensors<C>(client: &C, study_id: u64) -> AppResult<Vec<String>>
where
    C: DirectRead + Sync + ?Sized,
{
    let catalog = fetch_table(client, &EntityRequest::sensors(study_id)).await?;
    let lines = catalog
        .column(SENSOR_TYPE_COLUMN)
        .into_iter()
        .flatten()
        .filter_map(|value| value.trim().parse::<u64>().ok())
        .map(sensor_listing_line)
        .collect();
    Ok(lines)
}
