use tracing::{error, info, warn};

use crate::args::FetchArgs;
use crate::config::resolve_credentials;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult, ValidationError};
use crate::movebank::{
    ClientSettings, FetchPlan, MovebankClient, fetch_study, list_sensors,
    resolve_sensor_selectors,
};

const PERMISSION_HINT: &str = "Access was denied. Check that the account has download permission for this study and has accepted its license terms on movebank.org.";

fn build_plan(args: &FetchArgs, study_id: u64) -> FetchPlan {
    let sensors = if args.sensors.is_empty() {
        None
    } else {
        Some(resolve_sensor_selectors(&args.sensors))
    };
    FetchPlan {
        study_id,
        sensors,
        start: args.start.clone(),
        end: args.end.clone(),
        individual: args.individual.clone(),
        output_dir: args.output.clone(),
        fetch_metadata: !args.no_metadata,
    }
}

pub(crate) async fn run_fetch(args: &FetchArgs, config: Option<&ConfigFile>) -> AppResult<()> {
    let credentials = resolve_credentials(
        args.username.as_deref(),
        args.password.as_deref(),
        config,
    )
    .inspect_err(|err| error!("{}", err))?;
    let Some(study_id) = args.study_id else {
        error!("Missing study id (set --study-id or provide it in the config file).");
        return Err(AppError::validation(ValidationError::MissingStudyId));
    };
    let settings = ClientSettings {
        base_url: args.base_url.clone(),
        timeout: args.timeout,
    };
    let client = MovebankClient::new(&settings, credentials)?;

    if args.list_sensors {
        let lines = list_sensors(&client, study_id).await.inspect_err(|err| {
            if err.is_permission_denied() {
                warn!("{}", PERMISSION_HINT);
            }
        })?;
        if lines.is_empty() {
            println!("No sensors found for study {study_id}");
        } else {
            println!("Available sensor types in study {study_id}:");
            for line in lines {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let plan = build_plan(args, study_id);
    let report = fetch_study(&client, &plan).await.inspect_err(|err| {
        if err.is_permission_denied() {
            warn!("{}", PERMISSION_HINT);
        }
    })?;
    if report.failures.iter().any(|failure| failure.permission_denied) {
        warn!("{}", PERMISSION_HINT);
    }
    for line in report.summary_lines() {
        info!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::build_plan;
    use crate::args::{Cli, Command};
    use crate::error::{AppError, AppResult};
    use crate::movebank::GPS_SENSOR_ID;

    fn fetch_args(extra: &[&str]) -> AppResult<crate::args::FetchArgs> {
        let mut argv = vec!["movetrack", "fetch"];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Command::Fetch(args) => Ok(args),
            Command::View(_) => Err(AppError::validation("expected fetch command")),
        }
    }

    #[test]
    fn no_sensor_selection_means_every_sensor() -> AppResult<()> {
        let plan = build_plan(&fetch_args(&[])?, 7);
        if plan.sensors.is_some() || !plan.fetch_metadata || plan.study_id != 7 {
            return Err(AppError::validation(format!("unexpected plan {plan:?}")));
        }
        Ok(())
    }

    #[test]
    fn unknown_selectors_leave_an_empty_selection() -> AppResult<()> {
        let plan = build_plan(&fetch_args(&["--sensors", "sonar", "--no-metadata"])?, 7);
        if plan.sensors != Some(Vec::new()) || plan.fetch_metadata {
            return Err(AppError::validation(format!("unexpected plan {plan:?}")));
        }
        Ok(())
    }

    #[test]
    fn selectors_resolve_to_ids() -> AppResult<()> {
        let plan = build_plan(&fetch_args(&["--sensors", "GPS", "acc", "653"])?, 7);
        if plan.sensors != Some(vec![GPS_SENSOR_ID, 2_365_683]) {
            return Err(AppError::validation(format!("unexpected plan {plan:?}")));
        }
        Ok(())
    }
}
