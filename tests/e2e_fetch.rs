mod support;

use std::fs;

use tempfile::tempdir;

use support::{describe, run_movetrack, spawn_direct_read_server};

const CREDENTIALS: [(&str, &str); 2] = [("mbus", "user"), ("mbpw", "pass")];

#[test]
fn e2e_fetch_writes_csv_files_and_isolates_failures() -> Result<(), String> {
    let (url, _server) = spawn_direct_read_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_movetrack(
        dir.path(),
        ["fetch", "--study-id", "42", "--base-url", &url, "--output", "data"],
        &CREDENTIALS,
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let data = dir.path().join("data");
    for name in [
        "study_info.csv",
        "individuals.csv",
        "tags.csv",
        "sensors.csv",
        "events_gps.csv",
    ] {
        if !data.join(name).is_file() {
            return Err(format!("missing {}\n{}", name, describe(&output)));
        }
    }
    if data.join("deployments.csv").exists() {
        return Err("forbidden deployments should not be written".to_owned());
    }
    if data.join("events_acceleration.csv").exists() {
        return Err("empty event tables should not be written".to_owned());
    }

    let events = fs::read_to_string(data.join("events_gps.csv"))
        .map_err(|err| format!("read events failed: {}", err))?;
    if events.lines().count() != 4 || !events.starts_with("event_id,individual_local_identifier") {
        return Err(format!("unexpected events file:\n{}", events));
    }
    Ok(())
}

#[test]
fn e2e_fetch_then_view_without_ui() -> Result<(), String> {
    let (url, _server) = spawn_direct_read_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let fetched = run_movetrack(
        dir.path(),
        [
            "fetch",
            "--study-id",
            "42",
            "--sensors",
            "gps",
            "--no-metadata",
            "--base-url",
            &url,
        ],
        &CREDENTIALS,
    )?;
    if !fetched.status.success() {
        return Err(describe(&fetched));
    }

    let viewed = run_movetrack(dir.path(), ["view", "--no-ui"], &[])?;
    if !viewed.status.success() {
        return Err(describe(&viewed));
    }
    let stdout = String::from_utf8_lossy(&viewed.stdout);
    if !stdout.contains("Animal: Zebra-1") || !stdout.contains("Total Points: 3") {
        return Err(describe(&viewed));
    }
    if !dir.path().join("movebank_data/Zebra-1_track.html").is_file() {
        return Err(format!("map document missing\n{}", describe(&viewed)));
    }
    Ok(())
}

#[test]
fn e2e_list_sensors_prints_catalog() -> Result<(), String> {
    let (url, _server) = spawn_direct_read_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_movetrack(
        dir.path(),
        ["fetch", "--study-id", "42", "--list-sensors", "--base-url", &url],
        &CREDENTIALS,
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("(ID: 653)") || !stdout.contains("Acceleration") {
        return Err(describe(&output));
    }
    if dir.path().join("movebank_data").exists() {
        return Err("listing sensors should not write files".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_fetch_without_credentials_fails_before_any_request() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_movetrack(
        dir.path(),
        ["fetch", "--study-id", "42", "--base-url", "http://127.0.0.1:9/unused"],
        &[],
    )?;
    if output.status.success() {
        return Err(format!("expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("MissingCredentials") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_wrong_credentials_abort_on_study_info() -> Result<(), String> {
    let (url, _server) = spawn_direct_read_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_movetrack(
        dir.path(),
        ["fetch", "--study-id", "42", "--base-url", &url],
        &[("mbus", "user"), ("mbpw", "wrong")],
    )?;
    if output.status.success() {
        return Err(format!("expected failure\n{}", describe(&output)));
    }
    if dir.path().join("movebank_data/study_info.csv").exists() {
        return Err("nothing should be written after a denied study request".to_owned());
    }
    Ok(())
}
