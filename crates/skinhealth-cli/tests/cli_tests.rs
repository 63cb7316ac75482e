//! Integration tests for the in-process commands (`nearby`, `distance`).
//!
//! Provider URLs point at a closed local port so every lookup fails fast
//! and the locator falls back to the demo catalog and local estimates.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const CLOSED_PORT_URL: &str = "http://127.0.0.1:9";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("skinhealth-cli").expect("binary exists");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// `nearby` with a maps key whose providers are all unreachable.
fn offline_nearby() -> Command {
    let mut cmd = cli();
    cmd.env("GOOGLE_MAPS_API_KEY", "test-key")
        .env_remove("GOOGLE_AI_API_KEY")
        .env("PLACES_API_URL", CLOSED_PORT_URL)
        .env("PLACES_LEGACY_API_URL", CLOSED_PORT_URL)
        .env("ROUTES_API_URL", CLOSED_PORT_URL)
        .env("DISTANCE_MATRIX_API_URL", CLOSED_PORT_URL)
        .env("UPSTREAM_TIMEOUT_SECS", "2")
        .arg("nearby");
    cmd
}

#[test]
fn distance_prints_kilometres() {
    cli()
        .args(["distance", "0", "0", "0", "1"])
        .assert()
        .success()
        .stdout(predicate::eq("111.19 km\n"));
}

#[test]
fn distance_accepts_negative_coordinates() {
    cli()
        .args(["distance", "-33.8688", "151.2093", "-33.8688", "151.2093"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0.00 km"));
}

#[test]
fn distance_estimate_adds_a_drive_line() {
    cli()
        .args(["distance", "0", "0", "0", "1", "--estimate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated drive: 144.6 km"));
}

#[test]
fn nearby_falls_back_to_demo_catalog() {
    offline_nearby()
        .args(["--lat", "48", "--lng", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 hospitals (search tier: demo_catalog)"))
        .stdout(predicate::str::contains("City General Hospital"))
        .stdout(predicate::str::contains("estimate"))
        .stdout(predicate::str::contains("Demo data"));
}

#[test]
fn nearby_json_output_is_sorted_by_distance() {
    let output = offline_nearby()
        .args(["--lat", "48", "--lng", "11", "--format", "json"])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let records: Value = serde_json::from_slice(&output.stdout).expect("valid JSON on stdout");
    let records = records.as_array().expect("array of records");
    assert_eq!(records.len(), 4);

    let distances: Vec<f64> = records
        .iter()
        .map(|r| r["distance"].as_f64().expect("distance"))
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(records
        .iter()
        .all(|r| r["distance_source"] == "estimate"));
}

#[test]
fn nearby_with_tiny_radius_finds_nothing() {
    offline_nearby()
        .args(["--lat", "48", "--lng", "11", "--radius", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No hospitals found"));
}

#[test]
fn nearby_accepts_negative_longitude() {
    offline_nearby()
        .args(["--lat", "40.7128", "--lng", "-74.0060", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn nearby_requires_coordinates() {
    cli()
        .args(["nearby", "--lat", "48"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--lng"));
}
