//! Integration tests for the `meshscout` CLI binary.
//!
//! Argument parsing and error handling run offline; the end-to-end
//! discovery tests run the binary against a wiremock analyzer.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `meshscout` binary with env isolation.
///
/// Clears all `MESHSCOUT_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn meshscout_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("meshscout");
    cmd.env("HOME", "/tmp/meshscout-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/meshscout-test-nonexistent")
        .env_remove("MESHSCOUT_BASE_URL")
        .env_remove("MESHSCOUT_TIMEOUT")
        .env_remove("MESHSCOUT_CONFIG")
        .env_remove("MESHSCOUT_REGION")
        .env_remove("MESHSCOUT_DAYS");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const SEA_KEY: &str = "AAAA8710C40E04634037CF75CEEC2A2F0F6733BFBB49A720EC44BBE9E6738830";

/// Stand up a mock analyzer with one recent SEA repeater in the index.
async fn mock_analyzer() -> MockServer {
    let server = MockServer::start().await;
    let now = chrono::Utc::now().to_rfc3339();

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nodes": [{
                "public_key": SEA_KEY,
                "name": "Capitol Hill Repeater",
                "device_role": "Repeater",
                "decoded_payload": { "mode": "Repeater" },
                "regions": ["SEA"],
                "last_seen": now,
                "is_mqtt_connected": true,
            }],
            "meta": { "total_count": 1 }
        })))
        .mount(&server)
        .await;

    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = meshscout_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    meshscout_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("MeshCore")
            .and(predicate::str::contains("nodes"))
            .and(predicate::str::contains("regions")),
    );
}

#[test]
fn test_version_flag() {
    meshscout_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("meshscout"));
}

// ── Regions listing (offline) ───────────────────────────────────────

#[test]
fn test_regions_lists_groups() {
    meshscout_cmd().arg("regions").assert().success().stdout(
        predicate::str::contains("PNW")
            .and(predicate::str::contains("SEA"))
            .and(predicate::str::contains("BC")),
    );
}

#[test]
fn test_regions_plain_is_one_code_per_line() {
    meshscout_cmd()
        .args(["regions", "--format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEA\n").and(predicate::str::contains("YVR")));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = meshscout_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = meshscout_cmd()
        .args(["--format", "invalid", "regions"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_non_hex_public_key_is_rejected() {
    let output = meshscout_cmd()
        .args(["nodes", "--public-keys", "not-a-key"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("hex"),
        "Expected hex validation error:\n{text}"
    );
}

#[test]
fn test_malformed_base_url_is_usage_error() {
    let output = meshscout_cmd()
        .args(["--base-url", "not a url", "nodes", "--no-adverts"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

#[test]
fn test_unreachable_analyzer_degrades_to_seeds() {
    // Port 9 (discard) refuses connections on any sane test host. Both
    // discovery strategies fail, so a home-region run falls back to the
    // seed list instead of erroring out.
    let output = meshscout_cmd()
        .args([
            "--base-url",
            "http://127.0.0.1:9/api",
            "--format",
            "json",
            "nodes",
            "--region",
            "SEA",
            "--no-adverts",
            "--days",
            "1",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["summary"]["total"], 2);
    assert_eq!(snapshot["nodes"][0]["name"], "Unknown (seed)");
}

// ── End-to-end discovery against a mock analyzer ────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_nodes_json_against_mock_analyzer() {
    let server = mock_analyzer().await;
    let base = format!("{}/api", server.uri());

    let output = meshscout_cmd()
        .args([
            "--base-url",
            &base,
            "--format",
            "json",
            "nodes",
            "--region",
            "SEA",
            "--days",
            "7",
            "--no-adverts",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["region"], "SEA");
    assert_eq!(snapshot["summary"]["total"], 1);
    assert_eq!(snapshot["summary"]["repeaters"], 1);
    assert_eq!(snapshot["nodes"][0]["public_key"], SEA_KEY);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nodes_writes_snapshot_file() {
    let server = mock_analyzer().await;
    let base = format!("{}/api", server.uri());
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("snapshot.json");

    meshscout_cmd()
        .args([
            "--base-url",
            &base,
            "--quiet",
            "nodes",
            "--region",
            "SEA",
            "--no-adverts",
            "--output",
        ])
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["summary"]["total"], 1);
    assert_eq!(written["nodes"][0]["name"], "Capitol Hill Repeater");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nodes_plain_lists_keys() {
    let server = mock_analyzer().await;
    let base = format!("{}/api", server.uri());

    meshscout_cmd()
        .args([
            "--base-url",
            &base,
            "--format",
            "plain",
            "nodes",
            "--region",
            "SEA",
            "--no-adverts",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(SEA_KEY));
}
