//! Integration tests for the `catalogary` CLI binary.
//!
//! Argument parsing, help output and shell completions run offline; the
//! service commands run against a local mock server passed via `--url`.
#![allow(clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `catalogary` binary with env isolation.
///
/// Clears all `CATALOGARY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn catalogary_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("catalogary");
    cmd.env("HOME", "/tmp/catalogary-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/catalogary-cli-test-nonexistent")
        .env_remove("CATALOGARY_PROFILE")
        .env_remove("CATALOGARY_URL")
        .env_remove("CATALOGARY_OUTPUT")
        .env_remove("CATALOGARY_INSECURE")
        .env_remove("CATALOGARY_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || catalogary_cmd().args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = rest.iter().map(ToString::to_string).collect();
    out.extend(["--url".to_owned(), server.uri()]);
    out
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{stderr}", stdout(output))
}

fn summary(id: &str) -> Value {
    json!({
        "id": id,
        "version": 1,
        "startDate": "2026-10-16T08:00:00+02:00",
        "severity": "Minor",
        "type": "Alert",
        "i18nTitle": {"de": "Sturmböen"}
    })
}

fn components_body() -> Value {
    json!({
        "count": 2,
        "indices": ["component id", "component code", "component symbol", "component unit", "component name"],
        "1": ["1", "PM10", "PM₁₀", "µg/m³", "Particulate matter"],
        "2": ["3", "O3", "O₃", "µg/m³", "Ozone"]
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = catalogary_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    catalogary_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("warnings")
            .and(predicate::str::contains("measures"))
            .and(predicate::str::contains("matrix")),
    );
}

#[test]
fn test_version_flag() {
    catalogary_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("catalogary"));
}

#[test]
fn test_completions_bash() {
    catalogary_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_unknown_source_is_usage_error() {
    catalogary_cmd()
        .args(["warnings", "nowhere"])
        .assert()
        .code(2);
}

#[test]
fn test_select_requires_complete() {
    catalogary_cmd()
        .args(["warnings", "dwd", "--select", "id"])
        .assert()
        .code(2);
}

#[test]
fn test_hour_out_of_range_is_usage_error() {
    // rejected before any request is sent
    catalogary_cmd()
        .args([
            "measures",
            "--date-from",
            "2026-10-01",
            "--time-from",
            "25",
            "--url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("time_from"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    catalogary_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_show_masks_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("catalogary");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
[profiles.work]
service = "nina"
username = "alice"
password = "hunter2"
"#,
    )
    .unwrap();

    catalogary_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("alice")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_missing_profile_is_usage_error() {
    catalogary_cmd()
        .args(["components", "-p", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

// ── Warnings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_warnings_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api31/dwd/mapData.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([summary("dwd.1")])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(&server, &["warnings", "dwd", "-o", "json"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed[0]["id"], "dwd.1");
}

#[tokio::test]
async fn test_warnings_table_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api31/mowas/mapData.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([summary("mow.7")])))
        .mount(&server)
        .await;

    let output = run(args(&server, &["warnings", "mowas"])).await;
    let text = stdout(&output);
    assert!(text.contains("Severity"), "{text}");
    assert!(text.contains("mow.7"));
    assert!(text.contains("Sturmböen"));
}

#[tokio::test]
async fn test_warnings_complete_joins_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api31/police/mapData.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([summary("pol.1")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api31/warnings/pol.1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "identifier": "pol.1", "sender": "Polizei", "info": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api31/warnings/pol.1.geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection", "features": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &["warnings", "police", "--complete", "--select", "id,sender", "-o", "json-compact"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        parsed,
        json!([{
            "warning": {"id": "pol.1"},
            "warning_detail": {"sender": "Polizei"},
            "warning_geo": {}
        }])
    );
}

#[tokio::test]
async fn test_missing_warning_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api31/warnings/gone.json"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"errorMessages": ["no such warning"]})),
        )
        .mount(&server)
        .await;

    let output = run(args(&server, &["warning", "detail", "gone"])).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("no such warning"));
}

// ── Air quality ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_components_json_compact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/components/json"))
        .and(query_param("lang", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(components_body()))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &["components", "--lang", "de", "-o", "json-compact"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(stdout(&output).contains(r#""code":"PM10""#));
}

#[tokio::test]
async fn test_measures_table_shows_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/measures/json"))
        .and(query_param("component", "3"))
        .and(query_param("scope", "1"))
        .and(query_param("station", "1146"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": {},
            "indices": {},
            "data": {"1146": {"2026-10-01 01:00:00": [3, 1, 42, "2026-10-02 00:00:00", "1"]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &[
            "measures",
            "--date-from",
            "2026-10-01",
            "--component",
            "3",
            "--scope",
            "1TMW",
            "--station",
            "1146",
        ],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let text = stdout(&output);
    assert!(text.contains("1146"));
    assert!(text.contains("42"));
}

#[tokio::test]
async fn test_matrix_restricted_to_one_component() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/components/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(components_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/measures/json"))
        .and(query_param("component", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"282": {"2026-10-01 01:00:00": [3, 2, 38, "end", "1"]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &["matrix", "--date-from", "2026-10-01", "--component", "O3"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let text = stdout(&output);
    assert!(text.contains("282"));
    assert!(text.contains("O3"));
    assert!(text.contains("38"));
}

#[tokio::test]
async fn test_full_matrix_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/components/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(components_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/meta/json"))
        .and(query_param("use", "measure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stations": {
                "282": ["282", "DEBY005", "Augsburg", "Augsburg", "",
                        "1990-01-01", null, "10.9", "48.4"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/measures/json"))
        .and(query_param("component", "1"))
        .and(query_param("scope", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"282": {"2026-10-01": [1, 1, 21, "end", "1"]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &[
            "matrix",
            "--date-from",
            "2026-10-01",
            "--full",
            "--component",
            "1",
            "--scope",
            "1",
            "--no-delay",
            "-o",
            "json",
        ],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["values"]["282"]["2026-10-01"]["PM10"]["1TMW"], 21);
    assert_eq!(parsed["stations"]["282"]["city"], "Augsburg");
}

#[tokio::test]
async fn test_several_scopes_need_full() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/components/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(components_body()))
        .mount(&server)
        .await;

    let output = run(args(
        &server,
        &["matrix", "--date-from", "2026-10-01", "--scope", "1,2"],
    ))
    .await;
    assert_eq!(output.status.code(), Some(2));
}
