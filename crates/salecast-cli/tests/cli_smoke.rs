//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `salecast` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

use salecast_model::fixtures::{sample_artifact, sample_record};
use salecast_model::preprocessing::HandleUnknown;

fn cmd() -> Command {
    Command::cargo_bin("salecast").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("predict"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("salecast"));
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

#[test]
fn serve_without_artifact_fails_fast() {
    cmd()
        .args(["serve", "--artifact", "/nonexistent/XgBoost_SalePrediction.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No config file provided"))
        .stderr(predicate::str::contains("Failed to load model artifact"));
}

#[test]
fn serve_without_config_prints_template() {
    cmd()
        .args(["serve", "--artifact", "/nonexistent/XgBoost_SalePrediction.json", "--port", "9100"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"artifact_path\": \"/nonexistent/XgBoost_SalePrediction.json\""))
        .stdout(predicate::str::contains("\"port\": 9100"))
        .stdout(predicate::str::contains("\"max_payload_bytes\""));
}

#[test]
fn serve_with_config_prints_no_template() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("server.json");
    std::fs::write(
        &config_path,
        r#"{"artifact_path": "/nonexistent/XgBoost_SalePrediction.json"}"#,
    )
    .unwrap();

    cmd()
        .arg("serve")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Using config"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn serve_nonexistent_config_errors() {
    cmd()
        .args(["serve", "/nonexistent/server.json"])
        .assert()
        .failure();
}

#[test]
fn serve_rejects_invalid_port() {
    cmd()
        .args(["serve", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ---------------------------------------------------------------------------
// predict
// ---------------------------------------------------------------------------

#[test]
fn predict_requires_artifact_and_input() {
    cmd().arg("predict").assert().failure();
}

#[test]
fn predict_writes_csv_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let artifact_path = dir.path().join("artifact.json");
    let input_path = dir.path().join("record.json");
    sample_artifact(HandleUnknown::Error)
        .unwrap()
        .save(&artifact_path)
        .unwrap();
    std::fs::write(&input_path, sample_record().to_string()).unwrap();

    cmd()
        .args(["predict", "--artifact"])
        .arg(&artifact_path)
        .arg("--input")
        .arg(&input_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("prediction,Product ID,Name,season\n"))
        .stdout(predicate::str::contains(",123,Linen Wrap Dress,Spring"));
}

#[test]
fn predict_invalid_shape_errors() {
    let dir = tempfile::tempdir().unwrap();
    let artifact_path = dir.path().join("artifact.json");
    let input_path = dir.path().join("record.json");
    sample_artifact(HandleUnknown::Error)
        .unwrap()
        .save(&artifact_path)
        .unwrap();
    std::fs::write(&input_path, "\"text\"").unwrap();

    cmd()
        .args(["predict", "--artifact"])
        .arg(&artifact_path)
        .arg("--input")
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Must be object or list of objects"));
}
