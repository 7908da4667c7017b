use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/scenarios/eu2024_demo.json")
}

fn seatsim() -> Command {
    let mut cmd = Command::cargo_bin("seatsim").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn demo_run_writes_result_and_reports() {
    let out = tempfile::tempdir().unwrap();
    seatsim()
        .arg(demo_path())
        .args(["--quiet", "--render", "json", "--render", "text", "--out"])
        .arg(out.path())
        .assert()
        .success();

    let result: Value =
        serde_json::from_slice(&fs::read(out.path().join("result.json")).unwrap()).unwrap();
    assert_eq!(result["total_seats"], Value::from(720u64));
    assert!(result["id"].as_str().unwrap().starts_with("RES:"));
    assert_eq!(result["input_sha256"].as_str().map(str::len), Some(64));

    let report: Value =
        serde_json::from_slice(&fs::read(out.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["result_id"], result["id"]);
    assert_eq!(report["chart"].as_array().unwrap().last().unwrap()["seats"], Value::from(720u64));

    let text = fs::read_to_string(out.path().join("report.txt")).unwrap();
    for section in [
        "Total votes by party and constituency",
        "Seats by political group",
        "Total seats by constituency",
        "Seats by party",
    ] {
        assert!(text.contains(section), "missing section {section}");
    }
}

#[test]
fn text_report_goes_to_stdout_without_out_dir() {
    seatsim()
        .arg(demo_path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total seats by constituency"))
        .stdout(predicate::str::contains("Luxembourg"));
}

#[test]
fn validate_only_allocates_nothing() {
    let out = tempfile::tempdir().unwrap();
    seatsim()
        .arg(demo_path())
        .args(["--quiet", "--validate-only", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(!out.path().join("result.json").exists());
}

#[test]
fn no_input_is_a_validation_error() {
    seatsim()
        .arg("--quiet")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing required input"));
}

#[test]
fn url_paths_are_refused() {
    seatsim()
        .arg("https://example.org/scenario.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));
}

#[test]
fn missing_scenario_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    seatsim()
        .arg(dir.path().join("absent.json"))
        .arg("--quiet")
        .assert()
        .code(4);
}

#[test]
fn unknown_override_party_is_rejected() {
    seatsim()
        .arg(demo_path())
        .args(["--quiet", "--share", "XX Nobody@Malta=10%"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown party"));
}

#[test]
fn malformed_percent_is_rejected() {
    seatsim()
        .arg(demo_path())
        .args(["--share", "MT EPP@Malta=abc%"])
        .assert()
        .code(2);
}

#[test]
fn same_seed_gives_identical_result() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    for dir in [&a, &b] {
        seatsim()
            .arg(demo_path())
            .args(["--quiet", "--tie-seed", "0x2A", "--out"])
            .arg(dir.path())
            .assert()
            .success();
    }
    let ra = fs::read(a.path().join("result.json")).unwrap();
    let rb = fs::read(b.path().join("result.json")).unwrap();
    assert_eq!(ra, rb);

    let v: Value = serde_json::from_slice(&ra).unwrap();
    assert_eq!(v["tie_policy"]["seed"], Value::from(42u64));
}

#[test]
fn manifest_points_at_the_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("manifest.json");
    let scenario = fs::canonicalize(demo_path()).unwrap();
    let body = serde_json::json!({ "scenario_path": scenario.to_str().unwrap() });
    fs::write(&manifest, body.to_string()).unwrap();

    let out = dir.path().join("out");
    seatsim()
        .arg("--manifest")
        .arg(&manifest)
        .args(["--quiet", "--out"])
        .arg(&out)
        .assert()
        .success();
    assert!(out.join("result.json").is_file());
}

#[test]
fn binary_declares_the_workspace_msrv() {
    assert_eq!(env!("CARGO_PKG_RUST_VERSION"), "1.77");
}
