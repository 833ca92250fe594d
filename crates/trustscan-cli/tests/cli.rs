//! Black-box tests for the trustscan binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn trustscan() -> Command {
    Command::cargo_bin("trustscan").unwrap()
}

#[test]
fn no_targets_prints_help_and_fails() {
    trustscan()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag() {
    trustscan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trustscan"));
}

#[test]
fn invalid_domain_is_reported_without_aborting() {
    // Underscores are not valid DNS labels; no network is touched.
    trustscan()
        .arg("not_a_host")
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid domain name"));
}

#[test]
fn malformed_port_is_reported_per_target() {
    trustscan()
        .arg("example.com:notaport")
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid port"));
}

#[test]
fn json_file_is_written_even_when_every_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    trustscan()
        .arg("not_a_host")
        .arg("-O")
        .arg(&path)
        .assert()
        .success();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(doc["generator"].as_str().unwrap().starts_with("trustscan "));
    assert_eq!(doc["targets"][0], "not_a_host");
    assert!(doc["evaluations"].as_array().unwrap().is_empty());
}
