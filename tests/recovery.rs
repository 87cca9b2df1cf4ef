//! Startup reconciliation as seen through the binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn codedrop(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codedrop").unwrap();
    cmd.env("CODEDROP_HOME", home).env("NO_COLOR", "1");
    cmd
}

fn mapping(home: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(home.join("mappings.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn orphan_file_is_recovered_without_mapping_file() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("1234.txt"), "recovered").unwrap();

    codedrop(home.path())
        .args(["info", "1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file.txt"));

    assert_eq!(mapping(home.path())["1234"], "1234.txt");
}

#[test]
fn stale_entry_is_pruned() {
    let home = tempfile::tempdir().unwrap();
    fs::write(
        home.path().join("mappings.json"),
        r#"{"5555": "5555.txt", "0001": "0001.pdf"}"#,
    )
    .unwrap();
    fs::write(home.path().join("0001.pdf"), "%PDF").unwrap();

    codedrop(home.path())
        .args(["info", "5555"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found for code: 5555"));

    let saved = mapping(home.path());
    assert!(saved.get("5555").is_none());
    assert_eq!(saved["0001"], "0001.pdf");
}

#[test]
fn corrupt_mapping_file_is_rebuilt_from_directory() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("mappings.json"), "{ not json").unwrap();
    fs::write(home.path().join("0420.log"), "line").unwrap();

    codedrop(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0420"));

    assert_eq!(mapping(home.path())["0420"], "0420.log");
}

#[test]
fn files_without_code_prefix_are_left_alone() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("readme.txt"), "not an upload").unwrap();
    fs::write(home.path().join("12.txt"), "too short").unwrap();

    codedrop(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files stored."));

    assert_eq!(mapping(home.path()), serde_json::json!({}));
    assert!(home.path().join("readme.txt").exists());
}

#[test]
fn doctor_reports_repairs() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("mappings.json"), r#"{"7777": "7777.zip"}"#).unwrap();
    fs::write(home.path().join("0002.txt"), "x").unwrap();
    fs::write(home.path().join(".upload-abc.tmp"), "partial").unwrap();

    codedrop(home.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 code(s)"))
        .stdout(predicate::str::contains("Recovered 1 file(s)"))
        .stdout(predicate::str::contains("Cleaned up 1 leftover temp file(s)"));

    assert!(!home.path().join(".upload-abc.tmp").exists());

    codedrop(home.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("No inconsistencies found"));
}
