//! End-to-end tests of the `sigcap` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn sigcap() -> Command {
    Command::cargo_bin("sigcap").expect("binary builds")
}

fn write_capture(dir: &Path) {
    let records = serde_json::json!([
        {"deviceName": "alpha", "opName": "Verizon", "num": 20,
         "datetimeIso": "2021-05-13T16:07:14.467-0500"},
        {"deviceName": "beta", "opName": "AT&T", "num": 50,
         "datetimeIso": "2021-05-14T10:00:00.000-0500"},
    ]);
    fs::write(dir.join("capture.json"), records.to_string()).unwrap();
}

#[test]
fn filter_matches_inline_spec() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());

    sigcap()
        .arg("filter")
        .arg(dir.path())
        .arg("--filter")
        .arg(r#"{"num": "<33"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta").not())
        .stdout(predicate::str::contains("1 record(s) matched"));
}

#[test]
fn filter_reverse_prints_complement() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());

    sigcap()
        .arg("filter")
        .arg(dir.path())
        .arg("--filter")
        .arg(r#"{"num": "<33"}"#)
        .arg("--reverse")
        .assert()
        .success()
        .stdout(predicate::str::contains("beta"))
        .stdout(predicate::str::contains("alpha").not());
}

#[test]
fn filter_accepts_spec_file() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());
    let filter_path = dir.path().join("by-operator.flt");
    fs::write(&filter_path, r#"{"opName": "Verizon"}"#).unwrap();

    sigcap()
        .arg("filter")
        .arg(dir.path())
        .arg("--filter")
        .arg(&filter_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"));
}

#[test]
fn filter_json_output_prints_records() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());

    sigcap()
        .arg("--output")
        .arg("json")
        .arg("filter")
        .arg(dir.path())
        .arg("--filter")
        .arg(r#"{"num": 20}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""deviceName":"alpha""#));
}

#[test]
fn filter_rejects_malformed_spec_json() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());

    sigcap()
        .arg("filter")
        .arg(dir.path())
        .arg("--filter")
        .arg("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid filter JSON"));
}

#[test]
fn filter_rejects_boolean_spec() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());

    sigcap()
        .arg("filter")
        .arg(dir.path())
        .arg("--filter")
        .arg("true")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid filter specification"));
}

#[test]
fn export_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());
    let out = dir.path().join("out.csv");

    sigcap()
        .arg("export")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 2 row(s)"));

    let contents = fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("sigcap_version,"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn export_applies_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path());
    let out = dir.path().join("out.csv");

    sigcap()
        .arg("export")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .arg("--filter")
        .arg(r#"{"opName": "AT&T"}"#)
        .arg("--quiet")
        .assert()
        .success();

    let contents = fs::read_to_string(&out).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("AT&T"));
    assert!(!contents.contains("Verizon"));
}

#[test]
fn missing_input_dir_fails_with_context() {
    sigcap()
        .arg("filter")
        .arg("/nonexistent-sigcap-dir")
        .arg("--filter")
        .arg(r#"{"num": 1}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
