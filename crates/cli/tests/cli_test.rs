//! End-to-end CLI tests over the in-memory database

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const MAPPING: &str = r#"{
    "key_column": "name",
    "node_kind": "Person",
    "references": [
        {"column": "company", "relation": "WORKS_AT", "target_kind": "Organization"}
    ]
}"#;

#[test]
fn test_csv_ingest_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("people.csv");
    fs::write(&csv, "name,company,age\nBob,Acme,41\nAlice,Acme,30\n").unwrap();
    let mapping = dir.path().join("mapping.json");
    fs::write(&mapping, MAPPING).unwrap();

    Command::cargo_bin("textgraph")
        .unwrap()
        .arg("--memory")
        .arg("ingest")
        .arg(&csv)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 nodes"))
        .stdout(predicate::str::contains("2 edges"));
}

#[test]
fn test_null_property_warns_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("people.csv");
    fs::write(&csv, "name,company,nickname\nBob,Acme,\n").unwrap();
    let mapping = dir.path().join("mapping.json");
    fs::write(&mapping, MAPPING).unwrap();

    Command::cargo_bin("textgraph")
        .unwrap()
        .arg("--memory")
        .arg("ingest")
        .arg(&csv)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .success()
        .stdout(predicate::str::contains("Coercion warnings: 1"));
}

#[test]
fn test_tabular_ingest_requires_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("people.csv");
    fs::write(&csv, "name\nBob\n").unwrap();

    Command::cargo_bin("textgraph")
        .unwrap()
        .arg("--memory")
        .arg("ingest")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--mapping"));
}

#[test]
fn test_bad_mapping_aborts_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("people.csv");
    fs::write(&csv, "name\nBob\n").unwrap();
    let mapping = dir.path().join("mapping.json");
    fs::write(&mapping, MAPPING).unwrap();

    // Mapping references a 'company' column the file does not have.
    Command::cargo_bin("textgraph")
        .unwrap()
        .arg("--memory")
        .arg("ingest")
        .arg(&csv)
        .arg("--mapping")
        .arg(&mapping)
        .assert()
        .failure()
        .stderr(predicate::str::contains("company"));
}

#[test]
fn test_unsupported_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.xml");
    fs::write(&file, "<data/>").unwrap();

    Command::cargo_bin("textgraph")
        .unwrap()
        .arg("--memory")
        .arg("ingest")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}
