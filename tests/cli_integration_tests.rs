//! CLI Integration Tests
//!
//! Runs the `pharmacy-sheets` binary with assert_cmd.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use pharmacy_sheets::excel::Workbook;
use pharmacy_sheets::types::{CellAddress, CellValue};
use predicates::prelude::*;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::PathBuf;
use tempfile::TempDir;

fn template(dir: &TempDir) -> PathBuf {
    let mut book = XlsxWorkbook::new();
    let sheet = book.add_worksheet();
    sheet.set_name("Survey").unwrap();
    sheet.write_string(1, 1, "@phone").unwrap();
    sheet.write_string(2, 1, "@city").unwrap();
    sheet.write_string(4, 2, "10+").unwrap();
    let path = dir.path().join("survey.xlsx");
    book.save(&path).unwrap();
    path
}

fn records(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("labels"))
        .stdout(predicate::str::contains("fill"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pharmacy-sheets"));
}

#[test]
fn test_fill_help_mentions_markers() {
    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.args(["fill", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--markers"));
}

#[test]
fn test_server_help() {
    let mut cmd = Command::cargo_bin("pharmacy-server").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/excel/upload"));
}

// ═══════════════════════════════════════════════════════════════════════════
// LABELS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_labels_lists_fields() {
    let dir = TempDir::new().unwrap();
    let path = template(&dir);

    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("labels")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Survey"))
        .stdout(predicate::str::contains("B2"))
        .stdout(predicate::str::contains("phone"))
        .stdout(predicate::str::contains("city"));
}

#[test]
fn test_labels_missing_file_fails() {
    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.args(["labels", "/nonexistent/survey.xlsx"])
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// FILL
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fill_from_json() {
    let dir = TempDir::new().unwrap();
    let input = template(&dir);
    let data = records(
        &dir,
        "pharmacies.json",
        r#"[{"_id": "abc", "phone": "063-030-1943", "city": "Kyiv", "experience": "10+"}]"#,
    );
    let output = dir.path().join("filled.xlsx");

    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("fill")
        .arg(&input)
        .arg("--records")
        .arg(&data)
        .args(["--markers", "experience,position"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fill Complete"));

    let book = Workbook::from_bytes(&std::fs::read(&output).unwrap()).unwrap();
    let sheet = &book.sheets()[0];
    let at = |a1: &str| CellAddress::parse(a1).unwrap();
    assert_eq!(
        sheet.get(at("B3")),
        Some(&CellValue::String("Kyiv".to_string()))
    );
    assert_eq!(
        sheet.get(at("B5")),
        Some(&CellValue::String("1".to_string()))
    );
}

#[test]
fn test_fill_from_yaml_verbose() {
    let dir = TempDir::new().unwrap();
    let input = template(&dir);
    let data = records(&dir, "pharmacies.yaml", "- phone: \"111\"\n");
    let output = dir.path().join("filled.xlsx");

    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("fill")
        .arg(&input)
        .args(["-r"])
        .arg(&data)
        .arg("-o")
        .arg(&output)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 record(s) loaded"));

    assert!(output.exists());
}

#[test]
fn test_fill_with_no_records_fails() {
    let dir = TempDir::new().unwrap();
    let input = template(&dir);
    let data = records(&dir, "empty.json", "[]");
    let output = dir.path().join("filled.xlsx");

    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("fill")
        .arg(&input)
        .arg("--records")
        .arg(&data)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("NoData"));

    assert!(!output.exists());
}

#[test]
fn test_fill_requires_output() {
    let dir = TempDir::new().unwrap();
    let input = template(&dir);
    let data = records(&dir, "pharmacies.json", r#"[{"phone": "1"}]"#);

    let mut cmd = Command::cargo_bin("pharmacy-sheets").unwrap();
    cmd.arg("fill")
        .arg(&input)
        .arg("--records")
        .arg(&data)
        .assert()
        .failure();
}
