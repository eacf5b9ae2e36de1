//! E2E tests for the kcgt commands

use std::process::{Command, Output};

fn kcgt(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Single general land transfer, default table output
#[test]
fn calculate_general_land() {
    let output = kcgt(&["calculate", "-c", "tests/data/general_land.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("Gain income total"));
    assert!(stdout.contains("₩210,000,000"));
    assert!(stdout.contains("₩207,500,000"));
    assert!(stdout.contains("₩58,910,000"));
    assert!(stdout.contains("₩58,890,000"));
    assert!(stdout.contains("land-1"));
}

/// Mixed assets with a relief, penalty and prior payment
#[test]
fn calculate_mixed_case_total() {
    let output = kcgt(&["calculate", "-c", "tests/data/mixed_case.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    // method A: 700,000,000 × 42% − 35,940,000
    assert!(stdout.contains("₩258,060,000"));
    assert!(stdout.contains("₩252,062,000"));
    assert!(stdout.contains("₩200,000"));
    assert!(stdout.contains("₩252,262,000"));
}

/// Full JSON result
#[test]
fn calculate_json_output() {
    let output = kcgt(&["calculate", "-c", "tests/data/general_land.json", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(json["caseId"], "land-2024");
    assert_eq!(json["rulePackYear"], 2024);
    assert_eq!(json["inputDigest"].as_str().map(str::len), Some(64));
    assert!(json["mainResult"]["line18_taxDue"].is_string() || json["mainResult"]["line18_taxDue"].is_number());
    assert!(json["calculationLog"]
        .as_array()
        .is_some_and(|log| log.iter().any(|e| e["step"] == "CALC-RET-TOTAL")));
}

/// Per-asset CSV rows
#[test]
fn calculate_csv_output() {
    let output = kcgt(&["calculate", "-c", "tests/data/mixed_case.json", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("asset_id"));
    assert!(stdout.contains("gain_income"));
    assert!(stdout.contains("unregistered-1"));
    assert!(stdout.contains("sme-1"));
    assert_eq!(stdout.lines().count(), 4);
}

/// Derivative rows imported from CSV are appended to the case
#[test]
fn calculate_with_derivative_csv() {
    let output = kcgt(&[
        "calculate",
        "-c",
        "tests/data/general_land.json",
        "-d",
        "tests/data/derivatives.csv",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("kospi-1"));
    assert!(stdout.contains("₩275,000,000"));
    assert!(stdout.contains("₩82,640,000"));
}

/// Case read from stdin with "-"
#[test]
fn calculate_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let input = std::fs::read("tests/data/general_land.json").expect("fixture");
    let mut child = Command::new("cargo")
        .args(["run", "--", "calculate", "-c", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&input)
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("land-2024"));
}

/// Unsupported years fail unless fallback is requested
#[test]
fn unsupported_year_needs_opt_in() {
    let output = kcgt(&["calculate", "-c", "tests/data/year_2031.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no rule pack for tax year 2031"));

    let output = kcgt(&[
        "calculate",
        "-c",
        "tests/data/year_2031.json",
        "--allow-year-fallback",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("WARNINGS"));
    assert!(stdout.contains("no rules for tax year 2031"));
}

/// Per-asset detail view
#[test]
fn assets_detail() {
    let output = kcgt(&["assets", "-c", "tests/data/mixed_case.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("Cost Basis"));
    assert!(stdout.contains("1-35 70%"));
    assert!(stdout.contains("30%"));
}

/// Audit log filtered by step prefix
#[test]
fn log_filter_by_step() {
    let output = kcgt(&["log", "-c", "tests/data/general_land.json", "-s", "CALC-RET"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("CALC-RET-040"));
    assert!(stdout.contains("CALC-RET-180"));
    assert!(!stdout.contains("CALC-BP1-100"));
}

/// Clean case validates with exit code 0
#[test]
fn validate_clean_case() {
    let output = kcgt(&["validate", "-c", "tests/data/general_land.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}

/// Duplicate ids are reported and the command exits 1
#[test]
fn validate_reports_issues() {
    let output = kcgt(&["validate", "-c", "tests/data/duplicate_ids.json", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert!(json["issue_count"].as_u64().is_some_and(|n| n >= 1));
    assert!(json["issues"]
        .as_array()
        .is_some_and(|issues| issues.iter().any(|i| i["type"] == "DuplicateAssetId")));
}

/// Derivative CSV header comes from the row field metadata
#[test]
fn schema_derivative_header() {
    let output = kcgt(&["schema", "derivative-csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout.trim(),
        "id,rateCode,productName,transferPrice,necessaryExpense,priorYearCarriedGain,currentYearLoss,carriedLoss,otherDeduction"
    );
}

/// JSON schema of the filing case
#[test]
fn schema_json() {
    let output = kcgt(&["schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(json["title"], "TaxCase");
}

/// Built-in rule pack printed as JSON
#[test]
fn rules_for_year() {
    let output = kcgt(&["rules", "-y", "2024"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(json["year"], 2024);
    assert!(json["brackets"].as_array().is_some_and(|b| b.len() == 8));
}

/// Preliminary and final due dates
#[test]
fn deadline_for_securities() {
    let output = kcgt(&[
        "deadline",
        "--transfer-date",
        "2024-07-01",
        "--kind",
        "securities",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("2025-02-28"));
    assert!(stdout.contains("2025-05-31"));
}
