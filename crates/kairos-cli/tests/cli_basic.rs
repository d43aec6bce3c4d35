//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "kairos-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_optimize_demo() {
    let (stdout, _stderr, code) = run_cli(&["optimize", "demo", "--seed", "42"]);
    assert_eq!(code, 0, "optimize demo failed");
    assert!(stdout.contains("Fitness score:"));
    assert!(stdout.contains("Tasks scheduled:"));
}

#[test]
fn test_optimize_demo_json() {
    let (stdout, _stderr, code) = run_cli(&["optimize", "demo", "--seed", "42", "--json"]);
    assert_eq!(code, 0, "optimize demo --json failed");

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("demo --json must emit valid JSON");
    assert!(parsed["result"]["schedule"].is_array());
    assert!(parsed["result"]["stats"]["fitness_history"].is_array());
    assert!(parsed["summary"]["scheduled_count"].is_number());
}

#[test]
fn test_optimize_demo_counts() {
    let (stdout, _stderr, code) = run_cli(&["optimize", "demo", "--seed", "7", "--json"]);
    assert_eq!(code, 0);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["result"]["stats"]["total_tasks"], 3);
    assert_eq!(
        parsed["result"]["stats"]["fitness_history"]
            .as_array()
            .unwrap()
            .len(),
        100
    );
}

#[test]
fn test_optimize_run_rejects_missing_file() {
    let (_stdout, stderr, code) = run_cli(&["optimize", "run", "/nonexistent/request.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_energy_show() {
    let (stdout, _stderr, code) = run_cli(&["energy", "show"]);
    assert_eq!(code, 0, "energy show failed");
    assert!(stdout.contains("Daily Energy Curve"));
    assert!(stdout.contains("10:00"));
}

#[test]
fn test_energy_peaks() {
    let (stdout, _stderr, code) = run_cli(&["energy", "peaks", "--threshold", "0.9"]);
    assert_eq!(code, 0, "energy peaks failed");
    assert!(stdout.contains("10:00"));
}
