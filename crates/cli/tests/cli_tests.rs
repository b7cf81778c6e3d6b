//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "sysagent-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("status agents"),
        "Should show app description"
    );
    assert!(stdout.contains("linux"), "Should show linux command");
    assert!(
        stdout.contains("checkpoint"),
        "Should show checkpoint command"
    );
    assert!(stdout.contains("ocp"), "Should show ocp command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "sysagent-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("sysagent"), "Should show binary name");
}

/// Test linux subcommand help
#[test]
fn test_linux_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "sysagent-cli", "--", "linux", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Linux help should succeed");
    assert!(
        stdout.contains("--threshold-warning"),
        "Should show warning threshold option"
    );
    assert!(
        stdout.contains("--threshold-error"),
        "Should show error threshold option"
    );
    assert!(
        stdout.contains("--ignore-services"),
        "Should show ignore list option"
    );
    assert!(
        stdout.contains("--check-stopped"),
        "Should show stopped-services option"
    );
}

/// The checkpoint agent in mock mode is fully deterministic: the
/// fixture has one heavy core and one heavy connection from the pinned
/// mock date, so the verdict is always `error`.
#[test]
fn test_checkpoint_mock_json_output() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "sysagent-cli",
            "--",
            "checkpoint",
            "--mock",
            "--json-only",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Mock run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["projectName"], "Firewalls");
    assert_eq!(json["systemName"], "Checkpoint");
    assert_eq!(json["payload"]["Cluster State"], "Active");
    assert_eq!(json["payload"]["Heavy Connections"], "1 found");
    assert_eq!(json["payload"]["Severity"], "error");
}

/// The OCP agent in mock mode with `--json-only` prints one JSON array
/// covering every workload kind instead of posting anywhere.
#[test]
fn test_ocp_mock_json_only_output() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "sysagent-cli",
            "--",
            "ocp",
            "--mock",
            "--json-only",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Mock run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    let reports = json.as_array().expect("Output should be a JSON array");

    // Fixtures: 2 deployments, 1 statefulset, 1 daemonset.
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0]["projectName"], "Deployments");
    assert_eq!(reports[0]["systemName"], "OpenShift");

    // The envelope payload is the serialized resource, not a nested object.
    let payload = reports[0]["payload"]
        .as_str()
        .expect("Payload should be a JSON string");
    let resource: serde_json::Value =
        serde_json::from_str(payload).expect("Payload string should decode");
    assert_eq!(resource["Name"], "frontend");
    assert_eq!(resource["Status"], "Running");

    let statuses: Vec<String> = reports
        .iter()
        .map(|r| {
            let payload = r["payload"].as_str().unwrap();
            serde_json::from_str::<serde_json::Value>(payload).unwrap()["Status"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert!(statuses.iter().any(|s| s == "Degraded"));
    assert!(statuses.iter().any(|s| s == "Down"));
    assert!(statuses.iter().any(|s| s == "ScaledDown"));
}

/// Invalid thresholds are rejected with a non-zero exit
#[test]
fn test_invalid_thresholds_rejected() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "sysagent-cli",
            "--",
            "checkpoint",
            "--mock",
            "--threshold-warning",
            "96",
            "--threshold-error",
            "95",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(
        !output.status.success(),
        "Inverted thresholds should be rejected"
    );
}
