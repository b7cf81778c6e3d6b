//! Severity classification
//!
//! Pure functions of extracted metrics plus thresholds. Every rule can
//! only raise the running severity, so each classifier is a `max` fold
//! over the individual signals.

use crate::models::{CpuReading, DiskEntry, Severity, Thresholds};

/// Cluster states that are an error regardless of thresholds
const BAD_CLUSTER_STATES: [&str; 4] = ["down", "problem", "error", "unknown"];

/// Two-threshold rule shared by CPU, memory and disk checks
pub fn from_percent(value: f64, thresholds: &Thresholds) -> Severity {
    if value >= thresholds.error as f64 {
        Severity::Error
    } else if value >= thresholds.warning as f64 {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// Overall severity for the Linux host agent
pub fn host_severity(
    cpu_usage: f64,
    memory_usage: f64,
    disks: &[DiskEntry],
    problem_services: &[String],
    thresholds: &Thresholds,
) -> Severity {
    let disk_severity = disks
        .iter()
        .map(|d| from_percent(d.used_percent, thresholds))
        .max()
        .unwrap_or(Severity::Ok);
    let service_severity = if problem_services.is_empty() {
        Severity::Ok
    } else {
        Severity::Error
    };

    from_percent(cpu_usage, thresholds)
        .max(from_percent(memory_usage, thresholds))
        .max(disk_severity)
        .max(service_severity)
}

/// Overall severity for the appliance agent.
///
/// Takes the union of all appliance signals; both the average and the
/// max per-core usage are held to the thresholds.
pub fn appliance_severity(
    cpu: &CpuReading,
    memory_usage: f64,
    cluster_state: &str,
    device_errors: &[String],
    heavy_connections: &[String],
    thresholds: &Thresholds,
) -> Severity {
    let state = cluster_state.to_lowercase();
    let state_severity = if BAD_CLUSTER_STATES.contains(&state.as_str()) {
        Severity::Error
    } else {
        Severity::Ok
    };
    let error_severity = if device_errors.is_empty() && heavy_connections.is_empty() {
        Severity::Ok
    } else {
        Severity::Error
    };

    from_percent(cpu.average, thresholds)
        .max(from_percent(cpu.max, thresholds))
        .max(from_percent(memory_usage, thresholds))
        .max(state_severity)
        .max(error_severity)
}

/// Status string and severity for one cluster workload, from its
/// desired and current replica counts
pub fn workload_status(desired: i64, current: i64) -> (&'static str, Severity) {
    if desired > 0 {
        if current >= desired {
            ("Running", Severity::Ok)
        } else if current == 0 {
            ("Down", Severity::Error)
        } else {
            ("Degraded", Severity::Warning)
        }
    } else {
        // Scaled down intentionally, still worth surfacing
        ("ScaledDown", Severity::Warning)
    }
}
