//! Payload builders
//!
//! Deterministic, side-effect-free assembly of the wire envelope from
//! extracted metrics, a severity verdict and the caller-supplied
//! project/system labels. The formatting here is a backend contract;
//! change nothing without checking the dashboard side.

use crate::models::{ClusterResource, CpuReading, DiskEntry, MemoryReading, Report, Severity};
use serde_json::{json, Map, Value};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Render a percentage value the way the backend expects: at most two
/// decimals, trailing zeros trimmed, but always at least one decimal
/// (`12.35`, `12.5`, `10.0`).
pub fn fmt_percent(value: f64) -> String {
    let mut s = format!("{:.2}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

/// `mount (percent%)` comma-joined, or the literal used for no disks
pub fn format_disks(disks: &[DiskEntry]) -> String {
    if disks.is_empty() {
        return "No disks found".to_string();
    }
    disks
        .iter()
        .map(|d| format!("{} ({}%)", d.mount_point, fmt_percent(d.used_percent)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Down: a, b` or the all-clear literal
pub fn format_services(problem_services: &[String]) -> String {
    if problem_services.is_empty() {
        "All Enabled Services Running".to_string()
    } else {
        format!("Down: {}", problem_services.join(", "))
    }
}

/// Comma-joined device errors or `No Errors`
pub fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        "No Errors".to_string()
    } else {
        errors.join(", ")
    }
}

/// `<n> found` or `None`
pub fn format_heavy_connections(connections: &[String]) -> String {
    if connections.is_empty() {
        "None".to_string()
    } else {
        format!("{} found", connections.len())
    }
}

/// `Free: {gigabytes:.3f}GB ({percent:.3f}%)`, 1024-based GiB
pub fn format_free_memory(memory: &MemoryReading) -> String {
    let free_gb = memory.free_bytes as f64 / GIB;
    let free_percent = if memory.total_bytes > 0 {
        memory.free_bytes as f64 / memory.total_bytes as f64 * 100.0
    } else {
        0.0
    };
    format!("Free: {:.3}GB ({:.3}%)", free_gb, free_percent)
}

/// Average usage with the heavy-core list appended when non-empty
pub fn format_appliance_cpu(cpu: &CpuReading) -> String {
    let mut s = format!("{}%", fmt_percent(cpu.average));
    if !cpu.heavy_cpus.is_empty() {
        s.push_str(&format!(" (Heavy: {})", cpu.heavy_cpus.join(", ")));
    }
    s
}

/// Resolve the reporting identifier for this host.
///
/// Environment wins so containerized runs can inject a stable name;
/// otherwise /etc/hostname; otherwise the per-agent fallback constant.
pub fn hostname(fallback: &str) -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        let name = name.trim().to_string();
        if !name.is_empty() {
            return name;
        }
    }
    if let Ok(content) = std::fs::read_to_string("/etc/hostname") {
        let name = content.trim().to_string();
        if !name.is_empty() {
            return name;
        }
    }
    fallback.to_string()
}

/// Envelope for the Linux host agent
#[allow(clippy::too_many_arguments)]
pub fn host_report(
    project_name: &str,
    system_name: &str,
    identifier: &str,
    cpu_usage: f64,
    memory_usage: f64,
    disks: &[DiskEntry],
    problem_services: &[String],
    severity: Severity,
) -> Report {
    let mut payload = Map::new();
    payload.insert("Id".to_string(), json!(identifier));
    payload.insert("Name".to_string(), json!(identifier));
    payload.insert("CPU".to_string(), json!(format!("{}%", fmt_percent(cpu_usage))));
    payload.insert(
        "Memory".to_string(),
        json!(format!("{}%", fmt_percent(memory_usage))),
    );
    payload.insert("Disks".to_string(), json!(format_disks(disks)));
    payload.insert("Services".to_string(), json!(format_services(problem_services)));
    payload.insert("Severity".to_string(), json!(severity));

    Report {
        project_name: project_name.to_string(),
        system_name: system_name.to_string(),
        payload: Value::Object(payload),
    }
}

/// Envelope for the appliance agent
#[allow(clippy::too_many_arguments)]
pub fn appliance_report(
    project_name: &str,
    system_name: &str,
    identifier: &str,
    cpu: &CpuReading,
    memory: &MemoryReading,
    cluster_state: &str,
    errors: &[String],
    heavy_connections: &[String],
    severity: Severity,
) -> Report {
    let mut payload = Map::new();
    payload.insert("Id".to_string(), json!(identifier));
    payload.insert("Name".to_string(), json!(identifier));
    payload.insert("CPU".to_string(), json!(format_appliance_cpu(cpu)));
    payload.insert("Memory".to_string(), json!(format_free_memory(memory)));
    payload.insert("Cluster State".to_string(), json!(cluster_state));
    payload.insert("Errors".to_string(), json!(format_errors(errors)));
    payload.insert(
        "Heavy Connections".to_string(),
        json!(format_heavy_connections(heavy_connections)),
    );
    payload.insert("Severity".to_string(), json!(severity));

    Report {
        project_name: project_name.to_string(),
        system_name: system_name.to_string(),
        payload: Value::Object(payload),
    }
}

/// Envelope for one cluster resource.
///
/// The backend's upsert endpoint expects the cluster payload as a JSON
/// string, not a nested object; serialization cannot fail for this
/// struct so the error path collapses to an empty string.
pub fn cluster_report(project_name: &str, system_name: &str, resource: &ClusterResource) -> Report {
    Report {
        project_name: project_name.to_string(),
        system_name: system_name.to_string(),
        payload: Value::String(serde_json::to_string(resource).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_percent() {
        assert_eq!(fmt_percent(12.345), "12.35");
        assert_eq!(fmt_percent(12.5), "12.5");
        assert_eq!(fmt_percent(10.0), "10.0");
        assert_eq!(fmt_percent(0.0), "0.0");
        assert_eq!(fmt_percent(100.0), "100.0");
    }

    #[test]
    fn test_format_disks() {
        assert_eq!(format_disks(&[]), "No disks found");
        let disks = vec![
            DiskEntry {
                device: "/dev/sda2".to_string(),
                mount_point: "/".to_string(),
                used_percent: 56.0,
            },
            DiskEntry {
                device: "/dev/sdb1".to_string(),
                mount_point: "/data".to_string(),
                used_percent: 95.0,
            },
        ];
        assert_eq!(format_disks(&disks), "/ (56.0%), /data (95.0%)");
    }

    #[test]
    fn test_format_services() {
        assert_eq!(format_services(&[]), "All Enabled Services Running");
        let down = vec!["nginx.service".to_string(), "cron.service".to_string()];
        assert_eq!(format_services(&down), "Down: nginx.service, cron.service");
    }

    #[test]
    fn test_format_errors_and_heavy_connections() {
        assert_eq!(format_errors(&[]), "No Errors");
        assert_eq!(
            format_errors(&["Filter: DOWN".to_string()]),
            "Filter: DOWN"
        );
        assert_eq!(format_heavy_connections(&[]), "None");
        assert_eq!(
            format_heavy_connections(&["a".to_string(), "b".to_string(), "c".to_string()]),
            "3 found"
        );
    }

    #[test]
    fn test_format_free_memory() {
        let memory = MemoryReading {
            used_percent: 55.11,
            total_bytes: 5977120768,
            free_bytes: 2683285504,
        };
        assert_eq!(format_free_memory(&memory), "Free: 2.499GB (44.893%)");
    }

    #[test]
    fn test_format_free_memory_zero_total() {
        let memory = MemoryReading::default();
        assert_eq!(format_free_memory(&memory), "Free: 0.000GB (0.000%)");
    }

    #[test]
    fn test_format_appliance_cpu_with_heavy_list() {
        let cpu = CpuReading {
            average: 25.0,
            max: 90.0,
            heavy_cpus: vec!["CPU4: 90.0%".to_string()],
        };
        assert_eq!(format_appliance_cpu(&cpu), "25.0% (Heavy: CPU4: 90.0%)");

        let quiet = CpuReading {
            average: 12.5,
            max: 20.0,
            heavy_cpus: vec![],
        };
        assert_eq!(format_appliance_cpu(&quiet), "12.5%");
    }

    #[test]
    fn test_host_report_shape_and_field_order() {
        let report = host_report(
            "Servers",
            "Monitoring",
            "web01",
            10.0,
            10.0,
            &[],
            &[],
            Severity::Ok,
        );
        let json = serde_json::to_string(&report).unwrap();
        // preserve_order keeps the payload fields in insertion order
        assert!(json.starts_with(r#"{"projectName":"Servers","systemName":"Monitoring","payload":{"Id":"web01","Name":"web01","CPU":"10.0%""#));
        assert!(json.contains(r#""Services":"All Enabled Services Running""#));
        assert!(json.contains(r#""Severity":"ok""#));
        assert!(json.contains(r#""Disks":"No disks found""#));
    }

    #[test]
    fn test_appliance_report_shape() {
        let cpu = CpuReading {
            average: 25.0,
            max: 90.0,
            heavy_cpus: vec!["CPU4: 90.0%".to_string()],
        };
        let memory = MemoryReading {
            used_percent: 55.11,
            total_bytes: 5977120768,
            free_bytes: 2683285504,
        };
        let report = appliance_report(
            "Firewalls",
            "Checkpoint",
            "fw01",
            &cpu,
            &memory,
            "Active",
            &[],
            &[],
            Severity::Warning,
        );
        let payload = report.payload.as_object().unwrap();
        assert_eq!(payload["CPU"], "25.0% (Heavy: CPU4: 90.0%)");
        assert_eq!(payload["Memory"], "Free: 2.499GB (44.893%)");
        assert_eq!(payload["Cluster State"], "Active");
        assert_eq!(payload["Errors"], "No Errors");
        assert_eq!(payload["Heavy Connections"], "None");
        assert_eq!(payload["Severity"], "warning");
    }

    #[test]
    fn test_cluster_report_payload_is_json_string() {
        let resource = ClusterResource {
            id: "web".to_string(),
            name: "web".to_string(),
            namespace: "prod".to_string(),
            status: "Running".to_string(),
            severity: Severity::Ok,
            cluster_created_at: "2025-01-01T00:00:00Z".to_string(),
            replicas: "3/3".to_string(),
        };
        let report = cluster_report("Deployments", "OpenShift", &resource);
        let payload_str = report.payload.as_str().unwrap();
        let decoded: serde_json::Value = serde_json::from_str(payload_str).unwrap();
        assert_eq!(decoded["Id"], "web");
        assert_eq!(decoded["Severity"], "ok");
    }
}
