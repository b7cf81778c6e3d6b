//! Core data models shared by all agent variants

use serde::{Deserialize, Serialize};

/// Ordinal severity verdict for a run.
///
/// The derive order gives `Ok < Warning < Error`, so combining signals
/// is a plain `max` fold: severity only ever ratchets upward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Error,
}

impl Severity {
    /// Wire form, matching the serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning/error percentage thresholds.
///
/// Invariant: `warning <= error <= 100`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning: u8,
    pub error: u8,
}

impl Thresholds {
    pub fn new(warning: u8, error: u8) -> anyhow::Result<Self> {
        if warning > error {
            anyhow::bail!(
                "warning threshold ({}) must not exceed error threshold ({})",
                warning,
                error
            );
        }
        if error > 100 {
            anyhow::bail!("error threshold ({}) must not exceed 100", error);
        }
        Ok(Self { warning, error })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 85,
            error: 95,
        }
    }
}

/// One mounted, non-virtual filesystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskEntry {
    pub device: String,
    pub mount_point: String,
    pub used_percent: f64,
}

/// Per-core CPU reading from the appliance agent.
///
/// Average drives the primary threshold check, but max is checked too:
/// one saturated core must be flagged even when the average is low.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuReading {
    pub average: f64,
    pub max: f64,
    /// `CPU{id}: {usage}%` entries for cores at or above the warning threshold
    pub heavy_cpus: Vec<String>,
}

/// Memory reading with raw byte counts for the free-memory summary
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryReading {
    pub used_percent: f64,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Wire envelope posted to the monitoring backend.
///
/// Serializes as `{"projectName": ..., "systemName": ..., "payload": ...}`;
/// the payload value is built by [`crate::payload`] and is already in its
/// final wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub project_name: String,
    pub system_name: String,
    pub payload: serde_json::Value,
}

/// One classified cluster workload (Deployment/StatefulSet/DaemonSet).
///
/// Field names follow the backend's upsert contract; `Id` doubles as the
/// upsert key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResource {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Severity")]
    pub severity: Severity,
    #[serde(rename = "ClusterCreatedAt")]
    pub cluster_created_at: String,
    #[serde(rename = "Replicas")]
    pub replicas: String,
}

/// Workload kinds the cluster agent monitors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 3] = [
        WorkloadKind::Deployment,
        WorkloadKind::StatefulSet,
        WorkloadKind::DaemonSet,
    ];

    /// Resource name used on the `oc get` command line
    pub fn plural(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "deployments",
            WorkloadKind::StatefulSet => "statefulsets",
            WorkloadKind::DaemonSet => "daemonsets",
        }
    }

    /// Project label used in the posted envelope
    pub fn project_name(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployments",
            WorkloadKind::StatefulSet => "Statefulsets",
            WorkloadKind::DaemonSet => "Daemonsets",
        }
    }
}
