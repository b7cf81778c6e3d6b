//! OpenShift cluster extractors
//!
//! Shells out to `oc get <kind> --all-namespaces -o json` and turns
//! each workload object into an independently classified
//! [`ClusterResource`]. An unavailable `oc` or undecodable output
//! yields an empty list, never an error.

use crate::models::{ClusterResource, WorkloadKind};
use crate::probe::Probe;
use crate::severity::workload_status;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Collector for the cluster agent
pub struct OcpCollector {
    probe: Arc<dyn Probe>,
}

impl OcpCollector {
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self { probe }
    }

    /// Collector over canned `oc get` fixtures
    pub fn mock() -> Self {
        Self {
            probe: Arc::new(crate::mock::ocp_probe()),
        }
    }

    /// All workload objects of one kind, each with its status verdict
    pub async fn workloads(&self, kind: WorkloadKind) -> Vec<ClusterResource> {
        let output = self
            .probe
            .run(&["oc", "get", kind.plural(), "--all-namespaces", "-o", "json"])
            .await;
        if output.is_empty() {
            warn!(kind = kind.plural(), "oc produced no output");
            return Vec::new();
        }
        Self::parse_workloads(kind, &output)
    }

    /// Parse one `oc get -o json` document into classified resources
    pub fn parse_workloads(kind: WorkloadKind, json_text: &str) -> Vec<ClusterResource> {
        let data: Value = match serde_json::from_str(json_text) {
            Ok(data) => data,
            Err(e) => {
                warn!(kind = kind.plural(), error = %e, "Could not decode oc output");
                return Vec::new();
            }
        };

        let Some(items) = data["items"].as_array() else {
            return Vec::new();
        };

        items
            .iter()
            .map(|item| {
                let metadata = &item["metadata"];
                let name = metadata["name"].as_str().unwrap_or_default().to_string();
                let namespace = metadata["namespace"].as_str().unwrap_or_default().to_string();
                let created_at = metadata["creationTimestamp"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();

                let (desired, current) = replica_counts(kind, &item["spec"], &item["status"]);
                let (status, severity) = workload_status(desired, current);

                ClusterResource {
                    id: name.clone(),
                    name,
                    namespace,
                    status: status.to_string(),
                    severity,
                    cluster_created_at: created_at,
                    replicas: format!("{}/{}", current, desired),
                }
            })
            .collect()
    }
}

/// Desired and current replica counts for one workload object.
///
/// Each kind reports readiness through a different status field;
/// absent spec replicas default to 1 for the replica-managed kinds.
pub fn replica_counts(kind: WorkloadKind, spec: &Value, status: &Value) -> (i64, i64) {
    match kind {
        WorkloadKind::Deployment => (
            spec["replicas"].as_i64().unwrap_or(1),
            status["availableReplicas"].as_i64().unwrap_or(0),
        ),
        WorkloadKind::StatefulSet => (
            spec["replicas"].as_i64().unwrap_or(1),
            status["readyReplicas"].as_i64().unwrap_or(0),
        ),
        WorkloadKind::DaemonSet => (
            status["desiredNumberScheduled"].as_i64().unwrap_or(0),
            status["numberReady"].as_i64().unwrap_or(0),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use crate::models::Severity;

    #[test]
    fn test_deployment_down() {
        let json = r#"{
            "items": [{
                "metadata": {"name": "api", "namespace": "prod", "creationTimestamp": "2025-04-01T00:00:00Z"},
                "spec": {"replicas": 3},
                "status": {"availableReplicas": 0}
            }]
        }"#;
        let resources = OcpCollector::parse_workloads(WorkloadKind::Deployment, json);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].status, "Down");
        assert_eq!(resources[0].severity, Severity::Error);
        assert_eq!(resources[0].replicas, "0/3");
    }

    #[test]
    fn test_daemonset_scaled_down() {
        let resources = OcpCollector::parse_workloads(WorkloadKind::DaemonSet, mock::OCP_DAEMONSETS);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].status, "ScaledDown");
        assert_eq!(resources[0].severity, Severity::Warning);
        assert_eq!(resources[0].replicas, "0/0");
    }

    #[test]
    fn test_deployment_fixture_mix() {
        let resources =
            OcpCollector::parse_workloads(WorkloadKind::Deployment, mock::OCP_DEPLOYMENTS);
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].status, "Running");
        assert_eq!(resources[0].severity, Severity::Ok);
        assert_eq!(resources[1].status, "Degraded");
        assert_eq!(resources[1].severity, Severity::Warning);
        assert_eq!(resources[1].replicas, "1/2");
    }

    #[test]
    fn test_statefulset_uses_ready_replicas() {
        let resources =
            OcpCollector::parse_workloads(WorkloadKind::StatefulSet, mock::OCP_STATEFULSETS);
        assert_eq!(resources[0].status, "Down");
        assert_eq!(resources[0].replicas, "0/1");
    }

    #[test]
    fn test_deployment_missing_spec_replicas_defaults_to_one() {
        let json = r#"{
            "items": [{
                "metadata": {"name": "solo", "namespace": "prod", "creationTimestamp": ""},
                "spec": {},
                "status": {"availableReplicas": 1}
            }]
        }"#;
        let resources = OcpCollector::parse_workloads(WorkloadKind::Deployment, json);
        assert_eq!(resources[0].status, "Running");
        assert_eq!(resources[0].replicas, "1/1");
    }

    #[test]
    fn test_undecodable_output_yields_empty() {
        assert!(OcpCollector::parse_workloads(WorkloadKind::Deployment, "not json").is_empty());
        assert!(OcpCollector::parse_workloads(WorkloadKind::Deployment, "{}").is_empty());
    }

    #[tokio::test]
    async fn test_mock_collector_lists_all_kinds() {
        let collector = OcpCollector::mock();
        assert_eq!(collector.workloads(WorkloadKind::Deployment).await.len(), 2);
        assert_eq!(collector.workloads(WorkloadKind::StatefulSet).await.len(), 1);
        assert_eq!(collector.workloads(WorkloadKind::DaemonSet).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_oc_yields_empty() {
        let collector = OcpCollector::new(Arc::new(crate::probe::MockProbe::new()));
        assert!(collector.workloads(WorkloadKind::Deployment).await.is_empty());
    }
}
