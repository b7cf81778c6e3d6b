//! Canned probe outputs for mock mode and tests
//!
//! These fixtures mirror real tool output closely enough to exercise
//! every parser branch without appliance or cluster access.

use crate::probe::MockProbe;

/// The date baked into [`HEAVY_CONN`]; mock runs pin "today" to this
/// so the heavy-connection filter stays deterministic.
pub const MOCK_TODAY: &str = "17/12/25";

pub const CPU: &str = "CPU Usage: 15%";

pub const MULTI_CPU: &str = "\
Processors load
---------------------------------------------------------------------------------
|CPU#|User Time(%)|System Time(%)|Idle Time(%)|Usage(%)|Run queue|Interrupts/sec|
---------------------------------------------------------------------------------
|   1|           0|             1|          99|       1|        ?|          3715|
|   2|           1|             2|          97|       3|        ?|          3715|
|   3|           2|             4|          94|       6|        ?|          3715|
|   4|          80|            10|          10|      90|        ?|          3715|
---------------------------------------------------------------------------------";

pub const MEMORY: &str = "\
Total Virtual Memory (Bytes):  14564306944
Active Virtual Memory (Bytes): 3293835264
Total Real Memory (Bytes):     5977120768
Active Real Memory (Bytes):    3293835264
Free Real Memory (Bytes):      2683285504
Memory Swaps/Sec:              -
Memory To Disk Transfers/Sec:  -";

pub const CLUSTER_STATE: &str = "\
Cluster Mode:   High Availability (Active Up)

Sync Mode:   Optimized Sync

ID         Unique Address  Assigned Load   State

1 (local)  10.231.149.1    100%            ACTIVE
2          10.231.149.2    0%              STANDBY

Active PNOTEs: None

Last member state change event:
   Event Code:                 CLUS-114904
   State change:               ACTIVE(!) -> ACTIVE
   Reason for state change:    Reason for ACTIVE! alert has been resolved
   Event time:                 Wed Mar 12 01:33:38 2025

Cluster failover count:
   Failover counter:           0
   Time of counter reset:      Wed Mar 12 00:32:50 2025 (reboot)";

pub const DEVICE_LIST: &str = "\
Device Name: Synchronization
State: OK

Device Name: Filter
State: OK";

pub const HEAVY_CONN: &str = "\
[fw_60]; conn: 192.168.1.1:3788 -> 192.168.1.3:8080 IPP 6; Instance load: 68%; Connection instance load 91%; StartTime: 17/12/25 03:18:18; Duration: 3; IdentificationTime: 17/12/25 03:18:19; Seervice: 6:8080; Total Bytes: 1123534;
[fw_60]; conn: 10.0.0.1:1234 -> 10.0.0.2:80 IPP 6; Instance load: 50%; Connection instance load 80%; StartTime: 16/12/25 10:00:00; Duration: 3; IdentificationTime: 16/12/25 10:00:00; Seervice: 6:80; Total Bytes: 5000;";

pub const OCP_DEPLOYMENTS: &str = r#"{
  "items": [
    {
      "metadata": {"name": "frontend", "namespace": "shop", "creationTimestamp": "2025-03-01T08:00:00Z"},
      "spec": {"replicas": 3},
      "status": {"availableReplicas": 3}
    },
    {
      "metadata": {"name": "billing", "namespace": "shop", "creationTimestamp": "2025-03-01T08:05:00Z"},
      "spec": {"replicas": 2},
      "status": {"availableReplicas": 1}
    }
  ]
}"#;

pub const OCP_STATEFULSETS: &str = r#"{
  "items": [
    {
      "metadata": {"name": "postgres", "namespace": "shop", "creationTimestamp": "2025-02-20T12:00:00Z"},
      "spec": {"replicas": 1},
      "status": {"readyReplicas": 0}
    }
  ]
}"#;

pub const OCP_DAEMONSETS: &str = r#"{
  "items": [
    {
      "metadata": {"name": "log-shipper", "namespace": "infra", "creationTimestamp": "2025-01-15T09:30:00Z"},
      "status": {"desiredNumberScheduled": 0, "numberReady": 0}
    }
  ]
}"#;

/// Probe table covering every appliance command
pub fn gaia_probe() -> MockProbe {
    MockProbe::new()
        .with(&["cpstat", "os", "-f", "cpu"], CPU)
        .with(&["cpstat", "os", "-f", "multi_cpu"], MULTI_CPU)
        .with(&["cpstat", "os", "-f", "memory"], MEMORY)
        .with(&["cphaprob", "state"], CLUSTER_STATE)
        .with(&["cphaprob", "list"], DEVICE_LIST)
        .with(&["fw", "ctl", "multik", "print_heavy_conn"], HEAVY_CONN)
}

/// Probe table covering the cluster agent's `oc get` calls
pub fn ocp_probe() -> MockProbe {
    MockProbe::new()
        .with(
            &["oc", "get", "deployments", "--all-namespaces", "-o", "json"],
            OCP_DEPLOYMENTS,
        )
        .with(
            &["oc", "get", "statefulsets", "--all-namespaces", "-o", "json"],
            OCP_STATEFULSETS,
        )
        .with(
            &["oc", "get", "daemonsets", "--all-namespaces", "-o", "json"],
            OCP_DAEMONSETS,
        )
}
