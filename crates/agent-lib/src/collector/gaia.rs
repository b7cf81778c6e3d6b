//! Checkpoint Gaia appliance extractors
//!
//! Wraps `cpstat`, `cphaprob` and `fw ctl multik` output. Each metric
//! has an ordered fallback chain of format variants; the final
//! fallback is always a zero/empty value.

use crate::models::{CpuReading, MemoryReading};
use crate::payload::fmt_percent;
use crate::probe::Probe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Collector for the Checkpoint appliance agent
pub struct GaiaCollector {
    probe: Arc<dyn Probe>,
    /// Gaia is Linux underneath; /proc/stat is the CPU fallback of
    /// last resort. `None` disables it (mock mode).
    proc_root: Option<PathBuf>,
}

impl GaiaCollector {
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self {
            probe,
            proc_root: Some(PathBuf::from("/proc")),
        }
    }

    /// Collector over the canned fixture outputs, with the /proc
    /// fallback disabled so results are deterministic
    pub fn mock() -> Self {
        Self {
            probe: Arc::new(crate::mock::gaia_probe()),
            proc_root: None,
        }
    }

    /// Per-core CPU reading.
    ///
    /// Tries the `multi_cpu` table, then the single aggregate line,
    /// then the two-snapshot /proc/stat computation.
    pub async fn cpu_usage(&self, warning_threshold: u8) -> CpuReading {
        let output = self.probe.run(&["cpstat", "os", "-f", "multi_cpu"]).await;
        if let Some(reading) = Self::parse_multi_cpu(&output, warning_threshold) {
            return reading;
        }

        let output = self.probe.run(&["cpstat", "os", "-f", "cpu"]).await;
        if let Some(usage) = Self::parse_single_cpu(&output) {
            return single_core_reading("CPU", usage, warning_threshold);
        }

        if let Some(proc_root) = &self.proc_root {
            if let Some(usage) = super::proc_stat_usage(proc_root).await {
                return single_core_reading("CPU", usage, warning_threshold);
            }
        }

        warn!("All CPU probes failed, reporting zero usage");
        CpuReading::default()
    }

    /// Parse the fixed-width `multi_cpu` table:
    /// `|CPU#|User|System|Idle|Usage|RunQueue|Interrupts|`.
    /// Rows not starting with the column delimiter and the header row
    /// are skipped; returns `None` when no data row parses.
    pub fn parse_multi_cpu(output: &str, warning_threshold: u8) -> Option<CpuReading> {
        let mut usages = Vec::new();
        let mut heavy_cpus = Vec::new();

        for line in output.lines() {
            let line = line.trim();
            if !line.starts_with('|') || line.contains("CPU#") {
                continue;
            }
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() < 6 {
                continue;
            }
            let cpu_id = parts[1].trim();
            let Ok(usage) = parts[5].trim().parse::<f64>() else {
                continue;
            };
            usages.push(usage);
            if usage >= warning_threshold as f64 {
                heavy_cpus.push(format!("CPU{}: {}%", cpu_id, fmt_percent(usage)));
            }
        }

        if usages.is_empty() {
            return None;
        }
        let average = super::round2(usages.iter().sum::<f64>() / usages.len() as f64);
        let max = usages.iter().cloned().fold(f64::MIN, f64::max);
        Some(CpuReading {
            average,
            max,
            heavy_cpus,
        })
    }

    /// Extract the integer after `CPU Usage:` from the aggregate variant
    pub fn parse_single_cpu(output: &str) -> Option<f64> {
        super::labeled_number(output, "CPU Usage").map(|v| v as f64)
    }

    /// Memory reading from `cpstat os -f memory`.
    ///
    /// Prefers the byte-denominated total/free pair, then the older
    /// megabyte-denominated total/used pair.
    pub async fn memory_usage(&self) -> MemoryReading {
        let output = self.probe.run(&["cpstat", "os", "-f", "memory"]).await;
        Self::parse_memory(&output).unwrap_or_default()
    }

    pub fn parse_memory(output: &str) -> Option<MemoryReading> {
        let total = super::labeled_number(output, "Total Real Memory (Bytes)");
        let free = super::labeled_number(output, "Free Real Memory (Bytes)");
        if let (Some(total_bytes), Some(free_bytes)) = (total, free) {
            if total_bytes > 0 {
                let used = total_bytes - free_bytes.min(total_bytes);
                return Some(MemoryReading {
                    used_percent: super::round2(used as f64 / total_bytes as f64 * 100.0),
                    total_bytes,
                    free_bytes,
                });
            }
        }

        let total_mb = super::labeled_number(output, "Total Memory");
        let used_mb = super::labeled_number(output, "Used Memory");
        if let (Some(total_mb), Some(used_mb)) = (total_mb, used_mb) {
            if total_mb > 0 {
                const MB: u64 = 1024 * 1024;
                return Some(MemoryReading {
                    used_percent: super::round2(used_mb as f64 / total_mb as f64 * 100.0),
                    total_bytes: total_mb * MB,
                    free_bytes: total_mb.saturating_sub(used_mb) * MB,
                });
            }
        }

        None
    }

    /// Resolved ClusterXL state of this member
    pub async fn cluster_state(&self) -> String {
        let output = self.probe.run(&["cphaprob", "state"]).await;
        Self::parse_cluster_state(&output)
    }

    /// State resolution chain: explicit `State:` line, then the
    /// `(local)` member row's last column, then known-token search,
    /// then `"Unknown"`
    pub fn parse_cluster_state(output: &str) -> String {
        for line in output.lines() {
            if let Some(idx) = line.find("State:") {
                let value = line[idx + "State:".len()..].trim();
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }

        for line in output.lines() {
            if line.contains("(local)") {
                if let Some(state) = line.split_whitespace().last() {
                    return capitalize(state);
                }
            }
        }

        if output.contains("Active") {
            return "Active".to_string();
        }
        if output.contains("Standby") {
            return "Standby".to_string();
        }
        "Unknown".to_string()
    }

    /// `"<name>: <state>"` for every monitored device not in `OK` state
    pub async fn device_errors(&self) -> Vec<String> {
        let output = self.probe.run(&["cphaprob", "list"]).await;
        Self::parse_device_errors(&output)
    }

    /// Blocks are separated by blank lines; blocks missing either the
    /// name or state field are dropped
    pub fn parse_device_errors(output: &str) -> Vec<String> {
        let mut errors = Vec::new();
        for block in output.split("\n\n") {
            let name = super::labeled_value(block, "Device Name");
            let state = super::labeled_value(block, "State");
            if let (Some(name), Some(state)) = (name, state) {
                if state != "OK" {
                    errors.push(format!("{}: {}", name, state));
                }
            }
        }
        errors
    }

    /// Heavy-connection log lines from today, among the last five
    /// reported. `today` is a `DD/MM/YY` token; callers pin it in mock
    /// mode so the filter stays deterministic.
    pub async fn heavy_connections(&self, today: &str) -> Vec<String> {
        let output = self
            .probe
            .run(&["fw", "ctl", "multik", "print_heavy_conn"])
            .await;
        Self::parse_heavy_connections(&output, today)
    }

    pub fn parse_heavy_connections(output: &str, today: &str) -> Vec<String> {
        if output.is_empty() {
            return Vec::new();
        }
        let lines: Vec<&str> = output.lines().collect();
        let tail_start = lines.len().saturating_sub(5);
        lines[tail_start..]
            .iter()
            .filter(|line| line.contains(today))
            .map(|line| line.trim().to_string())
            .collect()
    }
}

/// Today's date in the `DD/MM/YY` form the firewall logs use
pub fn today_token() -> String {
    chrono::Local::now().format("%d/%m/%y").to_string()
}

fn single_core_reading(label: &str, usage: f64, warning_threshold: u8) -> CpuReading {
    let heavy_cpus = if usage >= warning_threshold as f64 {
        vec![format!("{}: {}%", label, fmt_percent(usage))]
    } else {
        Vec::new()
    };
    CpuReading {
        average: usage,
        max: usage,
        heavy_cpus,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
