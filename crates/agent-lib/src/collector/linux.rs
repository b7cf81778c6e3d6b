//! Linux host extractors
//!
//! Reads /proc for CPU and memory, `df -PT` for filesystems and
//! systemd for service state. Every extractor degrades to a zero or
//! empty default on failure.

use crate::models::DiskEntry;
use crate::probe::Probe;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

/// Filesystem types that only ever report virtual mounts
const EXCLUDE_FS_TYPES: &[&str] = &[
    "tmpfs",
    "devtmpfs",
    "squashfs",
    "overlay",
    "aufs",
    "proc",
    "sysfs",
    "devpts",
    "cgroup",
    "cgroup2",
    "securityfs",
    "pstore",
    "debugfs",
    "hugetlbfs",
    "mqueue",
    "fusectl",
    "configfs",
    "binfmt_misc",
    "autofs",
    "efivarfs",
    "tracefs",
];

/// Mount-point prefixes excluded from disk reporting
const EXCLUDE_MOUNT_PREFIXES: &[&str] = &["/boot/efi", "/snap"];

/// Collector for the Linux host agent
pub struct LinuxCollector {
    probe: Arc<dyn Probe>,
    proc_root: PathBuf,
}

impl LinuxCollector {
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self {
            probe,
            proc_root: PathBuf::from("/proc"),
        }
    }

    /// Create collector with custom proc path (for testing)
    pub fn with_proc_root(probe: Arc<dyn Probe>, proc_root: impl Into<PathBuf>) -> Self {
        Self {
            probe,
            proc_root: proc_root.into(),
        }
    }

    /// CPU usage percentage over a one-second window.
    ///
    /// Falls back to parsing `top -bn1` when /proc/stat is unusable,
    /// and to 0.0 when that fails too.
    pub async fn cpu_usage(&self) -> f64 {
        if let Some(usage) = super::proc_stat_usage(&self.proc_root).await {
            return usage;
        }

        warn!("Could not read CPU usage from /proc/stat, falling back to top");
        let output = self.probe.run(&["top", "-bn1"]).await;
        Self::parse_top_idle(&output).unwrap_or(0.0)
    }

    /// Extract usage from a `top -bn1` summary line: the token before
    /// an `id`/`idle` marker is the idle percentage
    pub fn parse_top_idle(output: &str) -> Option<f64> {
        for line in output.lines() {
            if !line.contains("Cpu") && !line.contains("%Cpu") {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            for (i, part) in parts.iter().enumerate() {
                if part.contains("id") || part.to_lowercase().contains("idle") {
                    if i == 0 {
                        continue;
                    }
                    if let Ok(idle) = parts[i - 1].replace(',', ".").parse::<f64>() {
                        return Some(super::round2(100.0 - idle));
                    }
                }
            }
        }
        None
    }

    /// Memory usage percentage from /proc/meminfo
    pub async fn memory_usage(&self) -> f64 {
        match fs::read_to_string(self.proc_root.join("meminfo")).await {
            Ok(content) => Self::parse_meminfo(&content),
            Err(e) => {
                warn!(error = %e, "Could not read /proc/meminfo");
                0.0
            }
        }
    }

    /// Compute used percent from meminfo contents, preferring
    /// MemAvailable and reconstructing it on older kernels
    pub fn parse_meminfo(content: &str) -> f64 {
        let mut meminfo = std::collections::HashMap::new();
        for line in content.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                if let Ok(value) = parts[1].parse::<u64>() {
                    meminfo.insert(parts[0].trim_end_matches(':'), value);
                }
            }
        }

        let total = meminfo.get("MemTotal").copied().unwrap_or(0);
        if total == 0 {
            return 0.0;
        }

        let mut available = meminfo.get("MemAvailable").copied().unwrap_or(0);
        if available == 0 {
            let free = meminfo.get("MemFree").copied().unwrap_or(0);
            let buffers = meminfo.get("Buffers").copied().unwrap_or(0);
            let cached = meminfo.get("Cached").copied().unwrap_or(0);
            available = free + buffers + cached;
        }

        let used = total.saturating_sub(available);
        super::round2(used as f64 / total as f64 * 100.0)
    }

    /// Used percent per mounted, non-virtual filesystem
    pub async fn disk_usage(&self) -> Vec<DiskEntry> {
        let output = self.probe.run(&["df", "-PT"]).await;
        Self::parse_df(&output)
    }

    /// Parse `df -PT` output. Malformed rows are skipped, never fatal.
    pub fn parse_df(output: &str) -> Vec<DiskEntry> {
        let mut disks = Vec::new();

        for line in output.lines().skip(1) {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 7 {
                continue;
            }
            let device = parts[0];
            let fs_type = parts[1];
            let used_percent_str = parts[5].trim_end_matches('%');
            let mount_point = parts[6];

            if EXCLUDE_FS_TYPES.contains(&fs_type) {
                continue;
            }
            if EXCLUDE_MOUNT_PREFIXES
                .iter()
                .any(|prefix| mount_point.starts_with(prefix))
            {
                continue;
            }
            if !device.starts_with('/') {
                continue;
            }

            let Ok(used_percent) = used_percent_str.parse::<f64>() else {
                continue;
            };
            disks.push(DiskEntry {
                device: device.to_string(),
                mount_point: mount_point.to_string(),
                used_percent,
            });
        }

        disks
    }

    /// Units systemd reports as failed, minus ignore patterns
    pub async fn failed_services(&self, ignore: &[String]) -> Vec<String> {
        let output = self
            .probe
            .run(&[
                "systemctl",
                "list-units",
                "--state=failed",
                "--no-legend",
                "--plain",
            ])
            .await;

        output
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .filter(|unit| !is_ignored(unit, ignore))
            .map(|unit| unit.to_string())
            .collect()
    }

    /// Enabled services whose live state is neither active nor
    /// activating. One extra `is-active` query per enabled unit; a
    /// failed query skips that unit but never aborts the scan.
    pub async fn stopped_enabled_services(&self, ignore: &[String]) -> Vec<String> {
        let output = self
            .probe
            .run(&[
                "systemctl",
                "list-unit-files",
                "--type=service",
                "--state=enabled",
                "--no-legend",
                "--plain",
            ])
            .await;

        let enabled: BTreeSet<&str> = output
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();

        let mut stopped = Vec::new();
        for unit in enabled {
            if is_ignored(unit, ignore) {
                continue;
            }
            let state = self.probe.run(&["systemctl", "is-active", unit]).await;
            if state.is_empty() {
                debug!(unit, "is-active query produced no output, skipping unit");
                continue;
            }
            if state != "active" && state != "activating" {
                stopped.push(unit.to_string());
            }
        }
        stopped
    }
}

/// Match a unit name against an ignore pattern list: a trailing `*`
/// matches by prefix, anything else matches exactly
pub fn is_ignored(unit: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(prefix) = pattern.strip_suffix('*') {
            unit.starts_with(prefix)
        } else {
            unit == pattern
        }
    })
}
