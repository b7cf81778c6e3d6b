//! Field extractors for each agent variant
//!
//! Each collector turns one probe's raw text/JSON into typed metrics.
//! Extractors never fail past their boundary: any internal problem
//! degrades to a documented zero/empty default so the run always
//! reaches the payload builder.

mod gaia;
mod linux;
mod ocp;

pub use gaia::{today_token, GaiaCollector};
pub use linux::LinuxCollector;
pub use ocp::OcpCollector;

use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Interval between the two CPU-time snapshots
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse the aggregate `cpu` line of /proc/stat into (idle, total) ticks
pub(crate) fn parse_proc_stat_line(line: &str) -> Option<(u64, u64)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let idle: u64 = fields.get(4)?.parse().ok()?;
    let mut total = 0u64;
    for field in fields.get(1..)? {
        total += field.parse::<u64>().ok()?;
    }
    Some((idle, total))
}

/// CPU usage percentage from two /proc/stat snapshots one second apart.
///
/// Returns `None` when the file is unreadable or malformed; a zero
/// total delta reads as 0.0 usage, not a failure.
pub(crate) async fn proc_stat_usage(proc_root: &Path) -> Option<f64> {
    let stat_path = proc_root.join("stat");

    let first = fs::read_to_string(&stat_path).await.ok()?;
    let (idle1, total1) = parse_proc_stat_line(first.lines().next()?)?;

    tokio::time::sleep(CPU_SAMPLE_INTERVAL).await;

    let second = fs::read_to_string(&stat_path).await.ok()?;
    let (idle2, total2) = parse_proc_stat_line(second.lines().next()?)?;

    let idle_delta = idle2.saturating_sub(idle1);
    let total_delta = total2.saturating_sub(total1);
    if total_delta == 0 {
        return Some(0.0);
    }

    Some(round2((1.0 - idle_delta as f64 / total_delta as f64) * 100.0))
}

/// Value following `<label>:` on any line of `output`, as the leading
/// integer of the remainder. Tolerates arbitrary whitespace around the
/// colon and trailing units.
pub(crate) fn labeled_number(output: &str, label: &str) -> Option<u64> {
    labeled_value(output, label)?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

/// Trimmed text following `<label>:` on the first matching line
pub(crate) fn labeled_value<'a>(output: &'a str, label: &str) -> Option<&'a str> {
    for line in output.lines() {
        if let Some(rest) = line.trim_start().strip_prefix(label) {
            if let Some(value) = rest.trim_start().strip_prefix(':') {
                return Some(value.trim());
            }
        }
    }
    None
}
