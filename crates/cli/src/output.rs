//! Terminal output utilities

use colored::{ColoredString, Colorize};
use sysagent_lib::models::{Severity, Thresholds};
use sysagent_lib::payload::fmt_percent;
use sysagent_lib::severity;

/// Print an informational message
pub fn print_info(message: &str) {
    println!("{}", message.cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}", message.green());
}

/// Print a warning message
#[allow(dead_code)]
pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

/// Color text by the severity it represents
pub fn severity_colored(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Ok => text.green(),
        Severity::Warning => text.yellow(),
        Severity::Error => text.red(),
    }
}

/// Print a `label: value%` line colored by the two-threshold rule
pub fn print_percent(label: &str, value: f64, thresholds: &Thresholds) {
    let verdict = severity::from_percent(value, thresholds);
    println!(
        "{}",
        severity_colored(&format!("{}: {}%", label, fmt_percent(value)), verdict)
    );
}

/// Pretty-print a serializable value as JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
