//! Linux host agent command

use crate::output;
use crate::LinuxArgs;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use sysagent_lib::collector::LinuxCollector;
use sysagent_lib::models::Thresholds;
use sysagent_lib::probe::{CommandProbe, Probe};
use sysagent_lib::{payload, severity, Reporter};

/// Timer units that flap routinely on stock distributions
const DEFAULT_IGNORE_SERVICES: &[&str] = &[
    "snapd.refresh.timer",
    "apt-daily.timer",
    "apt-daily-upgrade.timer",
    "motd-news.timer",
    "fstrim.timer",
    "anacron.timer",
    "man-db.timer",
    "logrotate.timer",
];

/// Identifier used when hostname resolution fails
const HOST_FALLBACK: &str = "unknown";

pub async fn run(args: LinuxArgs) -> Result<()> {
    let thresholds = Thresholds::new(args.threshold_warning, args.threshold_error)?;
    let verbose = !args.json_only && !args.quiet;

    let probe: Arc<dyn Probe> = Arc::new(CommandProbe::default());
    let collector = LinuxCollector::new(probe);

    if verbose {
        output::print_info("Gathering system metrics...");
    }

    let cpu_usage = collector.cpu_usage().await;
    let memory_usage = collector.memory_usage().await;
    let disks = collector.disk_usage().await;

    // An absent flag means the built-in list; `--ignore-services` with
    // no values means ignore nothing
    let ignore = args.ignore_services.clone().unwrap_or_else(|| {
        DEFAULT_IGNORE_SERVICES
            .iter()
            .map(|s| s.to_string())
            .collect()
    });

    let mut problem_services = collector.failed_services(&ignore).await;
    if args.check_stopped {
        problem_services.extend(collector.stopped_enabled_services(&ignore).await);
        problem_services.sort();
        problem_services.dedup();
    }

    let verdict = severity::host_severity(
        cpu_usage,
        memory_usage,
        &disks,
        &problem_services,
        &thresholds,
    );

    let identifier = payload::hostname(HOST_FALLBACK);
    let report = payload::host_report(
        &args.project_name,
        &args.system_name,
        &identifier,
        cpu_usage,
        memory_usage,
        &disks,
        &problem_services,
        verdict,
    );

    if let Some(api_url) = &args.api_url {
        if verbose {
            output::print_info(&format!("\nPosting to API: {api_url}"));
            println!("Timeout: {} seconds", args.timeout);
        }
        let reporter = Reporter::new(api_url, Duration::from_secs(args.timeout))?;
        let response = reporter.post(&report).await?;
        if verbose {
            output::print_success("\n[SUCCESS] Metrics posted successfully.");
            output::print_info("\nAPI Response:");
        }
        if !args.quiet {
            output::print_json(&response)?;
        }
        return Ok(());
    }

    if args.json_only {
        return output::print_json(&report);
    }

    output::print_success("\nSystem Metrics Summary:");
    output::print_percent("CPU Usage", cpu_usage, &thresholds);
    output::print_percent("Memory Usage", memory_usage, &thresholds);
    for disk in &disks {
        output::print_percent(
            &format!("Disk {}", disk.mount_point),
            disk.used_percent,
            &thresholds,
        );
    }
    if problem_services.is_empty() {
        output::print_success("All enabled services are running (or ignored)");
    } else {
        output::print_error(&format!("Problem Services: {}", problem_services.len()));
        for service in &problem_services {
            output::print_error(&format!("  - {service}"));
        }
    }
    println!(
        "\n{}",
        output::severity_colored(&format!("Overall Severity: {verdict}"), verdict)
    );

    output::print_info("\nJSON Output:");
    output::print_json(&report)
}
