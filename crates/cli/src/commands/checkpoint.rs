//! Checkpoint appliance agent command

use crate::output;
use crate::CheckpointArgs;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use sysagent_lib::collector::{today_token, GaiaCollector};
use sysagent_lib::models::Thresholds;
use sysagent_lib::probe::CommandProbe;
use sysagent_lib::{mock, payload, severity, Reporter};

/// Identifier used when hostname resolution fails
const HOST_FALLBACK: &str = "checkpoint-fw";

pub async fn run(args: CheckpointArgs) -> Result<()> {
    let thresholds = Thresholds::new(args.threshold_warning, args.threshold_error)?;
    let verbose = !args.json_only && !args.quiet;

    let collector = if args.mock {
        GaiaCollector::mock()
    } else {
        GaiaCollector::new(Arc::new(CommandProbe::default()))
    };
    // Mock runs pin "today" to the fixture date so the filter matches
    let today = if args.mock {
        mock::MOCK_TODAY.to_string()
    } else {
        today_token()
    };

    if verbose {
        output::print_info("Gathering Checkpoint metrics...");
    }

    let cpu = collector.cpu_usage(thresholds.warning).await;
    let memory = collector.memory_usage().await;
    let cluster_state = collector.cluster_state().await;
    let errors = collector.device_errors().await;
    let heavy_connections = collector.heavy_connections(&today).await;

    let verdict = severity::appliance_severity(
        &cpu,
        memory.used_percent,
        &cluster_state,
        &errors,
        &heavy_connections,
        &thresholds,
    );

    let identifier = payload::hostname(HOST_FALLBACK);
    let report = payload::appliance_report(
        &args.project_name,
        &args.system_name,
        &identifier,
        &cpu,
        &memory,
        &cluster_state,
        &errors,
        &heavy_connections,
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

    output::print_success("\nMetrics Summary:");
    output::print_percent("CPU", cpu.average, &thresholds);
    if !cpu.heavy_cpus.is_empty() {
        output::print_warning(&format!("Heavy CPUs: {}", cpu.heavy_cpus.join(", ")));
    }
    println!("Memory: {}", payload::format_free_memory(&memory));
    println!("Cluster State: {cluster_state}");
    println!("Errors: {}", errors.len());
    if heavy_connections.is_empty() {
        println!("Heavy Connections: None");
    } else {
        output::print_error(&format!(
            "Heavy Connections: {} found",
            heavy_connections.len()
        ));
        for conn in &heavy_connections {
            let preview: String = conn.chars().take(100).collect();
            println!("  - {preview}...");
        }
    }
    println!(
        "{}",
        output::severity_colored(&format!("Severity: {verdict}"), verdict)
    );

    output::print_info("\nJSON Output:");
    output::print_json(&report)
}
