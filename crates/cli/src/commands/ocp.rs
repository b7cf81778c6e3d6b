//! OpenShift cluster agent command
//!
//! Each workload object is classified and posted independently; a
//! failed POST is reported and the fan-out continues (best effort, no
//! atomicity across the batch).

use crate::output;
use crate::OcpArgs;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use sysagent_lib::collector::OcpCollector;
use sysagent_lib::models::WorkloadKind;
use sysagent_lib::probe::CommandProbe;
use sysagent_lib::{payload, Reporter};

pub async fn run(args: OcpArgs) -> Result<()> {
    let verbose = !args.json_only && !args.quiet;

    let collector = if args.mock {
        OcpCollector::mock()
    } else {
        OcpCollector::new(Arc::new(CommandProbe::default()))
    };

    let reporter = if args.json_only {
        None
    } else {
        Some(Reporter::new(&args.api_url, Duration::from_secs(args.timeout))?)
    };

    let mut collected = Vec::new();
    for kind in WorkloadKind::ALL {
        if verbose {
            output::print_info(&format!("Collecting {}...", kind.plural()));
        }
        let resources = collector.workloads(kind).await;
        if verbose {
            println!(
                "Found {} resources for {}",
                resources.len(),
                kind.project_name()
            );
        }

        match &reporter {
            Some(reporter) => {
                for resource in &resources {
                    let report =
                        payload::cluster_report(kind.project_name(), &args.system_name, resource);
                    if let Err(e) = reporter.post(&report).await {
                        output::print_error(&format!("Failed to post {}: {e}", resource.name));
                    }
                }
                if verbose {
                    println!("Finished posting {}", kind.project_name());
                }
            }
            None => {
                collected.extend(
                    resources
                        .iter()
                        .map(|r| payload::cluster_report(kind.project_name(), &args.system_name, r)),
                );
            }
        }
    }

    if args.json_only {
        output::print_json(&collected)?;
    }

    Ok(())
}
