//! System status agents
//!
//! One binary, three one-shot agent variants: a Linux host agent, a
//! Checkpoint appliance agent and an OpenShift cluster agent. Each
//! probes its target, classifies an ok/warning/error severity and
//! either prints or POSTs the normalized envelope.

mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// System status agents for the monitoring dashboard
#[derive(Parser)]
#[command(name = "sysagent")]
#[command(author, version, about = "Host and cluster status agents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report CPU, memory, disk and service state of this Linux host
    Linux(LinuxArgs),

    /// Report CPU, memory, cluster and device state of a Checkpoint appliance
    Checkpoint(CheckpointArgs),

    /// Report replica status of OpenShift workloads
    Ocp(OcpArgs),
}

#[derive(Args)]
pub struct LinuxArgs {
    /// Warning threshold percentage
    #[arg(long, default_value_t = 85)]
    pub threshold_warning: u8,

    /// Error threshold percentage
    #[arg(long, default_value_t = 95)]
    pub threshold_error: u8,

    /// Project name for the payload
    #[arg(long, default_value = "Servers")]
    pub project_name: String,

    /// System name for the payload
    #[arg(long, default_value = "Monitoring")]
    pub system_name: String,

    /// Service names or patterns to ignore; replaces the built-in
    /// list, and an empty value list means ignore nothing
    #[arg(long, num_args = 0..)]
    pub ignore_services: Option<Vec<String>>,

    /// Also check for stopped enabled services (not just failed)
    #[arg(long)]
    pub check_stopped: bool,

    /// Output only JSON without summary
    #[arg(long)]
    pub json_only: bool,

    /// Suppress output except for errors
    #[arg(long, short)]
    pub quiet: bool,

    /// API endpoint URL; when set, the envelope is POSTed instead of printed
    #[arg(long, env = "DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Args)]
pub struct CheckpointArgs {
    /// Warning threshold percentage
    #[arg(long, default_value_t = 85)]
    pub threshold_warning: u8,

    /// Error threshold percentage
    #[arg(long, default_value_t = 95)]
    pub threshold_error: u8,

    /// Project name for the payload
    #[arg(long, default_value = "Firewalls")]
    pub project_name: String,

    /// System name for the payload
    #[arg(long, default_value = "Checkpoint")]
    pub system_name: String,

    /// Output only JSON without summary
    #[arg(long)]
    pub json_only: bool,

    /// Use canned fixture data instead of running Gaia tools
    #[arg(long)]
    pub mock: bool,

    /// Suppress output except for errors
    #[arg(long, short)]
    pub quiet: bool,

    /// API endpoint URL; when set, the envelope is POSTed instead of printed
    #[arg(long, env = "DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Args)]
pub struct OcpArgs {
    /// System name for the payload
    #[arg(long, default_value = "OpenShift")]
    pub system_name: String,

    /// Use canned fixture data instead of running oc
    #[arg(long)]
    pub mock: bool,

    /// Output the envelopes as JSON instead of posting them
    #[arg(long)]
    pub json_only: bool,

    /// Suppress output except for errors
    #[arg(long, short)]
    pub quiet: bool,

    /// API endpoint URL; each resource is POSTed independently
    #[arg(
        long,
        env = "DASHBOARD_API_URL",
        default_value = "https://overview/api/components"
    )]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Linux(args) => commands::linux::run(args).await,
        Commands::Checkpoint(args) => commands::checkpoint::run(args).await,
        Commands::Ocp(args) => commands::ocp::run(args).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("Error: {e}"));
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_services_absent_vs_empty() {
        let cli = Cli::try_parse_from(["sysagent", "linux"]).unwrap();
        let Commands::Linux(args) = cli.command else {
            panic!("expected linux command");
        };
        assert_eq!(args.ignore_services, None);

        let cli = Cli::try_parse_from(["sysagent", "linux", "--ignore-services"]).unwrap();
        let Commands::Linux(args) = cli.command else {
            panic!("expected linux command");
        };
        assert_eq!(args.ignore_services, Some(vec![]));

        let cli = Cli::try_parse_from([
            "sysagent",
            "linux",
            "--ignore-services",
            "cups.service",
            "snapd.*",
        ])
        .unwrap();
        let Commands::Linux(args) = cli.command else {
            panic!("expected linux command");
        };
        assert_eq!(
            args.ignore_services,
            Some(vec!["cups.service".to_string(), "snapd.*".to_string()])
        );
    }

    #[test]
    fn test_ocp_defaults() {
        std::env::remove_var("DASHBOARD_API_URL");
        let cli = Cli::try_parse_from(["sysagent", "ocp"]).unwrap();
        let Commands::Ocp(args) = cli.command else {
            panic!("expected ocp command");
        };
        assert_eq!(args.api_url, "https://overview/api/components");
        assert_eq!(args.system_name, "OpenShift");
        assert!(!args.json_only);
        assert_eq!(args.timeout, 10);
    }

    #[test]
    fn test_ocp_json_only_flag() {
        let cli = Cli::try_parse_from(["sysagent", "ocp", "--mock", "--json-only"]).unwrap();
        let Commands::Ocp(args) = cli.command else {
            panic!("expected ocp command");
        };
        assert!(args.json_only);
        assert!(args.mock);
    }
}
