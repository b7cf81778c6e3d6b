//! Probe boundary: running external tools for raw output
//!
//! A probe never fails past this boundary. Missing binaries, non-zero
//! exits, timeouts and undecodable output all degrade to an empty
//! string; the extractors own the documented defaults from there.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default per-probe timeout; a hung tool degrades that probe only
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for probe implementations
#[async_trait]
pub trait Probe: Send + Sync {
    /// Run one external command and return its trimmed stdout.
    ///
    /// Must never fail: any execution problem yields `""`.
    async fn run(&self, argv: &[&str]) -> String;
}

/// Probe that executes a real subprocess with a bounded timeout
pub struct CommandProbe {
    timeout: Duration,
}

impl CommandProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for CommandProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl Probe for CommandProbe {
    async fn run(&self, argv: &[&str]) -> String {
        let Some((&program, args)) = argv.split_first() else {
            return String::new();
        };

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(program).args(args.iter().copied()).output(),
        )
        .await;

        match output {
            Ok(Ok(output)) => {
                if !output.status.success() {
                    debug!(command = %argv.join(" "), status = ?output.status.code(), "Probe exited non-zero");
                }
                // Some appliance tools exit non-zero while still printing
                // usable output, so stdout is kept either way.
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Ok(Err(e)) => {
                warn!(command = %argv.join(" "), error = %e, "Probe failed to execute");
                String::new()
            }
            Err(_) => {
                warn!(command = %argv.join(" "), timeout_secs = self.timeout.as_secs(), "Probe timed out");
                String::new()
            }
        }
    }
}

/// Probe backed by an immutable table of canned outputs, keyed by the
/// full command line. Used by `--mock` mode and by tests.
#[derive(Default)]
pub struct MockProbe {
    outputs: HashMap<String, String>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register canned output for a command line
    pub fn with(mut self, argv: &[&str], output: &str) -> Self {
        self.outputs.insert(argv.join(" "), output.to_string());
        self
    }
}

#[async_trait]
impl Probe for MockProbe {
    async fn run(&self, argv: &[&str]) -> String {
        self.outputs.get(&argv.join(" ")).cloned().unwrap_or_default()
    }
}
