//! Agent library for host and cluster status reporting
//!
//! This crate provides the core functionality for:
//! - Probing external tools (/proc, systemd, Gaia CLI, oc) for raw output
//! - Extracting typed metrics from heterogeneous text/JSON formats
//! - Classifying an overall ok/warning/error severity from thresholds
//! - Building the normalized JSON envelope the monitoring backend expects
//! - Posting the envelope over HTTP

pub mod collector;
pub mod mock;
pub mod models;
pub mod payload;
pub mod probe;
pub mod report;
pub mod severity;

pub use models::*;
pub use probe::{CommandProbe, Probe};
pub use report::{ReportError, Reporter};
