//! Agent subcommand implementations

pub mod checkpoint;
pub mod linux;
pub mod ocp;
