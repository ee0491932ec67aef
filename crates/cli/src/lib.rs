//! CLI tool for exercising consistent hash rings.
//!
//! Provides commands for:
//! - Measuring key distribution across nodes, before and after removals
//! - Showing which keys move when a node leaves
//! - Looking up the nodes for a key
//! - Inspecting how much of the ring each node owns

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
