//! Command-line and file configuration.
//!
//! Ring settings come from three layers, later ones winning: built-in
//! defaults, an optional TOML file (`--config`), then individual flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hashring::{HashKind, NodeId, RingConfig};
use tracing::debug;

use crate::commands::Command;

/// Members used when neither the config file nor `--node` names any.
pub const DEFAULT_NODES: [&str; 5] = ["server01", "server02", "server03", "server04", "server05"];

/// Inspect and exercise a consistent hash ring.
#[derive(Debug, Parser)]
#[command(name = "hashring", version, about)]
pub struct CliConfig {
    /// TOML file with `vnodes`, `hash` and `nodes`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Anchors per node.
    #[arg(long, global = true)]
    pub vnodes: Option<usize>,

    /// Hash function: sha1, sip, xxh3 or blake3.
    #[arg(long, global = true)]
    pub hash: Option<HashKind>,

    /// Ring member; repeat for each node.
    #[arg(long = "node", global = true, value_name = "NODE")]
    pub nodes: Vec<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> Result<()> {
        setup_tracing(&self.log_level);

        let ring_config = self.ring_config()?;
        debug!(?ring_config, "resolved ring configuration");

        let result = self.command.execute(&ring_config)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", result);
        }
        Ok(())
    }

    /// Merge defaults, the config file and flags into one ring config.
    pub fn ring_config(&self) -> Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => RingConfig::default(),
        };

        if let Some(vnodes) = self.vnodes {
            config.vnodes = vnodes;
        }
        if let Some(hash) = self.hash {
            config.hash = hash;
        }
        if !self.nodes.is_empty() {
            config.nodes = self.nodes.iter().map(NodeId::from).collect();
        }
        if config.nodes.is_empty() {
            config.nodes = DEFAULT_NODES.into_iter().map(NodeId::from).collect();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses `level`.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
