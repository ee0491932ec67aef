//! Ring configuration.
//!
//! Deserializable with serde so it can sit in a TOML file:
//!
//! ```toml
//! vnodes = 300
//! hash = "sha1"
//! nodes = ["server01", "server02", "server03"]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::HashKind;
use crate::ring::{RingBuilder, DEFAULT_VNODES};

/// Settings a ring is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Anchors per node.
    pub vnodes: usize,
    /// Hash function placing anchors and keys.
    pub hash: HashKind,
    /// Initial members.
    pub nodes: Vec<NodeId>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            hash: HashKind::default(),
            nodes: Vec::new(),
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.vnodes == 0 {
            return Err(Error::InvalidArgument("vnodes must be positive".into()));
        }
        Ok(())
    }

    /// Builder preloaded with `vnodes` and `nodes`.
    ///
    /// The builder hashes with SHA-1; callers dispatch on [`RingConfig::hash`]
    /// and swap in the matching partitioner with
    /// [`RingBuilder::with_partitioner`].
    pub fn builder(&self) -> RingBuilder {
        RingBuilder::new()
            .with_vnodes(self.vnodes)
            .add_nodes(self.nodes.iter().cloned())
    }
}
