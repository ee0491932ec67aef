//! Builder for hash rings.

use crate::error::Result;
use crate::node::NodeId;
use crate::partitioner::{Partitioner, Sha1Partitioner};
use crate::ring::ring::{HashRing, DEFAULT_VNODES};

/// Collects ring settings and initial members, then builds the ring in one
/// step.
///
/// # Example
///
/// ```rust
/// use hashring::partitioner::Xxh3Partitioner;
/// use hashring::RingBuilder;
///
/// let ring = RingBuilder::new()
///     .with_vnodes(64)
///     .with_partitioner(Xxh3Partitioner)
///     .add_nodes(["cache-a", "cache-b"])
///     .build()
///     .unwrap();
/// assert_eq!(ring.token_count(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder<P: Partitioner = Sha1Partitioner> {
    vnodes: usize,
    partitioner: P,
    nodes: Vec<NodeId>,
}

impl RingBuilder<Sha1Partitioner> {
    /// SHA-1 ring with [`DEFAULT_VNODES`] anchors per node and no members.
    pub fn new() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            partitioner: Sha1Partitioner,
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder<Sha1Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.vnodes = vnodes;
        self
    }

    /// Swap the hash function, keeping vnodes and queued nodes.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            vnodes: self.vnodes,
            partitioner,
            nodes: self.nodes,
        }
    }

    pub fn add_node(mut self, node: impl Into<NodeId>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn add_nodes<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// # Errors
    /// `InvalidArgument` if vnodes is zero.
    pub fn build(self) -> Result<HashRing<P>> {
        let ring = HashRing::with_partitioner(self.vnodes, self.partitioner)?;
        ring.add(self.nodes);
        Ok(ring)
    }
}
