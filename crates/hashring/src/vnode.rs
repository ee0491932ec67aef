//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each physical node having a single token on the ring, each node
//! owns `vnodes` anchors. Anchor `i` of node `n` sits at `hash("n-i")`. This
//! provides:
//!
//! 1. **Better Load Distribution**: More anchors = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Fault Tolerance**: The keys of a failed node spread over many successors
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) anchors per node
//! - **Lookup**: O(log n) where n = total anchors
//! - **Rebalancing**: ~k/N keys move when one of N nodes joins or leaves
//!
//! More vnodes = better distribution but more memory and slower add/remove.

use std::fmt;

use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::token::Token;

/// Separator between node id and replica index in an anchor key.
pub const ANCHOR_SEPARATOR: char = '-';

/// Builds the string hashed to place replica `index` of `node`.
///
/// ```rust
/// assert_eq!(hashring::vnode::anchor_key("server01", 7), "server01-7");
/// ```
pub fn anchor_key(node: &str, index: usize) -> String {
    format!("{}{}{}", node, ANCHOR_SEPARATOR, index)
}

/// A virtual node (anchor) on the hash ring.
///
/// Represents a single token position owned by a physical node.
///
/// # Invariants
///
/// - `token == partitioner.partition(anchor_key(node, index))`
/// - `index < vnodes` of the ring that placed it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode<T: Token> {
    /// Token position on the ring.
    pub token: T,

    /// The physical node that owns this anchor.
    pub node: NodeId,

    /// Replica index within the owning node, in `[0, vnodes)`.
    pub index: usize,
}

impl<T: Token> VirtualNode<T> {
    #[inline]
    pub fn new(token: T, node: NodeId, index: usize) -> Self {
        Self { token, node, index }
    }

    /// Create the anchor for replica `index` of `node`, hashing its anchor key
    /// with `partitioner`.
    ///
    /// # Performance
    /// - **Time**: O(k) where k = length of the anchor key (format + hash)
    /// - **Space**: O(k) temporary for the formatted key
    pub fn from_index<P>(partitioner: &P, node: &NodeId, index: usize) -> Self
    where
        P: Partitioner<TokenType = T>,
    {
        let key = anchor_key(node.as_str(), index);
        let token = partitioner.partition(key.as_bytes());
        Self::new(token, node.clone(), index)
    }

    /// Every anchor a node owns on a ring with `vnodes` replicas per node.
    pub fn all_for<'a, P>(
        partitioner: &'a P,
        node: &'a NodeId,
        vnodes: usize,
    ) -> impl Iterator<Item = Self> + 'a
    where
        P: Partitioner<TokenType = T>,
    {
        (0..vnodes).map(move |index| Self::from_index(partitioner, node, index))
    }

    #[inline]
    pub fn token(&self) -> &T {
        &self.token
    }

    #[inline]
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// Clockwise distance to another anchor.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> T {
        self.token.distance_to(&other.token)
    }
}

impl<T: Token + fmt::Display> fmt::Display for VirtualNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(token={}, node={}, index={})", self.token, self.node, self.index)
    }
}
