//! Error types for the hash ring.

use crate::node::NodeId;

/// Result type alias for ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mutating or querying a ring.
///
/// Everything here is deterministic: retrying the same call against the same
/// ring state yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lookup was attempted on a ring with no anchors.
    #[error("hash ring is empty")]
    EmptyRing,

    /// `remove` named a node that is not on the ring.
    #[error("node not found on ring: {0}")]
    NodeNotFound(NodeId),

    /// A count argument (`vnodes`, replica count) was zero.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
