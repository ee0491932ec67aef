//! Node identifiers for the consistent hash ring.
//!
//! The ring treats nodes as interchangeable labels: a node is nothing more
//! than the string naming a physical endpoint (a hostname, `host:port`, a
//! shard name). Connections, health and capacity live elsewhere.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a physical node.
///
/// Cheap to compare and hash; cloned whenever the ring hands a node back to a
/// caller so nothing outside the ring holds a reference into its state.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Construct a node id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for NodeId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_node_id_conversions() {
        let a = NodeId::from("server01");
        let b = NodeId::from(String::from("server01"));
        let c = NodeId::new("server01");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "server01");
        assert_eq!(a.to_string(), "server01");
        assert_eq!(a, "server01");
    }

    #[test]
    fn test_node_id_borrow_lookup() {
        let mut set = BTreeSet::new();
        set.insert(NodeId::from("server02"));
        assert!(set.contains("server02"));
        assert!(!set.contains("server03"));
    }
}
