//! Consistent hashing ring.
//!
//! Maps an arbitrary key space onto a dynamic set of named nodes so that
//! adding or removing a node reassigns only a small, bounded fraction of
//! keys. Used to pick cache or storage nodes for a key without global
//! rebalancing.
//!
//! This crate provides:
//! - Token types (ring positions) and partitioners (hash functions)
//! - Virtual node anchors
//! - The [`HashRing`] with single and replica lookups
//! - Topology views for ownership analysis
//!
//! ```rust
//! use hashring::HashRing;
//!
//! let ring = HashRing::new(30).unwrap();
//! ring.add(["server01", "server02", "server03"]);
//! let primary = ring.get("user:1234").unwrap();
//! let replicas = ring.mget("user:1234", 2).unwrap();
//! assert_eq!(replicas[0], primary);
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use node::NodeId;
pub use partitioner::{HashKind, Partitioner};
pub use ring::{HashRing, Ring, RingBuilder, DEFAULT_VNODES};
pub use token::Token;
pub use topology::RingTopology;
pub use vnode::VirtualNode;
