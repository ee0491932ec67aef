//! Consistent hash ring implementation.
//!
//! The ring manages anchor positions and provides efficient lookup
//! operations for finding nodes responsible for keys.

pub mod builder;
pub mod ring;

pub use builder::RingBuilder;
pub use ring::{HashRing, DEFAULT_VNODES};

/// Alias for the main ring type (used by lib.rs).
pub type Ring<P = crate::partitioner::Sha1Partitioner> = HashRing<P>;
