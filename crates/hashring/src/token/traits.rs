//! Core token trait definitions.
//!
//! A token is a position on the ring. The ring only needs tokens to be
//! totally ordered; the remaining methods serve topology and diagnostics.

use std::fmt::Debug;
use std::hash::Hash;

/// 2^64 as a float, the scale used by `ring_fraction` implementations.
pub(crate) const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Position on the hash ring.
///
/// Tokens are immutable, comparable positions. Implementations must be
/// thread-safe and cheap to compare/hash. The token space is circular: the
/// successor of `max()` is `zero()`.
pub trait Token: Clone + Ord + Hash + Send + Sync + Debug + 'static {
    /// Minimum token value (start of ring).
    fn zero() -> Self;
    /// Maximum token value (end of ring).
    fn max() -> Self;
    /// True if this token is the minimum.
    fn is_zero(&self) -> bool;
    /// True if this token is the maximum.
    fn is_max(&self) -> bool;
    /// Clockwise distance from `self` to `other` on the ring.
    fn distance_to(&self, other: &Self) -> Self;
    /// This token as a fraction of the whole token space, in `[0, 1)`.
    ///
    /// Applied to a distance, this is the share of the ring that distance
    /// covers.
    fn ring_fraction(&self) -> f64;
}
