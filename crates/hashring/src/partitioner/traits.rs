//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// This is the ring's hash function. Partitioners are stateless and
/// thread-safe, allowing concurrent token generation without
/// synchronization. `partition` must be pure: the same key always yields the
/// same token, or anchors recomputed by `remove` would not match the ones
/// placed by `add`.
pub trait Partitioner: Send + Sync + 'static {
    /// The token type produced by this partitioner.
    type TokenType: Token;

    /// Converts a key into a token.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to partition
    ///
    /// # Returns
    ///
    /// A token representing the position on the ring
    fn partition(&self, key: &[u8]) -> Self::TokenType;

    /// Returns the minimum token value for this partitioner.
    fn min_token(&self) -> Self::TokenType {
        Self::TokenType::zero()
    }

    /// Returns the maximum token value for this partitioner.
    fn max_token(&self) -> Self::TokenType {
        <Self::TokenType as Token>::max()
    }

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
