//! SHA-1 partitioner, the ring's default hash.

use sha1::{Digest, Sha1};

use crate::partitioner::traits::Partitioner;
use crate::token::Sha1Token;

/// Hashes keys with SHA-1 and reads the 160-bit digest as a big-endian
/// integer.
///
/// Placement is compatible with any ring that hashes `"<node>-<index>"`
/// anchors with SHA-1 and compares the digests numerically.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1Partitioner;

impl Partitioner for Sha1Partitioner {
    type TokenType = Sha1Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        let digest = Sha1::digest(key);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest);
        Sha1Token::from(bytes)
    }

    fn name(&self) -> &'static str {
        "Sha1Partitioner"
    }
}
