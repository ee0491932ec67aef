//! BLAKE3 partitioner.

use crate::partitioner::traits::Partitioner;
use crate::token::Blake3Token;

/// BLAKE3 digest read as a 256-bit big-endian integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    type TokenType = Blake3Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        Blake3Token::from(*blake3::hash(key).as_bytes())
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}
