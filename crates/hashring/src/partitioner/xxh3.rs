//! XXH3 partitioner.

use xxhash_rust::xxh3::xxh3_64;

use crate::partitioner::traits::Partitioner;
use crate::token::U64Token;

/// XXH3-64, the fastest of the built-in hashes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    type TokenType = U64Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        U64Token(xxh3_64(key))
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
