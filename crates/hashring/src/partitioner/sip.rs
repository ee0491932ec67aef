//! SipHash partitioner.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::partitioner::traits::Partitioner;
use crate::token::U64Token;

/// SipHash-1-3 with zero keys, producing 64-bit tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner;

impl Partitioner for SipPartitioner {
    type TokenType = U64Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        let mut hasher = SipHasher13::new();
        hasher.write(key);
        U64Token(hasher.finish())
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
