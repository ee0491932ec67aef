//! 64-bit integer tokens.

use std::fmt;

use crate::token::traits::{Token, TWO_POW_64};

/// Token using a `u64` representation.
///
/// Produced by the non-cryptographic partitioners and handy for hand-built
/// rings in tests, where positions can be chosen explicitly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct U64Token(pub u64);

impl Token for U64Token {
    fn zero() -> Self {
        U64Token(0)
    }

    fn max() -> Self {
        U64Token(u64::MAX)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_max(&self) -> bool {
        self.0 == u64::MAX
    }

    fn distance_to(&self, other: &Self) -> Self {
        U64Token(other.0.wrapping_sub(self.0))
    }

    fn ring_fraction(&self) -> f64 {
        self.0 as f64 / TWO_POW_64
    }
}

impl From<u64> for U64Token {
    fn from(value: u64) -> Self {
        U64Token(value)
    }
}

impl fmt::Display for U64Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
