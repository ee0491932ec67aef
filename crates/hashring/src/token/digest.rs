//! Fixed-width digest tokens.
//!
//! A `DigestToken<N>` is an `N`-byte big-endian unsigned integer. Comparing
//! the byte arrays lexicographically is the same as comparing the integers,
//! so the derived `Ord` gives numeric ring order for free.

use std::fmt;

use crate::token::traits::{Token, TWO_POW_64};

/// Token backed by the raw bytes of a cryptographic digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DigestToken<const N: usize>(pub [u8; N]);

/// 160-bit position produced by SHA-1, the default ring position.
pub type Sha1Token = DigestToken<20>;

/// 256-bit position produced by BLAKE3.
pub type Blake3Token = DigestToken<32>;

impl<const N: usize> DigestToken<N> {
    /// Builds a token from digest output. Returns `None` unless `bytes` is
    /// exactly `N` bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; N] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    /// Big-endian bytes of this token.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for DigestToken<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> Token for DigestToken<N> {
    fn zero() -> Self {
        DigestToken([0; N])
    }

    fn max() -> Self {
        DigestToken([u8::MAX; N])
    }

    fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    fn is_max(&self) -> bool {
        self.0.iter().all(|b| *b == u8::MAX)
    }

    fn distance_to(&self, other: &Self) -> Self {
        // other - self, modulo 2^(8N): schoolbook subtraction from the least
        // significant byte, letting the final borrow fall off.
        let mut out = [0u8; N];
        let mut borrow = false;
        for i in (0..N).rev() {
            let (diff, b1) = other.0[i].overflowing_sub(self.0[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u8);
            out[i] = diff;
            borrow = b1 || b2;
        }
        DigestToken(out)
    }

    fn ring_fraction(&self) -> f64 {
        // The leading 64 bits carry more precision than an f64 can hold.
        let mut prefix = [0u8; 8];
        let len = N.min(8);
        prefix[..len].copy_from_slice(&self.0[..len]);
        u64::from_be_bytes(prefix) as f64 / TWO_POW_64
    }
}

impl<const N: usize> fmt::Display for DigestToken<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
