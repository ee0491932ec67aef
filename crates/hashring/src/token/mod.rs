//! Token abstraction for consistent hashing.
//!
//! Tokens represent positions on the hash ring and must be comparable,
//! hashable, and thread-safe.

pub mod digest;
pub mod numeric;
pub mod traits;

pub use digest::{Blake3Token, DigestToken, Sha1Token};
pub use numeric::U64Token;
pub use traits::Token;
