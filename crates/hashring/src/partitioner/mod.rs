//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into tokens
//! that can be placed on the hash ring.

pub mod blake3;
pub mod func;
pub mod sha1;
pub mod sip;
pub mod traits;
pub mod xxh3;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::blake3::Blake3Partitioner;
pub use self::func::FnPartitioner;
pub use self::sha1::Sha1Partitioner;
pub use self::sip::SipPartitioner;
pub use self::xxh3::Xxh3Partitioner;
pub use self::traits::Partitioner;

/// Built-in hash functions, selectable by name from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    /// [`Sha1Partitioner`]
    #[default]
    Sha1,
    /// [`SipPartitioner`]
    Sip,
    /// [`Xxh3Partitioner`]
    Xxh3,
    /// [`Blake3Partitioner`]
    Blake3,
}

impl HashKind {
    pub const ALL: [HashKind; 4] = [HashKind::Sha1, HashKind::Sip, HashKind::Xxh3, HashKind::Blake3];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashKind::Sha1 => "sha1",
            HashKind::Sip => "sip",
            HashKind::Xxh3 => "xxh3",
            HashKind::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown hash `{}` (expected sha1, sip, xxh3 or blake3)", s))
    }
}
