//! Closure-backed partitioner.

use std::fmt;
use std::marker::PhantomData;

use crate::partitioner::traits::Partitioner;
use crate::token::Token;

/// Adapts any `Fn(&[u8]) -> T` into a [`Partitioner`].
///
/// Lets callers inject their own hash, most usefully a deterministic one in
/// tests where anchor positions need to be known in advance.
///
/// # Example
///
/// ```rust
/// use hashring::partitioner::FnPartitioner;
/// use hashring::token::U64Token;
/// use hashring::HashRing;
///
/// let by_length = FnPartitioner::new(|key: &[u8]| U64Token(key.len() as u64));
/// let ring = HashRing::with_partitioner(1, by_length).unwrap();
/// ring.add(["a"]);
/// assert_eq!(ring.get("anything").unwrap(), "a");
/// ```
pub struct FnPartitioner<F, T> {
    func: F,
    name: &'static str,
    _token: PhantomData<fn() -> T>,
}

impl<F, T> FnPartitioner<F, T>
where
    F: Fn(&[u8]) -> T + Send + Sync + 'static,
    T: Token,
{
    pub fn new(func: F) -> Self {
        Self::named("FnPartitioner", func)
    }

    /// Same as `new`, reporting `name` from [`Partitioner::name`].
    pub fn named(name: &'static str, func: F) -> Self {
        Self {
            func,
            name,
            _token: PhantomData,
        }
    }
}

impl<F, T> Partitioner for FnPartitioner<F, T>
where
    F: Fn(&[u8]) -> T + Send + Sync + 'static,
    T: Token,
{
    type TokenType = T;

    fn partition(&self, key: &[u8]) -> T {
        (self.func)(key)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F: Clone, T> Clone for FnPartitioner<F, T> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            name: self.name,
            _token: PhantomData,
        }
    }
}

impl<F, T> fmt::Debug for FnPartitioner<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPartitioner").field("name", &self.name).finish()
    }
}
