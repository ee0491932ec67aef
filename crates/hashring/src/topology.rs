//! Ring topology: ownership and range views over a ring snapshot.
//!
//! A [`RingTopology`] is taken under the ring's read lock and is independent
//! of the ring afterwards, so analysis never blocks writers.

use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::token::Token;

/// The span of positions `(start, end]` served by one anchor.
///
/// The range of the smallest anchor wraps: its `start` is the largest anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRange<T: Token> {
    /// Previous anchor clockwise (exclusive).
    pub start: T,
    /// The anchor itself (inclusive).
    pub end: T,
    /// Owner of `end`.
    pub node: NodeId,
}

impl<T: Token> TokenRange<T> {
    /// Share of the ring covered by this range.
    pub fn fraction(&self) -> f64 {
        self.start.distance_to(&self.end).ring_fraction()
    }
}

/// Immutable view of anchor placement.
#[derive(Debug, Clone)]
pub struct RingTopology<T: Token> {
    anchors: Vec<(T, NodeId)>,
}

impl<T: Token> RingTopology<T> {
    /// Build from anchors in any order.
    pub fn new(mut anchors: Vec<(T, NodeId)>) -> Self {
        anchors.sort_by(|a, b| a.0.cmp(&b.0));
        Self { anchors }
    }

    pub(crate) fn from_sorted(anchors: Vec<(T, NodeId)>) -> Self {
        debug_assert!(anchors.windows(2).all(|w| w[0].0 < w[1].0));
        Self { anchors }
    }

    pub fn anchors(&self) -> &[(T, NodeId)] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Ranges in ring order, starting with the wrapping range of the smallest
    /// anchor.
    pub fn ranges(&self) -> Vec<TokenRange<T>> {
        let Some((last, _)) = self.anchors.last() else {
            return Vec::new();
        };

        let mut start = last.clone();
        let mut ranges = Vec::with_capacity(self.anchors.len());
        for (token, node) in &self.anchors {
            ranges.push(TokenRange {
                start,
                end: token.clone(),
                node: node.clone(),
            });
            start = token.clone();
        }
        ranges
    }

    /// Fraction of the ring each node owns. Fractions sum to ~1.0.
    pub fn ownership(&self) -> BTreeMap<NodeId, f64> {
        let mut owned = BTreeMap::new();
        if let [(_, only)] = self.anchors.as_slice() {
            owned.insert(only.clone(), 1.0);
            return owned;
        }

        for range in self.ranges() {
            *owned.entry(range.node.clone()).or_insert(0.0) += range.fraction();
        }
        owned
    }

    /// Anchor positions owned by `node`, ascending.
    pub fn anchors_of(&self, node: &str) -> Vec<T> {
        self.anchors
            .iter()
            .filter(|(_, owner)| owner.as_str() == node)
            .map(|(token, _)| token.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::U64Token;

    const QUARTER: u64 = 1 << 62;

    fn topology() -> RingTopology<U64Token> {
        RingTopology::new(vec![
            (U64Token(3 * QUARTER), NodeId::from("c")),
            (U64Token(QUARTER), NodeId::from("a")),
            (U64Token(2 * QUARTER), NodeId::from("b")),
        ])
    }

    #[test]
    fn test_ranges_wrap() {
        let ranges = topology().ranges();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].start, U64Token(3 * QUARTER));
        assert_eq!(ranges[0].end, U64Token(QUARTER));
        assert_eq!(ranges[0].node, "a");
        assert_eq!(ranges[2].start, U64Token(2 * QUARTER));
    }

    #[test]
    fn test_ownership() {
        let owned = topology().ownership();
        assert!((owned["a"] - 0.5).abs() < 1e-12);
        assert!((owned["b"] - 0.25).abs() < 1e-12);
        assert!((owned["c"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_single_anchor_owns_everything() {
        let topo = RingTopology::new(vec![(U64Token(42), NodeId::from("solo"))]);
        assert_eq!(topo.ownership()["solo"], 1.0);
    }

    #[test]
    fn test_empty() {
        let topo: RingTopology<U64Token> = RingTopology::new(Vec::new());
        assert!(topo.is_empty());
        assert!(topo.ranges().is_empty());
        assert!(topo.ownership().is_empty());
    }

    #[test]
    fn test_anchors_of() {
        assert_eq!(topology().anchors_of("b"), vec![U64Token(2 * QUARTER)]);
        assert!(topology().anchors_of("z").is_empty());
    }
}
