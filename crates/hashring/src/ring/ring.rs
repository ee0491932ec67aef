//! Hash ring data structure.
//!
//! Anchors live in a single `BTreeMap<Token, NodeId>`, so the sorted position
//! index and the position → node mapping cannot drift apart. The map and the
//! member set sit behind one reader-writer lock: `add`/`remove` hold the write
//! lock for the whole batch, lookups share the read lock.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::{HashKind, Partitioner, Sha1Partitioner};
use crate::token::Token;
use crate::topology::RingTopology;
use crate::vnode::VirtualNode;

/// Anchors per node when none is configured.
pub const DEFAULT_VNODES: usize = 10;

#[derive(Debug, Clone)]
struct RingState<T: Token> {
    /// Anchor position -> owning node, in ring order.
    anchors: BTreeMap<T, NodeId>,
    /// Nodes currently on the ring.
    members: BTreeSet<NodeId>,
    /// Earlier owners of positions taken over by a colliding anchor, oldest
    /// first.
    shadowed: BTreeMap<T, Vec<NodeId>>,
}

impl<T: Token> RingState<T> {
    fn new() -> Self {
        Self {
            anchors: BTreeMap::new(),
            members: BTreeSet::new(),
            shadowed: BTreeMap::new(),
        }
    }

    /// Place an anchor of `node` at `token`, remembering any owner it displaces.
    fn claim(&mut self, token: T, node: &NodeId, index: usize) {
        if let Some(displaced) = self.anchors.insert(token.clone(), node.clone()) {
            warn!(%node, index, %displaced, "anchor collision, position reassigned");
            self.shadowed.entry(token).or_default().push(displaced);
        }
    }

    /// Drop `node`'s claim on `token`. If `node` held the position it goes
    /// back to the most recent displaced owner still on the ring.
    fn release(&mut self, token: &T, node: &NodeId) {
        if let Some(stack) = self.shadowed.get_mut(token) {
            stack.retain(|owner| owner != node);
        }
        if self.anchors.get(token) == Some(node) {
            match self.shadowed.get_mut(token).and_then(Vec::pop) {
                Some(heir) => {
                    trace!(%node, %heir, "position handed back to displaced owner");
                    self.anchors.insert(token.clone(), heir);
                }
                None => {
                    self.anchors.remove(token);
                }
            }
        }
        if self.shadowed.get(token).is_some_and(Vec::is_empty) {
            self.shadowed.remove(token);
        }
    }

    /// First anchor at or after `token`, wrapping to the smallest anchor.
    fn successor(&self, token: &T) -> Option<(&T, &NodeId)> {
        self.anchors
            .range::<T, _>(token..)
            .next()
            .or_else(|| self.anchors.iter().next())
    }

    /// Owners of every anchor, clockwise from `token`, exactly one revolution.
    fn walk<'a>(&'a self, token: &T) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.anchors
            .range::<T, _>(token..)
            .chain(self.anchors.range::<T, _>(..token))
            .map(|(_, node)| node)
    }
}

/// Consistent hash ring mapping keys onto a dynamic set of nodes.
///
/// Each node owns `vnodes` anchors placed at `hash("<node>-<index>")`. A key
/// belongs to the first anchor clockwise from `hash(key)`; its replicas are
/// the next distinct nodes met walking further clockwise.
///
/// All methods take `&self`; share the ring across threads behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use hashring::HashRing;
///
/// let ring: HashRing = HashRing::default();
/// ring.add(["server01", "server02", "server03", "server04", "server05"]);
/// let replicas = ring.mget("my-object-key", 3).unwrap();
/// assert_eq!(replicas, ["server01", "server04", "server03"]);
/// ```
pub struct HashRing<P: Partitioner = Sha1Partitioner> {
    vnodes: usize,
    partitioner: P,
    state: RwLock<RingState<P::TokenType>>,
}

impl HashRing<Sha1Partitioner> {
    /// Empty SHA-1 ring with `vnodes` anchors per node.
    ///
    /// # Errors
    /// `InvalidArgument` if `vnodes` is zero.
    pub fn new(vnodes: usize) -> Result<Self> {
        Self::with_partitioner(vnodes, Sha1Partitioner)
    }

    /// SHA-1 ring holding `config.nodes`.
    ///
    /// # Errors
    /// `InvalidArgument` if the config fails [`RingConfig::validate`] or names
    /// a hash other than SHA-1; build those through [`RingConfig::builder`]
    /// with the matching partitioner.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        if config.hash != HashKind::Sha1 {
            return Err(Error::InvalidArgument(format!(
                "from_config builds SHA-1 rings, config asks for {}",
                config.hash
            )));
        }
        config.builder().build()
    }
}

impl Default for HashRing<Sha1Partitioner> {
    /// Empty SHA-1 ring with [`DEFAULT_VNODES`] anchors per node.
    fn default() -> Self {
        Self::from_parts(DEFAULT_VNODES, Sha1Partitioner)
    }
}

impl<P: Partitioner> HashRing<P> {
    /// Empty ring hashing with `partitioner`. Both `vnodes` and the
    /// partitioner are fixed for the lifetime of the ring.
    ///
    /// # Errors
    /// `InvalidArgument` if `vnodes` is zero.
    pub fn with_partitioner(vnodes: usize, partitioner: P) -> Result<Self> {
        if vnodes == 0 {
            return Err(Error::InvalidArgument("vnodes must be positive".into()));
        }
        Ok(Self::from_parts(vnodes, partitioner))
    }

    fn from_parts(vnodes: usize, partitioner: P) -> Self {
        Self {
            vnodes,
            partitioner,
            state: RwLock::new(RingState::new()),
        }
    }

    /// Add nodes to the ring, placing `vnodes` anchors for each.
    ///
    /// Adding is idempotent per node: a node already on the ring (or repeated
    /// within `nodes`) is skipped with a warning. If an anchor lands exactly on
    /// an existing position the newer node takes that position over until it
    /// is removed.
    ///
    /// # Performance
    /// O(m · log k) for m new anchors on a ring of k anchors.
    pub fn add<I>(&self, nodes: I)
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        let mut guard = self.state.write();
        let state = &mut *guard;

        for node in nodes {
            let node = node.into();
            if state.members.contains(&node) {
                warn!(%node, "node already on ring, skipping");
                continue;
            }

            for vnode in VirtualNode::all_for(&self.partitioner, &node, self.vnodes) {
                state.claim(vnode.token, &node, vnode.index);
            }

            debug!(%node, vnodes = self.vnodes, anchors = state.anchors.len(), "added node to ring");
            state.members.insert(node);
        }
    }

    /// Remove nodes and all of their anchors from the ring.
    ///
    /// Nodes are removed in order. If a node is not on the ring this returns
    /// `NodeNotFound` for it; nodes earlier in the batch stay removed and
    /// later ones are untouched. A position this node took over from a
    /// colliding anchor returns to its previous owner.
    ///
    /// # Performance
    /// O(m · log k) for m removed anchors on a ring of k anchors.
    pub fn remove<I>(&self, nodes: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        let mut guard = self.state.write();
        let state = &mut *guard;

        for node in nodes {
            let node = node.into();
            if !state.members.remove(&node) {
                return Err(Error::NodeNotFound(node));
            }

            for vnode in VirtualNode::all_for(&self.partitioner, &node, self.vnodes) {
                state.release(&vnode.token, &node);
            }

            debug!(%node, anchors = state.anchors.len(), "removed node from ring");
        }

        Ok(())
    }

    /// Node responsible for `key`: the owner of the first anchor at or after
    /// `hash(key)`, wrapping past the largest anchor to the smallest.
    ///
    /// # Errors
    /// `EmptyRing` if no node has been added.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<NodeId> {
        self.get_anchor(key).map(|(_, node)| node)
    }

    /// Like [`get`](Self::get), also returning the position of the selected
    /// anchor.
    pub fn get_anchor(&self, key: impl AsRef<[u8]>) -> Result<(P::TokenType, NodeId)> {
        let token = self.token_for(key);
        let state = self.state.read();
        state
            .successor(&token)
            .map(|(anchor, node)| (anchor.clone(), node.clone()))
            .ok_or(Error::EmptyRing)
    }

    /// Up to `n` distinct nodes for `key`, in ring-walk order starting at the
    /// node [`get`](Self::get) returns.
    ///
    /// The walk covers at most one revolution, so asking for more replicas
    /// than there are nodes returns every node on the ring.
    ///
    /// # Errors
    /// `InvalidArgument` if `n` is zero, `EmptyRing` if no node has been added.
    pub fn mget(&self, key: impl AsRef<[u8]>, n: usize) -> Result<Vec<NodeId>> {
        if n == 0 {
            return Err(Error::InvalidArgument("replica count must be positive".into()));
        }

        let token = self.token_for(key);
        let state = self.state.read();
        if state.anchors.is_empty() {
            return Err(Error::EmptyRing);
        }

        let wanted = n.min(state.members.len());
        let mut replicas: Vec<NodeId> = Vec::with_capacity(wanted);
        for node in state.walk(&token) {
            if !replicas.contains(node) {
                replicas.push(node.clone());
                if replicas.len() == wanted {
                    break;
                }
            }
        }

        trace!(requested = n, found = replicas.len(), "resolved replicas");
        Ok(replicas)
    }

    /// Position of `key` on the ring.
    #[inline]
    pub fn token_for(&self, key: impl AsRef<[u8]>) -> P::TokenType {
        self.partitioner.partition(key.as_ref())
    }

    /// Anchors per node.
    pub fn vnodes(&self) -> usize {
        self.vnodes
    }

    pub fn partitioner(&self) -> &P {
        &self.partitioner
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Number of distinct nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.state.read().members.len()
    }

    /// Number of anchors on the ring.
    pub fn token_count(&self) -> usize {
        self.state.read().anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().anchors.is_empty()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.state.read().members.contains(node)
    }

    /// Nodes on the ring, sorted by id.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.state.read().members.iter().cloned().collect()
    }

    /// Every `(anchor position, node)` pair in ring order.
    pub fn tokens(&self) -> Vec<(P::TokenType, NodeId)> {
        self.state
            .read()
            .anchors
            .iter()
            .map(|(token, node)| (token.clone(), node.clone()))
            .collect()
    }

    /// Consistent snapshot of the anchor layout for ownership analysis.
    pub fn topology(&self) -> RingTopology<P::TokenType> {
        RingTopology::from_sorted(self.tokens())
    }
}

impl<P: Partitioner + Clone> Clone for HashRing<P> {
    fn clone(&self) -> Self {
        Self {
            vnodes: self.vnodes,
            partitioner: self.partitioner.clone(),
            state: RwLock::new(self.state.read().clone()),
        }
    }
}

impl<P: Partitioner> fmt::Debug for HashRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("partitioner", &self.partitioner.name())
            .field("vnodes", &self.vnodes)
            .field("nodes", &state.members)
            .field("anchors", &state.anchors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::FnPartitioner;
    use crate::token::U64Token;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Anchor keys `"<n>-<i>"` land at `n * 100 + i`; any other key parses
    /// as a plain number.
    fn numeric_ring(vnodes: usize) -> HashRing<impl Partitioner<TokenType = U64Token>> {
        let p = FnPartitioner::new(|key: &[u8]| {
            let s = std::str::from_utf8(key).unwrap();
            match s.split_once('-') {
                Some((node, idx)) => U64Token(node.parse::<u64>().unwrap() * 100 + idx.parse::<u64>().unwrap()),
                None => U64Token(s.parse().unwrap()),
            }
        });
        HashRing::with_partitioner(vnodes, p).unwrap()
    }

    #[test]
    fn test_successor_exact_match_selects_anchor() {
        let ring = numeric_ring(2);
        ring.add(["1", "2"]); // anchors 100, 101, 200, 201
        assert_eq!(ring.get("101").unwrap(), "1");
        assert_eq!(ring.get_anchor("101").unwrap().0, U64Token(101));
        assert_eq!(ring.get("102").unwrap(), "2");
    }

    #[test]
    fn test_wraps_past_largest_anchor() {
        let ring = numeric_ring(2);
        ring.add(["1", "2"]);
        assert_eq!(ring.get("202").unwrap(), "1");
        assert_eq!(ring.get_anchor("999999").unwrap().0, U64Token(100));
        assert_eq!(ring.get("0").unwrap(), "1");
    }

    #[test]
    fn test_walk_wraps_once() {
        let ring = numeric_ring(1);
        ring.add(["1", "2", "3"]); // anchors 100, 200, 300
        assert_eq!(ring.mget("250", 3).unwrap(), ["3", "1", "2"]);
        assert_eq!(ring.mget("250", 10).unwrap(), ["3", "1", "2"]);
    }

    #[test]
    fn test_remove_keeps_colliding_anchor() {
        // Every anchor of every node hashes to the same position.
        let p = FnPartitioner::new(|_: &[u8]| U64Token(7));
        let ring = HashRing::with_partitioner(3, p).unwrap();
        ring.add(["a", "b"]);
        assert_eq!(ring.token_count(), 1);
        assert_eq!(ring.get("x").unwrap(), "b");

        ring.remove(["a"]).unwrap();
        assert_eq!(ring.token_count(), 1, "b still owns the shared position");
        assert_eq!(ring.get("x").unwrap(), "b");
    }

    #[test]
    fn test_remove_returns_position_to_displaced_owner() {
        let p = FnPartitioner::new(|_: &[u8]| U64Token(7));
        let ring = HashRing::with_partitioner(3, p).unwrap();
        ring.add(["a", "b"]);
        assert_eq!(ring.get("x").unwrap(), "b");

        ring.remove(["b"]).unwrap();
        assert_eq!(ring.nodes(), ["a"]);
        assert_eq!(ring.token_count(), 1);
        assert_eq!(ring.get("x").unwrap(), "a");
        assert_eq!(ring.mget("x", 2).unwrap(), ["a"]);

        ring.remove(["a"]).unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring.node_count(), 0);
        assert!(ring.state.read().shadowed.is_empty());
    }

    #[test]
    fn test_partial_collision_handback() {
        // Anchor "2-0" lands on "1-0"; every other anchor is distinct.
        let p = FnPartitioner::new(|key: &[u8]| match key {
            b"2-0" => U64Token(100),
            _ => {
                let s = std::str::from_utf8(key).unwrap();
                match s.split_once('-') {
                    Some((node, idx)) => U64Token(node.parse::<u64>().unwrap() * 100 + idx.parse::<u64>().unwrap()),
                    None => U64Token(s.parse().unwrap()),
                }
            }
        });
        let ring = HashRing::with_partitioner(2, p).unwrap();
        ring.add(["1", "2"]); // 100 -> 2, 101 -> 1, 201 -> 2
        assert_eq!(ring.token_count(), 3);
        assert_eq!(ring.get_anchor("100").unwrap(), (U64Token(100), NodeId::from("2")));

        ring.remove(["2"]).unwrap();
        assert_eq!(
            ring.tokens(),
            [(U64Token(100), NodeId::from("1")), (U64Token(101), NodeId::from("1"))]
        );
    }

    #[test]
    fn test_from_config() {
        let config = RingConfig {
            vnodes: 30,
            nodes: vec!["server01".into(), "server02".into()],
            ..RingConfig::default()
        };
        let ring = HashRing::from_config(&config).unwrap();
        assert_eq!(ring.vnodes(), 30);
        assert_eq!(ring.nodes(), ["server01", "server02"]);
        assert_eq!(ring.token_count(), 60);
        assert_eq!(ring.partitioner_name(), Sha1Partitioner.name());

        let zero = RingConfig { vnodes: 0, ..config.clone() };
        assert!(matches!(HashRing::from_config(&zero), Err(Error::InvalidArgument(_))));
        let xxh3 = RingConfig {
            hash: HashKind::Xxh3,
            ..config
        };
        assert!(matches!(HashRing::from_config(&xxh3), Err(Error::InvalidArgument(_))));
    }

    /// Counts `WARN` events seen by the thread-local subscriber.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_duplicate_add_warns() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let ring: HashRing = HashRing::default();

        tracing::subscriber::with_default(subscriber, || {
            ring.add(["server01", "server02"]);
            assert_eq!(warnings.load(Ordering::SeqCst), 0);
            ring.add(["server01", "server03", "server03"]);
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 2);
        assert_eq!(ring.token_count(), 30);
    }

    #[test]
    fn test_debug_output() {
        let ring: HashRing = HashRing::default();
        ring.add(["server01"]);
        let debug = format!("{:?}", ring);
        assert!(debug.contains("Sha1Partitioner"));
        assert!(debug.contains("anchors: 10"));
    }
}
