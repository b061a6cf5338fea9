//! Byte-keyed prefix trie mapping byte strings to integer values.
//!
//! Nodes live in a dense arena and are addressed by [`NodeId`]. Every node
//! carries a direct-indexed table of 256 child ids, so following an edge is a
//! single array load. Id 0 is reserved as the "no edge" sentinel and id 1 is
//! the root. Nodes are only ever appended; the trie never shrinks.
//!
//! Besides the usual [`Trie::put`] / [`Trie::get`], the trie exposes the
//! node-level walking API ([`Trie::walk`], [`Trie::is_terminal`],
//! [`Trie::value`]) and [`Trie::longest_match`], which the codec uses to find
//! the longest dictionary entry at each input position.

/// Largest node id the arena will hand out.
const MAX_NODE_ID: u32 = u32::MAX - 32;

/// Initial arena capacity, enough for the default dictionary.
const INITIAL_CAPACITY: usize = 512;

/// Index of a node in the trie arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel meaning "no such edge".
    pub const NIL: NodeId = NodeId(0);

    /// The root node, representing the empty key.
    pub const ROOT: NodeId = NodeId(1);

    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone)]
struct Node {
    /// `branches[b]` is the child reached by byte `b`, or [`NodeId::NIL`].
    branches: [NodeId; 256],
    value: usize,
    terminal: bool,
}

impl Node {
    fn new() -> Self {
        Node {
            branches: [NodeId::NIL; 256],
            value: 0,
            terminal: false,
        }
    }
}

/// A prefix tree over byte strings.
#[derive(Clone)]
pub struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Trie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie")
            .field("nodes", &self.node_count())
            .field(
                "terminals",
                &self.nodes.iter().skip(1).filter(|n| n.terminal).count(),
            )
            .finish()
    }
}

impl Trie {
    /// Create an empty trie containing only the root.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(INITIAL_CAPACITY);
        // Slot 0 backs the NIL sentinel and is never reachable.
        nodes.push(Node::new());
        nodes.push(Node::new());
        Trie { nodes }
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Insert `key -> value`, overwriting any previous value for `key`.
    ///
    /// Returns `true` if `key` was not present before.
    ///
    /// # Panics
    ///
    /// If the arena would need more than `u32::MAX - 32` nodes.
    pub fn put(&mut self, key: &[u8], value: usize) -> bool {
        let mut id = NodeId::ROOT;
        for &byte in key {
            id = match self.walk(id, byte) {
                Some(next) => next,
                None => self.push_child(id, byte),
            };
        }

        let node = &mut self.nodes[id.index()];
        node.value = value;
        let fresh = !node.terminal;
        node.terminal = true;
        fresh
    }

    fn push_child(&mut self, parent: NodeId, byte: u8) -> NodeId {
        let raw = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        assert!(raw <= MAX_NODE_ID, "too many nodes");
        let child = NodeId(raw);
        self.nodes.push(Node::new());
        self.nodes[parent.index()].branches[byte as usize] = child;
        child
    }

    /// Look up the value stored for `key`.
    pub fn get(&self, key: &[u8]) -> Option<usize> {
        let mut id = NodeId::ROOT;
        for &byte in key {
            id = self.walk(id, byte)?;
        }
        self.is_terminal(id).then(|| self.nodes[id.index()].value)
    }

    /// Follow the edge labelled `byte` out of `node`.
    #[inline]
    pub fn walk(&self, node: NodeId, byte: u8) -> Option<NodeId> {
        let next = self.nodes[node.index()].branches[byte as usize];
        (next != NodeId::NIL).then_some(next)
    }

    /// Whether the path from the root to `node` is a key in the trie.
    ///
    /// If the root is terminal, the empty key is present.
    #[inline]
    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes[node.index()].terminal
    }

    /// The value stored at `node`.
    ///
    /// # Panics
    ///
    /// If `node` is not terminal.
    #[inline]
    pub fn value(&self, node: NodeId) -> usize {
        let node = &self.nodes[node.index()];
        assert!(node.terminal, "value requested for non-terminal node");
        node.value
    }

    /// Find the longest key that is a prefix of `input`.
    ///
    /// Returns `(length, value)` for that key, or `None` if no non-empty key
    /// prefixes `input`. The walk continues past shorter keys, so with keys
    /// `"th"` and `"the"` the input `"then"` matches `"the"`.
    #[inline]
    pub fn longest_match(&self, input: &[u8]) -> Option<(usize, usize)> {
        let mut node = NodeId::ROOT;
        let mut best = None;
        for (i, &byte) in input.iter().enumerate() {
            let Some(next) = self.walk(node, byte) else {
                break;
            };
            node = next;
            if self.is_terminal(node) {
                best = Some((i + 1, self.nodes[node.index()].value));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trie_has_only_root() {
        let trie = Trie::new();
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.root(), NodeId::ROOT);
        assert!(!trie.is_terminal(trie.root()));
        assert_eq!(trie.get(b""), None);
        assert_eq!(trie.get(b"a"), None);
    }

    #[test]
    fn test_put_and_get() {
        let mut trie = Trie::new();
        assert!(trie.put(b"the", 1));
        assert!(trie.put(b"th", 17));
        assert!(trie.put(b"a", 4));

        assert_eq!(trie.get(b"the"), Some(1));
        assert_eq!(trie.get(b"th"), Some(17));
        assert_eq!(trie.get(b"a"), Some(4));
        assert_eq!(trie.get(b"t"), None);
        assert_eq!(trie.get(b"then"), None);
        assert_eq!(trie.get(b"b"), None);
    }

    #[test]
    fn test_put_overwrites_without_new_nodes() {
        let mut trie = Trie::new();
        assert!(trie.put(b"http://", 0));
        let nodes = trie.node_count();

        assert!(!trie.put(b"http://", 67));
        assert_eq!(trie.get(b"http://"), Some(67));
        assert_eq!(trie.node_count(), nodes);
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        let mut trie = Trie::new();
        trie.put(b"abc", 0);
        assert_eq!(trie.node_count(), 4);
        trie.put(b"abd", 1);
        assert_eq!(trie.node_count(), 5);
        trie.put(b"ab", 2);
        assert_eq!(trie.node_count(), 5);
    }

    #[test]
    fn test_empty_key_marks_root() {
        let mut trie = Trie::new();
        assert!(trie.put(b"", 9));
        assert!(trie.is_terminal(trie.root()));
        assert_eq!(trie.get(b""), Some(9));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_walk() {
        let mut trie = Trie::new();
        trie.put(b"of", 5);

        let o = trie.walk(trie.root(), b'o').unwrap();
        assert!(!trie.is_terminal(o));
        let of = trie.walk(o, b'f').unwrap();
        assert!(trie.is_terminal(of));
        assert_eq!(trie.value(of), 5);

        assert_eq!(trie.walk(of, b' '), None);
        assert_eq!(trie.walk(trie.root(), b'x'), None);
    }

    #[test]
    #[should_panic(expected = "value requested for non-terminal node")]
    fn test_value_on_non_terminal_panics() {
        let mut trie = Trie::new();
        trie.put(b"ab", 0);
        let a = trie.walk(trie.root(), b'a').unwrap();
        trie.value(a);
    }

    #[test]
    fn test_longest_match_prefers_longest() {
        let mut trie = Trie::new();
        trie.put(b"t", 3);
        trie.put(b"th", 17);
        trie.put(b"the", 1);
        trie.put(b"there", 199);

        assert_eq!(trie.longest_match(b"then"), Some((3, 1)));
        assert_eq!(trie.longest_match(b"therefore"), Some((5, 199)));
        assert_eq!(trie.longest_match(b"thx"), Some((2, 17)));
        assert_eq!(trie.longest_match(b"x"), None);
        assert_eq!(trie.longest_match(b""), None);
    }

    #[test]
    fn test_longest_match_skips_non_terminal_tail() {
        let mut trie = Trie::new();
        trie.put(b"a", 0);
        trie.put(b"abcd", 1);

        // "abc" is only an interior path, so the best hit stays at "a".
        assert_eq!(trie.longest_match(b"abc"), Some((1, 0)));
        assert_eq!(trie.longest_match(b"abce"), Some((1, 0)));
        assert_eq!(trie.longest_match(b"abcd"), Some((4, 1)));
    }

    #[test]
    fn test_every_byte_value_as_key() {
        let mut trie = Trie::new();
        for b in 0..=255u8 {
            assert!(trie.put(&[b, b], b as usize));
        }
        for b in 0..=255u8 {
            assert_eq!(trie.get(&[b, b]), Some(b as usize));
            assert_eq!(trie.get(&[b]), None);
        }
        assert_eq!(trie.node_count(), 1 + 256 * 2);
    }
}
