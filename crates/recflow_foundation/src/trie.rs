//! Wildcard pattern index.
//!
//! A trie over pattern characters in which `*` matches zero or more
//! characters and `?` matches exactly one. Lookups simulate the resulting
//! non-deterministic automaton breadth-first: every key character advances
//! the whole frontier of active nodes in one synchronous step, so the cost
//! is `O(key length × frontier size)` and no backtracking happens.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. A node
//! reached through a `*` edge links back to itself on `*`.

use std::collections::HashMap;

/// Matches zero or more characters.
pub const STAR_WILDCARD: char = '*';

/// Matches exactly one character.
pub const Q_WILDCARD: char = '?';

/// Separates alternative patterns sharing one payload.
pub const OR_SEPARATOR: char = '|';

/// Returns true if `text` uses any pattern syntax.
#[must_use]
pub fn has_wildcard(text: &str) -> bool {
    text.contains([STAR_WILDCARD, Q_WILDCARD, OR_SEPARATOR])
}

/// Stable index of a node in the trie arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node<P> {
    links: HashMap<char, NodeId>,
    values: Vec<P>,
}

impl<P> Node<P> {
    fn new() -> Self {
        Self {
            links: HashMap::new(),
            values: Vec::new(),
        }
    }
}

/// Working sets for a lookup.
///
/// Owned by the caller so the trie itself stays immutable during lookups.
/// Reusing one scratch across many lookups avoids reallocating the frontier.
#[derive(Clone, Debug, Default)]
pub struct LookupScratch {
    current: Vec<NodeId>,
    next: Vec<NodeId>,
    marks: Vec<bool>,
}

impl LookupScratch {
    /// Creates empty working sets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, node_count: usize) {
        self.current.clear();
        self.next.clear();
        self.marks.clear();
        self.marks.resize(node_count, false);
    }

    /// Promotes the next frontier to current and clears membership marks.
    fn advance(&mut self) {
        for id in &self.next {
            self.marks[id.0] = false;
        }
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }
}

/// Index from wildcard patterns to payloads.
///
/// Patterns are inserted during a build phase and never removed. Lookups
/// take `&self`, so a built trie can be shared read-only across threads.
///
/// ```
/// use recflow_foundation::WildcardTrie;
///
/// let mut trie = WildcardTrie::new();
/// trie.insert("ab*cd", 1);
/// trie.insert("a?c|xyz", 2);
///
/// assert_eq!(trie.lookup("abXXXcd"), vec![1]);
/// assert_eq!(trie.lookup("abc"), vec![2]);
/// assert_eq!(trie.lookup("xyz"), vec![2]);
/// assert!(trie.lookup("abXXXc").is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct WildcardTrie<P> {
    nodes: Vec<Node<P>>,
    patterns: usize,
}

impl<P: Clone + PartialEq> WildcardTrie<P> {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            patterns: 0,
        }
    }

    /// Returns the number of alternatives inserted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns
    }

    /// Returns true if nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns == 0
    }

    /// Returns the number of nodes in the arena, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registers `payload` under every `|`-separated alternative of `pattern`.
    ///
    /// A payload already attached to the same pattern is not duplicated.
    pub fn insert(&mut self, pattern: &str, payload: P) {
        for alternative in pattern.split(OR_SEPARATOR) {
            self.insert_one(alternative, payload.clone());
        }
    }

    fn insert_one(&mut self, pattern: &str, payload: P) {
        let mut node = NodeId::ROOT;
        for c in pattern.chars() {
            node = match self.next(node, c) {
                Some(next) => next,
                None => self.add_next(node, c),
            };
        }
        let values = &mut self.nodes[node.0].values;
        if !values.contains(&payload) {
            values.push(payload);
        }
        self.patterns += 1;
        tracing::trace!(pattern, node = node.0, "registered trie pattern");
    }

    fn add_next(&mut self, from: NodeId, c: char) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new();
        if c == STAR_WILDCARD {
            node.links.insert(STAR_WILDCARD, id);
        }
        self.nodes.push(node);
        self.nodes[from.0].links.insert(c, id);
        id
    }

    fn next(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.nodes[node.0].links.get(&c).copied()
    }

    /// Adds `node` to the next frontier, together with its `*` child.
    ///
    /// The `*` child matches zero characters, so it is active whenever its
    /// parent is.
    fn admit(&self, node: NodeId, scratch: &mut LookupScratch) {
        let mut pending = Some(node);
        while let Some(id) = pending.take() {
            if !scratch.marks[id.0] {
                scratch.marks[id.0] = true;
                scratch.next.push(id);
            }
            if let Some(star) = self.next(id, STAR_WILDCARD) {
                if star != id && !scratch.marks[star.0] {
                    pending = Some(star);
                }
            }
        }
    }

    /// Returns every payload whose pattern matches `key`.
    ///
    /// Payloads appear once each, ordered by the creation of the node they
    /// are attached to and then by insertion.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Vec<P> {
        let mut scratch = LookupScratch::new();
        self.lookup_with(key, &mut scratch)
    }

    /// Like [`lookup`](Self::lookup), reusing caller-owned working sets.
    #[must_use]
    pub fn lookup_with(&self, key: &str, scratch: &mut LookupScratch) -> Vec<P> {
        self.run(key, scratch);

        let mut frontier = scratch.current.clone();
        frontier.sort_unstable();

        let mut matches = Vec::new();
        for id in frontier {
            for value in &self.nodes[id.0].values {
                if !matches.contains(value) {
                    matches.push(value.clone());
                }
            }
        }
        matches
    }

    /// Returns true if any pattern matches `key`.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let mut scratch = LookupScratch::new();
        self.run(key, &mut scratch);
        scratch
            .current
            .iter()
            .any(|id| !self.nodes[id.0].values.is_empty())
    }

    /// Runs the automaton over `key`, leaving the final frontier in
    /// `scratch.current`.
    fn run(&self, key: &str, scratch: &mut LookupScratch) {
        scratch.reset(self.nodes.len());
        self.admit(NodeId::ROOT, scratch);
        scratch.advance();

        for c in key.chars() {
            if scratch.current.is_empty() {
                break;
            }
            let frontier = std::mem::take(&mut scratch.current);
            for &node in &frontier {
                if let Some(literal) = self.next(node, c) {
                    self.admit(literal, scratch);
                }
                if let Some(any) = self.next(node, Q_WILDCARD) {
                    self.admit(any, scratch);
                }
                if let Some(star) = self.next(node, STAR_WILDCARD) {
                    self.admit(star, scratch);
                    if star != node {
                        if let Some(after) = self.next(star, c) {
                            self.admit(after, scratch);
                        }
                    }
                }
            }
            scratch.current = frontier;
            scratch.advance();
        }
    }
}

impl<P: Clone + PartialEq> Default for WildcardTrie<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl WildcardTrie<()> {
    /// Builds a trie holding a single pattern, for one-off matching.
    #[must_use]
    pub fn single(pattern: &str) -> Self {
        let mut trie = Self::new();
        trie.insert(pattern, ());
        trie
    }
}
