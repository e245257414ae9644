//! Node sets used as automaton state.

use std::fmt;
use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;

use crate::graph::NodeId;

/// A set of nodes backed by a growable bit set.
///
/// Equality and hashing follow set semantics: two sets with the same members
/// compare equal regardless of their capacity.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set sized for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a set containing a single node.
    pub fn singleton(node: NodeId) -> Self {
        let mut set = Self::with_capacity(node.index() + 1);
        set.insert(node);
        set
    }

    /// Insert a node, returning `true` if it was not already present.
    pub fn insert(&mut self, node: NodeId) -> bool {
        let idx = node.index();
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        !self.bits.put(idx)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.bits.contains(node.index())
    }

    /// Remove a node, returning `true` if it was present.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let idx = node.index();
        if idx >= self.bits.len() || !self.bits.contains(idx) {
            return false;
        }
        self.bits.set(idx, false);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate members in ascending handle order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bits.ones().map(|i| NodeId(i as u32))
    }

    /// Add every member of `other` to this set.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.iter().all(|n| other.contains(n))
    }

    pub fn is_superset(&self, other: &StateSet) -> bool {
        other.is_subset(self)
    }

    /// Members of this set that are not in `other`.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        self.iter().filter(|n| !other.contains(*n)).collect()
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.iter().collect()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.bits.ones().eq(other.bits.ones())
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for idx in self.bits.ones() {
            idx.hash(state);
        }
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<NodeId> for StateSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<NodeId> for StateSet {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        for node in iter {
            self.insert(node);
        }
    }
}
