//! Per-search visited tracking.
//!
//! Two strategies share the [`VisitedSet`] contract. The bitset packs one bit
//! per node id and is the right choice for dense ids; the hash set only pays
//! for ids actually seen.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Membership tracking for node ids within one search.
pub trait VisitedSet {
    fn contains(&self, id: NodeId) -> bool;

    /// Mark `id` as visited. Returns `true` if it was not visited before.
    fn insert(&mut self, id: NodeId) -> bool;
}

/// One bit per id, growing on demand past the initial capacity.
#[derive(Debug, Clone, Default)]
pub struct BitsetVisitedSet {
    words: Vec<u64>,
}

impl BitsetVisitedSet {
    /// Pre-size for ids in `[0, capacity)`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
        }
    }
}

impl VisitedSet for BitsetVisitedSet {
    #[inline]
    fn contains(&self, id: NodeId) -> bool {
        let (word, bit) = (id as usize / 64, id % 64);
        self.words
            .get(word)
            .map_or(false, |w| w & (1u64 << bit) != 0)
    }

    #[inline]
    fn insert(&mut self, id: NodeId) -> bool {
        let (word, bit) = (id as usize / 64, id % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }
}

#[derive(Debug, Clone, Default)]
pub struct HashVisitedSet {
    ids: HashSet<NodeId>,
}

impl VisitedSet for HashVisitedSet {
    #[inline]
    fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    #[inline]
    fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }
}

/// Which [`VisitedSet`] a graph allocates for each layer search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitedKind {
    /// Bitset sized to the node store's next id.
    #[default]
    Bitset,
    Hash,
}

/// Runtime choice between the two strategies without boxing.
#[derive(Debug, Clone)]
pub(crate) enum Visited {
    Bitset(BitsetVisitedSet),
    Hash(HashVisitedSet),
}

impl Visited {
    pub(crate) fn new(kind: VisitedKind, capacity: usize) -> Self {
        match kind {
            VisitedKind::Bitset => Self::Bitset(BitsetVisitedSet::with_capacity(capacity)),
            VisitedKind::Hash => Self::Hash(HashVisitedSet::default()),
        }
    }
}

impl VisitedSet for Visited {
    #[inline]
    fn contains(&self, id: NodeId) -> bool {
        match self {
            Self::Bitset(set) => set.contains(id),
            Self::Hash(set) => set.contains(id),
        }
    }

    #[inline]
    fn insert(&mut self, id: NodeId) -> bool {
        match self {
            Self::Bitset(set) => set.insert(id),
            Self::Hash(set) => set.insert(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(set: &mut dyn VisitedSet) {
        assert!(!set.contains(0));
        assert!(set.insert(0));
        assert!(!set.insert(0));
        assert!(set.contains(0));

        assert!(set.insert(63));
        assert!(set.insert(64));
        assert!(set.insert(1_000));
        assert!(set.contains(63) && set.contains(64) && set.contains(1_000));
        assert!(!set.contains(65));
        assert!(!set.contains(999));
    }

    #[test]
    fn test_bitset_visited() {
        exercise(&mut BitsetVisitedSet::with_capacity(10));
        exercise(&mut BitsetVisitedSet::default());
    }

    #[test]
    fn test_hash_visited() {
        exercise(&mut HashVisitedSet::default());
    }

    #[test]
    fn test_dispatch() {
        exercise(&mut Visited::new(VisitedKind::Bitset, 128));
        exercise(&mut Visited::new(VisitedKind::Hash, 0));
    }
}
