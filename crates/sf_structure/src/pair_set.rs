//! Base pairs as packed integer keys.
//!
//! A `PairSet` answers membership questions about a structure: which
//! enforced pairs survived a constrained fold, how far apart two members
//! of an ensemble are. Positions are 0-based indices into the full
//! dot-bracket string, separators included, so a pair across strands
//! looks exactly like one within a strand.

use std::fmt;
use itertools::Itertools;
use nohash_hasher::IntSet;

use crate::PairTable;
use crate::NAIDX;
use crate::P1KEY;

/// A base pair between positions `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    i: NAIDX,
    j: NAIDX,
}

impl Pair {
    pub fn new(i: NAIDX, j: NAIDX) -> Self {
        debug_assert!(i < j, "pair ({i},{j}) is not ordered");
        Pair { i, j }
    }

    pub fn i(&self) -> NAIDX {
        self.i
    }

    pub fn j(&self) -> NAIDX {
        self.j
    }

    /// `i` in the upper half, `j` in the lower half.
    pub fn key(&self) -> P1KEY {
        (P1KEY::from(self.i) << NAIDX::BITS) | P1KEY::from(self.j)
    }

    pub fn from_key(key: P1KEY) -> Self {
        Pair::new((key >> NAIDX::BITS) as NAIDX, key as NAIDX)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    length: usize,
    keys: IntSet<P1KEY>,
}

impl PairSet {
    /// An empty set over a structure of `length` positions.
    pub fn new(length: usize) -> Self {
        PairSet { length, keys: IntSet::default() }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn insert(&mut self, pair: Pair) -> bool {
        debug_assert!((pair.j() as usize) < self.length);
        self.keys.insert(pair.key())
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.keys.contains(&pair.key())
    }

    /// Pairs in 5' to 3' order of their opening position.
    pub fn to_vec(&self) -> Vec<Pair> {
        sorted(self.keys.iter())
    }

    /// Pairs of `self` that `other` lacks, in 5' to 3' order.
    pub fn missing_from(&self, other: &PairSet) -> Vec<Pair> {
        sorted(self.keys.difference(&other.keys))
    }

    pub fn is_subset(&self, other: &PairSet) -> bool {
        self.keys.is_subset(&other.keys)
    }
}

fn sorted<'a>(keys: impl Iterator<Item = &'a P1KEY>) -> Vec<Pair> {
    // The key order is the (i, j) order.
    keys.copied().sorted_unstable().map(Pair::from_key).collect()
}

impl From<&PairTable> for PairSet {
    fn from(pt: &PairTable) -> Self {
        PairSet {
            length: pt.len(),
            keys: pt.pairs().map(|(i, j)| Pair::new(i, j).key()).collect(),
        }
    }
}

impl fmt::Display for PairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_vec().iter().join(","))
    }
}
