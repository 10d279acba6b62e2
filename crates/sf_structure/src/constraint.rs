//! Hard structure constraints for (multi-stranded) folding.
//!
//! A constraint is written as a string aligned with the concatenated
//! sequence. Every position carries its raw symbol together with a
//! `ConstraintTag`, so that the meaning of a symbol never depends on who
//! reads it:
//!
//! | symbol  | tag                  | meaning                                          |
//! |---------|----------------------|--------------------------------------------------|
//! | `.`     | `Free`               | no restriction                                   |
//! | `(` `)` | `Free`               | pair with the bracket partner or stay unpaired   |
//! | `(` `)` | `EnforcedPair`       | must pair with the bracket partner               |
//! | `\|`    | `EnforcedPair`       | must be paired, with any partner                 |
//! | `e`     | `DanglingExternal`   | may only pair across a strand boundary           |
//! | `x`     | `IntramolecularOnly` | may only pair within its own strand              |
//! | `&`     | `Separator`          | strand boundary                                  |
//!
//! Brackets are the only ambiguous symbols; `BoundaryMode` decides how they
//! are tagged when a constraint is built from a structure or parsed.

use std::fmt;
use std::ops::Index;

use serde::Serialize;
use serde::Serializer;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::Pair;
use crate::PairSet;
use crate::StructureError;
use crate::NAIDX;
use crate::SEPARATOR;

/// How strictly brackets inherited from a known structure are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BoundaryMode {
    /// Bracket pairs are allowed, but the bases may also stay unpaired.
    #[default]
    Soft,
    /// Bracket pairs must hold.
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintTag {
    Free,
    DanglingExternal,
    IntramolecularOnly,
    EnforcedPair,
    Separator,
}

/// One position of a constraint: the raw symbol and its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintSite {
    symbol: char,
    tag: ConstraintTag,
}

impl ConstraintSite {
    pub const fn free() -> Self {
        ConstraintSite { symbol: '.', tag: ConstraintTag::Free }
    }

    pub const fn dangling() -> Self {
        ConstraintSite { symbol: 'e', tag: ConstraintTag::DanglingExternal }
    }

    pub const fn intramolecular() -> Self {
        ConstraintSite { symbol: 'x', tag: ConstraintTag::IntramolecularOnly }
    }

    pub const fn paired() -> Self {
        ConstraintSite { symbol: '|', tag: ConstraintTag::EnforcedPair }
    }

    pub const fn separator() -> Self {
        ConstraintSite { symbol: SEPARATOR, tag: ConstraintTag::Separator }
    }

    /// Inherit one position of a known structure.
    pub fn from_dotbracket(db: DotBracket, mode: BoundaryMode) -> Self {
        let tag = match mode {
            BoundaryMode::Soft => ConstraintTag::Free,
            BoundaryMode::Hard => ConstraintTag::EnforcedPair,
        };
        match db {
            DotBracket::Unpaired => ConstraintSite::free(),
            DotBracket::Open => ConstraintSite { symbol: '(', tag },
            DotBracket::Close => ConstraintSite { symbol: ')', tag },
            DotBracket::Break => ConstraintSite::separator(),
        }
    }

    pub fn parse(c: char, mode: BoundaryMode) -> Option<Self> {
        match c {
            '.' => Some(ConstraintSite::free()),
            'e' => Some(ConstraintSite::dangling()),
            'x' => Some(ConstraintSite::intramolecular()),
            '|' => Some(ConstraintSite::paired()),
            SEPARATOR => Some(ConstraintSite::separator()),
            '(' => Some(ConstraintSite::from_dotbracket(DotBracket::Open, mode)),
            ')' => Some(ConstraintSite::from_dotbracket(DotBracket::Close, mode)),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn tag(&self) -> ConstraintTag {
        self.tag
    }

    /// The position is unpaired in the source structure (`.`, `e` or `x`).
    pub fn is_unpaired(&self) -> bool {
        matches!(self.symbol, '.' | 'e' | 'x')
    }
}

impl fmt::Display for ConstraintSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Constraint(Vec<ConstraintSite>);

impl Constraint {
    pub fn new(sites: Vec<ConstraintSite>) -> Self {
        Constraint(sites)
    }

    /// Copy a known structure into a constraint, tagging brackets per `mode`.
    pub fn from_structure(structure: &DotBracketVec, mode: BoundaryMode) -> Self {
        Constraint(structure.iter()
            .map(|&db| ConstraintSite::from_dotbracket(db, mode))
            .collect())
    }

    pub fn parse(s: &str, mode: BoundaryMode) -> Result<Self, StructureError> {
        s.chars()
            .enumerate()
            .map(|(i, c)| ConstraintSite::parse(c, mode)
                .ok_or(StructureError::InvalidToken(c, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Constraint)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sites(&self) -> &[ConstraintSite] {
        &self.0
    }

    pub fn sites_mut(&mut self) -> &mut [ConstraintSite] {
        &mut self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstraintSite> {
        self.0.iter()
    }

    pub fn extend<I: IntoIterator<Item = ConstraintSite>>(&mut self, sites: I) {
        self.0.extend(sites)
    }

    pub fn push(&mut self, site: ConstraintSite) {
        self.0.push(site)
    }

    /// Resolve bracket partners (brackets may span separators).
    pub fn partners(&self) -> Result<Vec<Option<usize>>, StructureError> {
        let mut stack: Vec<usize> = Vec::new();
        let mut partners = vec![None; self.len()];
        for (i, site) in self.0.iter().enumerate() {
            match site.symbol() {
                '(' => stack.push(i),
                ')' => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    if self.0[j].tag() != site.tag() {
                        return Err(StructureError::MixedPairTags { open: j, close: i });
                    }
                    partners[i] = Some(j);
                    partners[j] = Some(i);
                }
                _ => (),
            }
        }
        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(partners)
    }

    /// Bracket pairs that are tagged as `EnforcedPair`.
    pub fn enforced_pairs(&self) -> Result<PairSet, StructureError> {
        let partners = self.partners()?;
        let mut pairs = PairSet::new(self.len());
        for (i, p) in partners.iter().enumerate() {
            match *p {
                Some(j) if i < j && self.0[i].tag() == ConstraintTag::EnforcedPair => {
                    pairs.insert(Pair::new(i as NAIDX, j as NAIDX));
                }
                _ => (),
            }
        }
        Ok(pairs)
    }
}

impl Index<usize> for Constraint {
    type Output = ConstraintSite;

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.0.iter().map(|site| site.symbol()).collect();
        write!(f, "{s}")
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
