//! The pair table: for every position, the index of its pairing partner.
//!
//! Indices refer to the dot-bracket string as given, i.e. separators occupy
//! a position (which is always `None`). Brackets may span separators, which
//! is how intermolecular pairs are written.

use std::ops::Index;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::StructureError;
use crate::NAIDX;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairTable(pub Vec<Option<NAIDX>>);

impl PairTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Option<NAIDX>> {
        self.0.iter()
    }

    /// All pairs (i, j) with i < j, in order of i.
    pub fn pairs(&self) -> impl Iterator<Item = (NAIDX, NAIDX)> + '_ {
        self.0.iter().enumerate().filter_map(|(i, &j)| {
            let i = i as NAIDX;
            j.filter(|&j| i < j).map(|j| (i, j))
        })
    }
}

impl Index<usize> for PairTable {
    type Output = Option<NAIDX>;

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &DotBracketVec) -> Result<Self, Self::Error> {
        if dbv.len() >= NAIDX::MAX as usize {
            return Err(StructureError::TooLong(dbv.len()));
        }
        let mut stack: Vec<usize> = Vec::new();
        let mut table = vec![None; dbv.len()];
        for (i, db) in dbv.iter().enumerate() {
            match db {
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[i] = Some(j as NAIDX);
                    table[j] = Some(i as NAIDX);
                }
                DotBracket::Unpaired | DotBracket::Break => (),
            }
        }
        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(PairTable(table))
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PairTable::try_from(&DotBracketVec::try_from(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_hairpin() {
        let pt = PairTable::try_from("((...))").unwrap();
        assert_eq!(pt.len(), 7);
        assert_eq!(pt[0], Some(6));
        assert_eq!(pt[6], Some(0));
        assert_eq!(pt[1], Some(5));
        assert_eq!(pt[3], None);
        assert_eq!(pt.pairs().collect::<Vec<_>>(), vec![(0, 6), (1, 5)]);
    }

    #[test]
    fn test_pair_table_across_separator() {
        let pt = PairTable::try_from("((..&))").unwrap();
        assert_eq!(pt[0], Some(6));
        assert_eq!(pt[1], Some(5));
        assert_eq!(pt[4], None);
    }

    #[test]
    fn test_pair_table_unbalanced() {
        assert_eq!(PairTable::try_from("(()").unwrap_err(), StructureError::UnmatchedOpen(0));
        assert_eq!(PairTable::try_from("())").unwrap_err(), StructureError::UnmatchedClose(2));
    }
}

