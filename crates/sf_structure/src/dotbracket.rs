//! Dot-bracket notation for (multi-stranded) secondary structures.
//!
//! A `DotBracketVec` is the character-by-character view of a structure,
//! including the strand separator `&` when a complex has more than one
//! strand. Pair information is only implicit; use `PairTable` to resolve
//! bracket partners.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;

use serde::Serialize;
use serde::Serializer;

use crate::StructureError;
use crate::SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotBracket {
    Unpaired,
    Open,
    Close,
    Break,
}

impl TryFrom<char> for DotBracket {
    type Error = StructureError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            SEPARATOR => Ok(DotBracket::Break),
            _ => Err(StructureError::InvalidToken(c, 0)),
        }
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
            DotBracket::Break => SEPARATOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl Deref for DotBracketVec {
    type Target = Vec<DotBracket>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DotBracketVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.chars()
            .enumerate()
            .map(|(i, c)| DotBracket::try_from(c)
                .map_err(|_| StructureError::InvalidToken(c, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(DotBracketVec)
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.iter().map(|&db| char::from(db)).collect();
        write!(f, "{s}")
    }
}

impl Serialize for DotBracketVec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotbracket_roundtrip() {
        let dbv = DotBracketVec::try_from("((..&..))").unwrap();
        assert_eq!(dbv.len(), 9);
        assert_eq!(dbv[4], DotBracket::Break);
        assert_eq!(dbv[2], DotBracket::Unpaired);
        assert_eq!(dbv.iter().filter(|&&db| db == DotBracket::Open).count(), 2);
        assert_eq!(format!("{}", dbv), "((..&..))");
    }

    #[test]
    fn test_dotbracket_invalid_token() {
        let err = DotBracketVec::try_from("((.x))").unwrap_err();
        assert_eq!(err, StructureError::InvalidToken('x', 3));
    }
}

