//! Nucleotides and canonical base pairs.

use std::fmt;

use sf_structure::StrandLayout;
use sf_structure::SEPARATOR;

use crate::OracleError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Base { A, C, G, U }

impl TryFrom<char> for Base {
    type Error = ();

    fn try_from(c: char) -> Result<Self, ()> {
        Ok(match c.to_ascii_uppercase() {
            'A' => Base::A,
            'C' => Base::C,
            'G' => Base::G,
            'U' | 'T' => Base::U,
            _ => return Err(()),
        })
    }
}

impl From<Base> for char {
    fn from(b: Base) -> Self {
        match b {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// The six canonical pair types, read 5' base first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PairType { AU, CG, GC, UA, GU, UG }

impl PairType {
    pub fn of(i: Base, j: Base) -> Option<PairType> {
        match (i, j) {
            (Base::A, Base::U) => Some(PairType::AU),
            (Base::C, Base::G) => Some(PairType::CG),
            (Base::G, Base::C) => Some(PairType::GC),
            (Base::U, Base::A) => Some(PairType::UA),
            (Base::G, Base::U) => Some(PairType::GU),
            (Base::U, Base::G) => Some(PairType::UG),
            _ => None,
        }
    }

    /// Row/column in the stacking table.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// AU and GU closing pairs pay the terminal penalty.
    pub fn is_weak(&self) -> bool {
        !matches!(self, PairType::CG | PairType::GC)
    }
}

/// Parse a single strand. Separators are rejected.
pub fn parse_strand(seq: &str) -> Result<Vec<Base>, OracleError> {
    seq.chars()
        .enumerate()
        .map(|(i, c)| match c {
            SEPARATOR => Err(OracleError::UnexpectedSeparator(i)),
            _ => Base::try_from(c).map_err(|_| OracleError::InvalidSequence(c, i)),
        })
        .collect()
}

/// Parse a concatenated multi-strand sequence into nucleotides and layout.
pub fn parse_complex(seq: &str) -> Result<(Vec<Base>, StrandLayout), OracleError> {
    let bases = seq.chars()
        .enumerate()
        .filter(|&(_, c)| c != SEPARATOR)
        .map(|(i, c)| Base::try_from(c).map_err(|_| OracleError::InvalidSequence(c, i)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((bases, StrandLayout::from_concatenated(seq)))
}

/// Upper-case a strand and read `T` as `U`.
pub fn normalize_strand(seq: &str) -> Result<String, OracleError> {
    Ok(parse_strand(seq)?.into_iter().map(char::from).collect())
}
