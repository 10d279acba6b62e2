use std::fmt;

/// Errors raised while parsing or validating structures and constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A character that is not part of the alphabet at the given position.
    InvalidToken(char, usize),

    /// An opening bracket without a closing partner.
    UnmatchedOpen(usize),

    /// A closing bracket without an opening partner.
    UnmatchedClose(usize),

    /// A bracket pair whose two ends are enforced differently.
    MixedPairTags { open: usize, close: usize },

    /// Two representations that must be aligned differ in length.
    LengthMismatch { expected: usize, found: usize },

    /// The structure exceeds what `NAIDX` can address.
    TooLong(usize),
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::InvalidToken(c, i) => {
                write!(f, "invalid character '{c}' at position {i}")
            }
            StructureError::UnmatchedOpen(i) => write!(f, "unmatched '(' at position {i}"),
            StructureError::UnmatchedClose(i) => write!(f, "unmatched ')' at position {i}"),
            StructureError::MixedPairTags { open, close } => {
                write!(f, "bracket pair ({open},{close}) mixes enforced and free ends")
            }
            StructureError::LengthMismatch { expected, found } => {
                write!(f, "length mismatch: expected {expected}, found {found}")
            }
            StructureError::TooLong(n) => write!(f, "structure of length {n} is too long"),
        }
    }
}

impl std::error::Error for StructureError {}

