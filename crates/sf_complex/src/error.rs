use std::fmt;

use sf_energy::OracleError;
use sf_structure::StructureError;

/// Errors raised while building or evaluating complexes.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplexError {
    /// A character outside {A,C,G,U} (or a separator) in a strand.
    InvalidSequence(char, usize),

    /// A builder range that is empty or reaches past the buffer.
    InvalidRange { start: usize, end: usize, len: usize },

    /// The strand at this index has no nucleotides.
    EmptyStrand(usize),

    /// A complex needs at least two strands.
    TooFewStrands(usize),

    SequenceTooLong { length: usize, max: usize },

    /// A chosen structure does not fit the strands it should describe.
    StructureMismatch { position: usize },

    /// The name is already bound to a different sequence.
    NameConflict(String),

    /// Folds at different temperatures (Celsius) meet in one composition.
    TemperatureMismatch { folded: f64, requested: f64 },

    Structure(StructureError),

    Oracle(OracleError),
}

impl fmt::Display for ComplexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexError::InvalidSequence(c, i) => {
                write!(f, "invalid nucleotide '{c}' at position {i}")
            }
            ComplexError::InvalidRange { start, end, len } => {
                write!(f, "invalid range {start}..{end} in a buffer of length {len}")
            }
            ComplexError::EmptyStrand(i) => write!(f, "strand {i} is empty"),
            ComplexError::TooFewStrands(n) => {
                write!(f, "a complex needs at least two strands, got {n}")
            }
            ComplexError::SequenceTooLong { length, max } => {
                write!(f, "complex of length {length} exceeds the maximum of {max}")
            }
            ComplexError::StructureMismatch { position } => {
                write!(f, "structure does not match the strands at position {position}")
            }
            ComplexError::NameConflict(name) => {
                write!(f, "strand name '{name}' is already bound to a different sequence")
            }
            ComplexError::TemperatureMismatch { folded, requested } => {
                write!(f, "strand was folded at {folded} C, but {requested} C was requested")
            }
            ComplexError::Structure(e) => write!(f, "structure error: {e}"),
            ComplexError::Oracle(e) => write!(f, "folding oracle error: {e}"),
        }
    }
}

impl std::error::Error for ComplexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComplexError::Structure(e) => Some(e),
            ComplexError::Oracle(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StructureError> for ComplexError {
    fn from(e: StructureError) -> Self {
        ComplexError::Structure(e)
    }
}

impl From<OracleError> for ComplexError {
    fn from(e: OracleError) -> Self {
        match e {
            OracleError::InvalidSequence(c, i) => ComplexError::InvalidSequence(c, i),
            OracleError::UnexpectedSeparator(i) => {
                ComplexError::InvalidSequence(sf_structure::SEPARATOR, i)
            }
            e => ComplexError::Oracle(e),
        }
    }
}
