use std::fmt;

use sf_structure::StructureError;

/// Failures of a folding oracle call.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleError {
    /// A character outside the nucleotide alphabet (position in the input).
    InvalidSequence(char, usize),

    /// The constraint string could not be interpreted.
    InvalidConstraint(StructureError),

    /// Sequence and constraint are not aligned.
    LengthMismatch { sequence: usize, constraint: usize },

    /// A single-strand fold was requested for a multi-strand sequence.
    UnexpectedSeparator(usize),

    /// No structure satisfies the hard constraints.
    Unsatisfiable,

    /// The suboptimal ensemble exceeds the configured limit.
    TooManyStructures(usize),

    /// The sequence is too long for the oracle.
    SequenceTooLong(usize),

    /// A temperature (Celsius) the energy parameters cannot be evaluated at.
    InvalidTemperature(f64),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::InvalidSequence(c, i) => {
                write!(f, "invalid nucleotide '{c}' at position {i}")
            }
            OracleError::InvalidConstraint(e) => write!(f, "invalid constraint: {e}"),
            OracleError::LengthMismatch { sequence, constraint } => write!(f,
                "sequence length {sequence} does not match constraint length {constraint}"),
            OracleError::UnexpectedSeparator(i) => {
                write!(f, "strand separator at position {i} in a single-strand fold")
            }
            OracleError::Unsatisfiable => write!(f, "no structure satisfies the constraint"),
            OracleError::TooManyStructures(n) => {
                write!(f, "suboptimal ensemble exceeds the limit of {n} structures")
            }
            OracleError::SequenceTooLong(n) => write!(f, "sequence of length {n} is too long"),
            OracleError::InvalidTemperature(t) => write!(f, "invalid temperature {t} C"),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::InvalidConstraint(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StructureError> for OracleError {
    fn from(e: StructureError) -> Self {
        OracleError::InvalidConstraint(e)
    }
}

