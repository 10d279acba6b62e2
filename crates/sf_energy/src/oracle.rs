//! The folding oracle interface.
//!
//! The complex engine never folds anything itself. It hands a sequence
//! (possibly several strands joined by `&`) and a constraint to an oracle,
//! receives a fold compound, and queries that compound for the MFE and the
//! suboptimal ensemble. Dropping the compound releases whatever the oracle
//! allocated for it.

use serde::Serialize;
use sf_structure::Constraint;
use sf_structure::DotBracketVec;

use crate::ModelDetails;
use crate::OracleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldMode {
    /// One strand, no separators allowed.
    Single,
    /// Strands joined by separators, intermolecular pairs allowed.
    MultiStrand,
}

/// One member of a suboptimal ensemble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuboptSolution {
    pub structure: DotBracketVec,
    /// Free energy in kcal/mol.
    pub energy: f64,
}

/// A prepared (constrained) folding problem.
pub trait FoldCompound {
    /// Minimum free energy (kcal/mol) and one structure that attains it.
    fn mfe(&mut self) -> Result<(f64, DotBracketVec), OracleError>;

    /// Every structure within `delta` (units of 0.01 kcal/mol) of the MFE.
    fn subopt(&mut self, delta: i32, sort_ascending: bool)
        -> Result<Vec<SuboptSolution>, OracleError>;
}

pub trait FoldingOracle {
    /// Unconstrained fold of a single strand: (structure, mfe).
    fn fold_single(&self, sequence: &str, model: &ModelDetails)
        -> Result<(DotBracketVec, f64), OracleError>;

    /// Prepare a constrained fold. The constraint must be aligned with
    /// `sequence`, separators included.
    fn fold_constrained(
        &self,
        sequence: &str,
        constraint: &Constraint,
        mode: FoldMode,
        model: &ModelDetails,
    ) -> Result<Box<dyn FoldCompound>, OracleError>;
}

