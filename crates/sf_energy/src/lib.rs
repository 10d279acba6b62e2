//! The sf_energy crate.
//!
//! Everything energy-related that the complex engine needs:
//!  - the nucleotide alphabet,
//!  - the `FoldingOracle` interface (single-strand folds, constrained
//!    multi-strand folds, suboptimal enumeration),
//!  - `NearestNeighborModel`, a small stacking-energy oracle that
//!    implements the interface.
//!
//! Energies cross the oracle interface in kcal/mol (`f64`), energy windows
//! in integer units of 0.01 kcal/mol.

mod error;
mod sequence;
mod model;
mod oracle;
mod parameters;
mod recursions;
mod subopt;
mod nearest_neighbor;

pub use error::*;
pub use sequence::*;
pub use model::*;
pub use oracle::*;
pub use parameters::*;
pub use nearest_neighbor::*;

