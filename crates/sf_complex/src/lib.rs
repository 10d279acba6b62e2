//! The sf_complex crate.
//!
//! Multi-strand complexes built from single strands:
//!  - `Strand` caches the standalone fold of a sequence,
//!  - `Assembler` joins strands and derives the sticky-end constraint,
//!  - `MfeEngine` asks a `FoldingOracle` for the MFE and the suboptimal
//!    ensemble of a complex,
//!  - `Composer` binds one more strand to a chosen complex structure,
//!  - `binding_energy` compares a complex with its components.

mod error;
mod strand;
mod sticky;
mod assembler;
mod engine;
mod composer;
mod binding;
mod random;

pub use error::*;
pub use strand::*;
pub use sticky::*;
pub use assembler::*;
pub use engine::*;
pub use composer::*;
pub use binding::*;
pub use random::*;
