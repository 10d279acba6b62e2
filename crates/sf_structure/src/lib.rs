//! Secondary structures and folding constraints of multi-strand complexes.
//!
//! Every string in this crate covers a whole complex: strands are joined
//! by [`SEPARATOR`] and positions count the separators too.

mod error;
mod dotbracket;
mod pair_table;
mod pair_set;
mod layout;
mod constraint;

pub use error::*;
pub use dotbracket::*;
pub use pair_table::*;
pub use pair_set::*;
pub use layout::*;
pub use constraint::*;

/// Position in a complex string. A `u16` bounds complexes, separators
/// included, to 65535 positions.
pub type NAIDX = u16;

/// Two packed `NAIDX`, see [`Pair::key`].
pub type P1KEY = u32;

pub const SEPARATOR: char = '&';

const _: () = assert!(2 * NAIDX::BITS <= P1KEY::BITS);
