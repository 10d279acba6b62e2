//! Energy parameters of the reference stacking model.
//!
//! All values are integers in units of 0.01 kcal/mol (dcal/mol), the unit
//! in which suboptimal windows are specified.
//!
//! The model knows four contributions:
//!  - a stacking energy for every pair (i, j) directly enclosing (i+1, j-1),
//!  - a helix initiation for the outermost pair of every helix,
//!    larger when that pair joins two strands,
//!  - a terminal penalty for AU/GU pairs at either end of a helix,
//!  - a minimum hairpin size for pairs within one strand.
//!
//! Watson-Crick stacks are the Turner 2004 values; stacks involving a
//! wobble pair use a single flat value. The table is symmetric under
//! reading the duplex from the other strand, i.e.
//! `STACK[(a,b)][(c,d)] == STACK[(d,c)][(b,a)]`, which makes the energy
//! of a complex independent of the order in which its strands are written.

use crate::ModelDetails;
use crate::PairType;

/// Temperature at which the parameters are given, in Kelvin.
const T37: f64 = 310.15;

/// Smallest number of unpaired bases enclosed by an intramolecular pair.
pub const MIN_HAIRPIN: usize = 3;

/// Initiation of a helix within one strand (dcal/mol, 37 °C).
const HELIX_INIT_37: i32 = 340;

/// Intermolecular initiation (dcal/mol, 37 °C).
const DUPLEX_INIT_37: i32 = 409;

/// Terminal AU/GU penalty (dcal/mol, 37 °C).
const TERMINAL_WEAK_37: i32 = 45;

/// Stack involving a GU or UG pair (dcal/mol).
const WOBBLE_STACK: i32 = -130;

/// Stacking energies, indexed by [outer pair][inner pair].
/// Pair order: AU, CG, GC, UA, GU, UG.
const STACK_37: [[i32; 6]; 6] = {
    const W: i32 = WOBBLE_STACK;
    [
        // outer AU
        [ -93, -224, -208, -110, W, W],
        // outer CG
        [-211, -326, -236, -208, W, W],
        // outer GC
        [-235, -342, -326, -224, W, W],
        // outer UA
        [-133, -235, -211,  -93, W, W],
        // outer GU
        [W, W, W, W, W, W],
        // outer UG
        [W, W, W, W, W, W],
    ]
};

/// Parameters evaluated at one temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyParams {
    pub stack: [[i32; 6]; 6],
    pub helix_init: i32,
    pub duplex_init: i32,
    pub terminal_weak: i32,
    pub temperature: f64,
}

impl EnergyParams {
    /// Stacking energies are taken as temperature independent; the penalties
    /// are entropic and scale with the absolute temperature.
    pub fn at(model: &ModelDetails) -> Self {
        let scale = |e: i32| (e as f64 * model.kelvin() / T37).round() as i32;
        EnergyParams {
            stack: STACK_37,
            helix_init: scale(HELIX_INIT_37),
            duplex_init: scale(DUPLEX_INIT_37),
            terminal_weak: scale(TERMINAL_WEAK_37),
            temperature: model.temperature,
        }
    }

    pub fn stack(&self, outer: PairType, inner: PairType) -> i32 {
        self.stack[outer.index()][inner.index()]
    }

    /// Penalty for a pair at the end of a helix.
    pub fn terminal(&self, pair: PairType) -> i32 {
        if pair.is_weak() { self.terminal_weak } else { 0 }
    }

    /// Penalty for the outermost pair of a helix.
    pub fn initiation(&self, pair: PairType, intermolecular: bool) -> i32 {
        let init = if intermolecular { self.duplex_init } else { self.helix_init };
        init.saturating_add(self.terminal(pair))
    }
}

impl Default for EnergyParams {
    fn default() -> Self {
        EnergyParams::at(&ModelDetails::default())
    }
}
