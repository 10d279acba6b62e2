//! Assembly of strands into one multi-strand folding problem.

use itertools::Itertools;
use log::debug;
use serde::Serialize;
use sf_structure::BoundaryMode;
use sf_structure::Constraint;
use sf_structure::ConstraintSite;
use sf_structure::StrandLayout;
use sf_structure::SEPARATOR;

use crate::mark_sticky_ends;
use crate::ComplexError;
use crate::StickyEdges;
use crate::Strand;

/// Longest concatenated complex (separators included) accepted by default.
pub const DEFAULT_MAX_LENGTH: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssemblyConfig {
    /// How brackets inherited from the strands' own folds are enforced.
    pub mode: BoundaryMode,
    /// Also mark the 5' tail of the first and the 3' tail of the last strand.
    pub outward_faces: bool,
    pub max_length: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        AssemblyConfig {
            mode: BoundaryMode::Soft,
            outward_faces: false,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// An ordered set of strands together with the joint constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    strands: Vec<Strand>,
    layout: StrandLayout,
    sequence: String,
    constraint: Constraint,
    fold_temperature: Option<f64>,
}

impl Complex {
    pub(crate) fn new(
        strands: Vec<Strand>,
        layout: StrandLayout,
        constraint: Constraint,
        fold_temperature: Option<f64>,
    ) -> Self {
        let sequence = strands.iter().map(|s| s.sequence()).join(&SEPARATOR.to_string());
        debug_assert_eq!(sequence.chars().count(), constraint.len());
        debug_assert_eq!(layout.len(), constraint.len());
        Complex { strands, layout, sequence, constraint, fold_temperature }
    }

    /// Temperature (Celsius) of the strand folds that went into the
    /// constraint, `None` if no strand had been folded.
    pub fn fold_temperature(&self) -> Option<f64> {
        self.fold_temperature
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn num_strands(&self) -> usize {
        self.strands.len()
    }

    /// Strand sequences joined by the separator.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn layout(&self) -> &StrandLayout {
        &self.layout
    }

    /// Length of the concatenated sequence, separators included.
    pub fn len(&self) -> usize {
        self.constraint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraint.is_empty()
    }
}

/// Check strand count, strand lengths and total length; return the layout.
pub(crate) fn checked_layout(strands: &[Strand], max_length: usize)
    -> Result<StrandLayout, ComplexError>
{
    if strands.len() < 2 {
        return Err(ComplexError::TooFewStrands(strands.len()));
    }
    if let Some(i) = strands.iter().position(|s| s.is_empty()) {
        return Err(ComplexError::EmptyStrand(i));
    }
    let layout = StrandLayout::from_lengths(strands.iter().map(|s| s.len()));
    if layout.len() > max_length {
        return Err(ComplexError::SequenceTooLong { length: layout.len(), max: max_length });
    }
    Ok(layout)
}

/// The common temperature of all cached strand folds.
pub(crate) fn fold_temperature(strands: &[Strand]) -> Result<Option<f64>, ComplexError> {
    let mut folded = strands.iter().filter_map(|s| s.cached_fold()).map(|f| f.temperature());
    let Some(first) = folded.next() else {
        return Ok(None);
    };
    match folded.find(|&t| t != first) {
        Some(t) => Err(ComplexError::TemperatureMismatch { folded: first, requested: t }),
        None => Ok(Some(first)),
    }
}

/// The constraint a strand brings along: its own fold, or no information.
pub(crate) fn strand_constraint(strand: &Strand, mode: BoundaryMode) -> Constraint {
    match strand.cached_fold() {
        Some(fold) => Constraint::from_structure(fold.structure(), mode),
        None => Constraint::new(vec![ConstraintSite::free(); strand.len()]),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: AssemblyConfig,
}

impl Assembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Assembler { config }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Join the strands and mark sticky ends at every internal boundary.
    ///
    /// Strands that have been folded contribute their structure, all others
    /// are treated as unknown (every position unpaired).
    pub fn assemble(&self, strands: &[Strand]) -> Result<Complex, ComplexError> {
        let layout = checked_layout(strands, self.config.max_length)?;
        let temperature = fold_temperature(strands)?;

        let mut constraint = Constraint::new(Vec::with_capacity(layout.len()));
        for (i, strand) in strands.iter().enumerate() {
            if i > 0 {
                constraint.push(ConstraintSite::separator());
            }
            constraint.extend(strand_constraint(strand, self.config.mode).iter().copied());
        }
        // A strand fold with unbalanced brackets cannot be used.
        constraint.partners()?;

        let n = layout.num_strands();
        for segment in layout.segments() {
            let edges = StickyEdges::in_chain(segment.strand(), n, self.config.outward_faces);
            mark_sticky_ends(&mut constraint, segment, edges)?;
        }
        debug!("assembled {} strands: {}", n, constraint);
        Ok(Complex::new(strands.to_vec(), layout, constraint, temperature))
    }
}
