//! Growing a complex one strand at a time.
//!
//! The composer binds a new strand to a chosen structure of an existing
//! complex (typically the best member of its suboptimal ensemble). The pairs
//! of the chosen structure are carried over, the outer tails of the existing
//! complex and both tails of the new strand become sticky, and everything
//! else that is unpaired stays within its strand.

use log::debug;
use sf_structure::BoundaryMode;
use sf_structure::Constraint;
use sf_structure::ConstraintSite;
use sf_structure::DotBracket;
use sf_structure::DotBracketVec;
use sf_structure::StrandLayout;

use crate::assembler::checked_layout;
use crate::assembler::fold_temperature;
use crate::assembler::strand_constraint;
use crate::mark_sticky_ends;
use crate::Complex;
use crate::ComplexError;
use crate::StickyEdges;
use crate::Strand;
use crate::DEFAULT_MAX_LENGTH;

#[derive(Debug, Clone)]
pub struct Composer {
    mode: BoundaryMode,
    max_length: usize,
}

impl Default for Composer {
    fn default() -> Self {
        Composer { mode: BoundaryMode::Hard, max_length: DEFAULT_MAX_LENGTH }
    }
}

impl Composer {
    /// `mode` applies to the pairs of the chosen structure.
    pub fn new(mode: BoundaryMode) -> Self {
        Composer { mode, ..Default::default() }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    /// A new complex of `existing` plus `strand`, constrained by `structure`.
    ///
    /// `structure` must describe the concatenation of `existing`: same length
    /// and separators at the same positions. The new strand contributes its
    /// own fold if it has been folded, otherwise it is unknown.
    pub fn extend(
        &self,
        existing: &[Strand],
        structure: &DotBracketVec,
        strand: &Strand,
    ) -> Result<Complex, ComplexError> {
        if existing.is_empty() {
            return Err(ComplexError::TooFewStrands(1));
        }
        let old = StrandLayout::from_lengths(existing.iter().map(|s| s.len()));
        check_shape(&old, structure)?;

        let mut strands = existing.to_vec();
        strands.push(strand.clone());
        let layout = checked_layout(&strands, self.max_length)?;
        let temperature = fold_temperature(&strands)?;

        let mut constraint = Constraint::from_structure(structure, self.mode);
        constraint.push(ConstraintSite::separator());
        constraint.extend(strand_constraint(strand, BoundaryMode::Soft).iter().copied());
        constraint.partners()?;

        let n = layout.num_strands();
        for segment in layout.segments() {
            let i = segment.strand();
            let edges = StickyEdges {
                five_prime: i == 0 || i == n - 1,
                three_prime: i + 2 == n || i == n - 1,
            };
            mark_sticky_ends(&mut constraint, segment, edges)?;
        }
        debug!("extended {} strands by {}: {}", existing.len(), strand, constraint);
        Ok(Complex::new(strands, layout, constraint, temperature))
    }
}

/// The structure must have the length and the separators of the layout.
fn check_shape(layout: &StrandLayout, structure: &DotBracketVec) -> Result<(), ComplexError> {
    for pos in 0..layout.len().max(structure.len()) {
        let fits = match structure.get(pos) {
            Some(&db) => (db == DotBracket::Break) == layout.is_separator(pos) && pos < layout.len(),
            None => false,
        };
        if !fits {
            return Err(ComplexError::StructureMismatch { position: pos });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assembler;
    use crate::MfeEngine;
    use sf_energy::ModelDetails;
    use sf_energy::NearestNeighborModel;

    fn strands(seqs: &[&str]) -> Vec<Strand> {
        seqs.iter().map(|s| Strand::new(s).unwrap()).collect()
    }

    fn db(s: &str) -> DotBracketVec {
        DotBracketVec::try_from(s).unwrap()
    }

    #[test]
    fn test_duplex_to_triplex() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let duplex = Assembler::default().assemble(&strands(&["GGGG", "CCCC"])).unwrap();
        let ensemble = engine.evaluate(&duplex).unwrap().ensemble.unwrap();
        let chosen = &ensemble[0].structure;

        let third = Strand::new("AGGG").unwrap();
        let triplex = Composer::default().extend(duplex.strands(), chosen, &third).unwrap();
        assert_eq!(triplex.len(), 4 + 4 + 4 + 2);
        assert_eq!(triplex.constraint().len(), triplex.sequence().len());
        assert_eq!(triplex.sequence(), "GGGG&CCCC&AGGG");
        assert_eq!(triplex.constraint().to_string(), "((((&))))&eeee");
        assert_eq!(triplex.constraint().enforced_pairs().unwrap().len(), 4);

        let mfe = engine.compute_mfe(&triplex).unwrap();
        let fav = mfe.favorable().unwrap();
        assert!(fav.structure().to_string().starts_with("((((&))))&"));
    }

    #[test]
    fn test_outer_tails_become_sticky() {
        let c = Composer::default()
            .extend(&strands(&["AAGG", "CCAA"]), &db("..((&)).."), &Strand::new("UUUU").unwrap())
            .unwrap();
        assert_eq!(c.constraint().to_string(), "ee((&))ee&eeee");
    }

    #[test]
    fn test_middle_strands_stay_intramolecular() {
        let c = Composer::default()
            .extend(&strands(&["GGGG", "AAAA", "CCCC"]), &db("((((&....&))))"),
                &Strand::new("UUUU").unwrap())
            .unwrap();
        assert_eq!(c.constraint().to_string(), "((((&xxxx&))))&eeee");
        assert_eq!(c.num_strands(), 4);
    }

    #[test]
    fn test_folded_new_strand() {
        let nn = NearestNeighborModel::new();
        let third = Strand::new("AGGGGAAAACCCCA").unwrap();
        third.fold(&nn, &ModelDetails::default()).unwrap();
        let c = Composer::default()
            .extend(&strands(&["GGGG", "CCCC"]), &db("((((&))))"), &third)
            .unwrap();
        assert_eq!(c.constraint().to_string(), "((((&))))&e((((xxxx))))e");
        // Only the chosen structure is enforced.
        assert_eq!(c.constraint().enforced_pairs().unwrap().len(), 4);
    }

    #[test]
    fn test_new_strand_folded_at_another_temperature() {
        let nn = NearestNeighborModel::new();
        let existing = strands(&["GGGGAAAACCCC", "CCCC"]);
        existing[0].fold(&nn, &ModelDetails::default()).unwrap();
        let third = Strand::new("AGGGGAAAACCCCA").unwrap();
        third.fold(&nn, &ModelDetails::with_temperature(50.0)).unwrap();
        assert_eq!(Composer::default()
            .extend(&existing, &db("((((....))))&...."), &third).unwrap_err(),
            ComplexError::TemperatureMismatch { folded: 37.0, requested: 50.0 });
    }

    #[test]
    fn test_soft_composer() {
        let c = Composer::new(BoundaryMode::Soft)
            .extend(&strands(&["GGGG", "CCCC"]), &db("((((&))))"), &Strand::new("AGGG").unwrap())
            .unwrap();
        assert!(c.constraint().enforced_pairs().unwrap().is_empty());
    }

    #[test]
    fn test_structure_mismatch() {
        let existing = strands(&["GGGG", "CCCC"]);
        let new = Strand::new("AGGG").unwrap();
        let composer = Composer::default();
        assert_eq!(composer.extend(&existing, &db("((((&)))"), &new).unwrap_err(),
            ComplexError::StructureMismatch { position: 8 });
        assert_eq!(composer.extend(&existing, &db("((((&)))).."), &new).unwrap_err(),
            ComplexError::StructureMismatch { position: 9 });
        assert_eq!(composer.extend(&existing, &db("(((&.))))"), &new).unwrap_err(),
            ComplexError::StructureMismatch { position: 3 });
        assert!(matches!(composer.extend(&existing, &db("((((&)).."), &new),
            Err(ComplexError::Structure(_))));
    }

    #[test]
    fn test_extend_failures() {
        let composer = Composer::default().with_max_length(10);
        assert_eq!(composer.extend(&[], &db(""), &Strand::new("AGGG").unwrap()).unwrap_err(),
            ComplexError::TooFewStrands(1));
        assert_eq!(composer.extend(&strands(&["GGGG", "CCCC"]), &db("((((&))))"),
            &Strand::new("").unwrap()).unwrap_err(), ComplexError::EmptyStrand(2));
        assert_eq!(composer.extend(&strands(&["GGGG", "CCCC"]), &db("((((&))))"),
            &Strand::new("AGGG").unwrap()).unwrap_err(),
            ComplexError::SequenceTooLong { length: 14, max: 10 });
    }
}
