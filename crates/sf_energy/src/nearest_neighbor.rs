//! A folding oracle backed by the reference stacking model.

use log::debug;
use sf_structure::Constraint;
use sf_structure::DotBracketVec;
use sf_structure::StrandLayout;
use sf_structure::NAIDX;

use crate::parse_complex;
use crate::parse_strand;
use crate::recursions::FoldProblem;
use crate::recursions::INF;
use crate::subopt::enumerate;
use crate::EnergyParams;
use crate::FoldCompound;
use crate::FoldMode;
use crate::FoldingOracle;
use crate::ModelDetails;
use crate::OracleError;
use crate::SuboptSolution;

/// Convert 0.01 kcal/mol to kcal/mol.
fn kcal(dcal: i32) -> f64 {
    dcal as f64 / 100.0
}

#[derive(Debug, Clone, Default)]
pub struct NearestNeighborModel {
    subopt_limit: Option<usize>,
}

impl NearestNeighborModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail suboptimal enumeration once it exceeds `limit` structures.
    pub fn with_subopt_limit(mut self, limit: usize) -> Self {
        self.subopt_limit = Some(limit);
        self
    }

    /// Free energy (kcal/mol) of a structure, separators included.
    /// Constraints are not checked; base pairs must be canonical.
    pub fn evaluate(
        &self,
        sequence: &str,
        structure: &DotBracketVec,
        model: &ModelDetails,
    ) -> Result<f64, OracleError> {
        model.check()?;
        let (bases, layout) = parse_complex(sequence)?;
        let fp = FoldProblem::new(bases, layout, None, EnergyParams::at(model))?;
        Ok(kcal(fp.evaluate(structure)?))
    }

    fn check_length(length: usize) -> Result<(), OracleError> {
        if length >= NAIDX::MAX as usize {
            return Err(OracleError::SequenceTooLong(length));
        }
        Ok(())
    }
}

impl FoldingOracle for NearestNeighborModel {
    fn fold_single(&self, sequence: &str, model: &ModelDetails)
        -> Result<(DotBracketVec, f64), OracleError>
    {
        model.check()?;
        Self::check_length(sequence.len())?;
        let bases = parse_strand(sequence)?;
        let layout = StrandLayout::from_lengths([bases.len()]);
        let fp = FoldProblem::new(bases, layout, None, EnergyParams::at(model))?;
        let pairs = fp.backtrack()?;
        Ok((fp.to_dotbracket(&pairs), kcal(fp.mfe())))
    }

    fn fold_constrained(
        &self,
        sequence: &str,
        constraint: &Constraint,
        mode: FoldMode,
        model: &ModelDetails,
    ) -> Result<Box<dyn FoldCompound>, OracleError> {
        model.check()?;
        Self::check_length(sequence.len())?;
        let (bases, layout) = match mode {
            FoldMode::Single => {
                let bases = parse_strand(sequence)?;
                let layout = StrandLayout::from_lengths([bases.len()]);
                (bases, layout)
            }
            FoldMode::MultiStrand => parse_complex(sequence)?,
        };
        debug!("fold {} strand(s), {} nt at {} C: {}",
            layout.num_strands(), bases.len(), model.temperature, constraint);
        let problem = FoldProblem::new(bases, layout, Some(constraint), EnergyParams::at(model))?;
        Ok(Box::new(StackingCompound {
            problem,
            limit: self.subopt_limit,
        }))
    }
}

/// Filled recursions for one constrained problem.
struct StackingCompound {
    problem: FoldProblem,
    limit: Option<usize>,
}

impl FoldCompound for StackingCompound {
    fn mfe(&mut self) -> Result<(f64, DotBracketVec), OracleError> {
        let pairs = self.problem.backtrack()?;
        Ok((kcal(self.problem.mfe()), self.problem.to_dotbracket(&pairs)))
    }

    fn subopt(&mut self, delta: i32, sort_ascending: bool)
        -> Result<Vec<SuboptSolution>, OracleError>
    {
        if self.problem.mfe() >= INF {
            return Err(OracleError::Unsatisfiable);
        }
        let mut solutions: Vec<SuboptSolution> = enumerate(&self.problem, delta, self.limit)?
            .into_iter()
            .map(|(pairs, energy)| SuboptSolution {
                structure: self.problem.to_dotbracket(&pairs),
                energy: kcal(energy),
            })
            .collect();
        if sort_ascending {
            solutions.sort_by(|a, b| a.energy.total_cmp(&b.energy)
                .then_with(|| a.structure.to_string().cmp(&b.structure.to_string())));
        }
        Ok(solutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_structure::BoundaryMode;

    #[test]
    fn test_fold_single() {
        let nn = NearestNeighborModel::new();
        let (s, e) = nn.fold_single("GGGGAAAACCCC", &ModelDetails::default()).unwrap();
        assert_eq!(s.to_string(), "((((....))))");
        assert!((e - -6.38).abs() < 1e-9);

        let (s, e) = nn.fold_single("GGGG", &ModelDetails::default()).unwrap();
        assert_eq!(s.to_string(), "....");
        assert_eq!(e, 0.0);
    }

    #[test]
    fn test_fold_single_rejects_separator() {
        let nn = NearestNeighborModel::new();
        let err = nn.fold_single("GG&CC", &ModelDetails::default()).unwrap_err();
        assert_eq!(err, OracleError::UnexpectedSeparator(2));
    }

    #[test]
    fn test_constrained_compound() {
        let nn = NearestNeighborModel::new();
        let c = Constraint::parse("eeee&eeee", BoundaryMode::Soft).unwrap();
        let mut fc = nn.fold_constrained("GGGG&CCCC", &c, FoldMode::MultiStrand,
            &ModelDetails::default()).unwrap();
        let (mfe, s) = fc.mfe().unwrap();
        assert!((mfe - -5.69).abs() < 1e-9);
        assert_eq!(s.to_string(), "((((&))))");

        let sols = fc.subopt(570, true).unwrap();
        assert_eq!(sols[0].structure.to_string(), "((((&))))");
        assert!(sols.windows(2).all(|w| w[0].energy <= w[1].energy));
        assert!(sols.iter().all(|s| s.energy <= mfe + 5.70 + 1e-9));
    }

    #[test]
    fn test_evaluate() {
        let nn = NearestNeighborModel::new();
        let md = ModelDetails::default();
        let s = DotBracketVec::try_from("(((.&.)))").unwrap();
        let e = nn.evaluate("GGGG&CCCC", &s, &md).unwrap();
        assert!((e - (-6.52 + 4.09)).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_weakens_binding() {
        let nn = NearestNeighborModel::new();
        let c = Constraint::parse("....&....", BoundaryMode::Soft).unwrap();
        let mut cold = nn.fold_constrained("GGGG&CCCC", &c, FoldMode::MultiStrand,
            &ModelDetails::with_temperature(20.0)).unwrap();
        let mut hot = nn.fold_constrained("GGGG&CCCC", &c, FoldMode::MultiStrand,
            &ModelDetails::with_temperature(60.0)).unwrap();
        assert!(cold.mfe().unwrap().0 < hot.mfe().unwrap().0);
    }

    #[test]
    fn test_extreme_temperatures_are_rejected() {
        let nn = NearestNeighborModel::new();
        let hot = ModelDetails::with_temperature(1e10);
        assert_eq!(nn.fold_single("AAAAGGGGUUUU", &hot).unwrap_err(),
            OracleError::InvalidTemperature(1e10));
        let c = Constraint::parse("....&....", BoundaryMode::Soft).unwrap();
        assert!(matches!(nn.fold_constrained("GGGG&CCCC", &c, FoldMode::MultiStrand,
            &ModelDetails::with_temperature(-300.0)), Err(OracleError::InvalidTemperature(_))));
        let s = DotBracketVec::try_from("((((&))))").unwrap();
        assert!(nn.evaluate("GGGG&CCCC", &s, &ModelDetails::with_temperature(f64::NAN)).is_err());

        let boiling = ModelDetails::with_temperature(100.0);
        assert!(nn.fold_single("AAAAGGGGUUUU", &boiling).is_ok());
    }
}
