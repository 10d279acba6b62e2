//! MFE and suboptimal ensembles of assembled complexes.

use std::ops::Deref;

use itertools::Itertools;
use log::debug;
use log::warn;
use serde::Serialize;
use sf_energy::FoldCompound;
use sf_energy::FoldMode;
use sf_energy::FoldingOracle;
use sf_energy::ModelDetails;
use sf_energy::SuboptSolution;
use sf_structure::DotBracketVec;
use sf_structure::PairSet;
use sf_structure::PairTable;

use crate::Complex;
use crate::ComplexError;

/// A minimum free energy structure with a negative energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MfeStructure {
    energy: f64,
    structure: DotBracketVec,
}

impl MfeStructure {
    /// kcal/mol, always < 0.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn structure(&self) -> &DotBracketVec {
        &self.structure
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ComplexMfe {
    Favorable(MfeStructure),
    /// The MFE is >= 0: no bound state beats the separated strands.
    NoFavorableStructure,
}

impl ComplexMfe {
    pub fn favorable(&self) -> Option<&MfeStructure> {
        match self {
            ComplexMfe::Favorable(mfe) => Some(mfe),
            ComplexMfe::NoFavorableStructure => None,
        }
    }

    pub fn energy(&self) -> Option<f64> {
        self.favorable().map(|m| m.energy)
    }

    pub fn is_favorable(&self) -> bool {
        self.favorable().is_some()
    }
}

/// Energy window (0.01 kcal/mol) that reaches from the MFE up to zero,
/// plus one unit.
pub fn subopt_window(mfe: f64) -> i32 {
    // Guards against 5.69 * 100.0 == 569.0000000000001.
    (-mfe * 100.0 - 1e-6).ceil() as i32 + 1
}

/// Suboptimal structures in ascending energy order, as reported by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuboptEnsemble {
    delta: i32,
    solutions: Vec<SuboptSolution>,
}

impl SuboptEnsemble {
    /// The window used for the enumeration, in 0.01 kcal/mol.
    pub fn delta(&self) -> i32 {
        self.delta
    }

    /// The lowest energy member.
    pub fn best(&self) -> Option<&SuboptSolution> {
        self.solutions.first()
    }
}

impl Deref for SuboptEnsemble {
    type Target = [SuboptSolution];

    fn deref(&self) -> &Self::Target {
        &self.solutions
    }
}

/// MFE and (if favorable) the ensemble of one complex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub mfe: ComplexMfe,
    pub ensemble: Option<SuboptEnsemble>,
}

/// Drives the folding oracle for assembled complexes. All folds share the
/// same model details.
pub struct MfeEngine<'a, O: FoldingOracle + ?Sized> {
    oracle: &'a O,
    model: ModelDetails,
}

impl<'a, O: FoldingOracle + ?Sized> MfeEngine<'a, O> {
    pub fn new(oracle: &'a O, model: ModelDetails) -> Self {
        MfeEngine { oracle, model }
    }

    pub fn oracle(&self) -> &'a O {
        self.oracle
    }

    pub fn model(&self) -> &ModelDetails {
        &self.model
    }

    fn prepare(&self, complex: &Complex) -> Result<Box<dyn FoldCompound>, ComplexError> {
        if let Some(folded) = complex.fold_temperature() {
            if folded != self.model.temperature {
                return Err(ComplexError::TemperatureMismatch {
                    folded,
                    requested: self.model.temperature,
                });
            }
        }
        debug!("{}", complex.sequence());
        debug!("{}", complex.constraint());
        Ok(self.oracle.fold_constrained(
            complex.sequence(),
            complex.constraint(),
            FoldMode::MultiStrand,
            &self.model,
        )?)
    }

    fn mfe_of(&self, fc: &mut dyn FoldCompound, complex: &Complex)
        -> Result<ComplexMfe, ComplexError>
    {
        let (energy, structure) = fc.mfe()?;
        debug!("{} ({:.2})", structure, energy);
        check_enforced(complex, &structure)?;
        if energy >= 0.0 {
            return Ok(ComplexMfe::NoFavorableStructure);
        }
        Ok(ComplexMfe::Favorable(MfeStructure { energy, structure }))
    }

    fn subopt_of(&self, fc: &mut dyn FoldCompound, mfe: &MfeStructure)
        -> Result<SuboptEnsemble, ComplexError>
    {
        let delta = subopt_window(mfe.energy);
        let solutions = fc.subopt(delta, true)?;
        debug!("{} structures within {} of {:.2}", solutions.len(), delta, mfe.energy);
        Ok(SuboptEnsemble { delta, solutions })
    }

    /// Constrained multi-strand MFE of the complex.
    pub fn compute_mfe(&self, complex: &Complex) -> Result<ComplexMfe, ComplexError> {
        let mut fc = self.prepare(complex)?;
        self.mfe_of(fc.as_mut(), complex)
    }

    /// All structures between the MFE and zero (plus one unit of slack).
    /// `mfe` must come from the same complex.
    pub fn enumerate_suboptimal(&self, complex: &Complex, mfe: &MfeStructure)
        -> Result<SuboptEnsemble, ComplexError>
    {
        if mfe.structure.len() != complex.len() {
            let position = mfe.structure.len().min(complex.len());
            return Err(ComplexError::StructureMismatch { position });
        }
        let mut fc = self.prepare(complex)?;
        self.subopt_of(fc.as_mut(), mfe)
    }

    /// MFE and, if favorable, the suboptimal ensemble from one fold.
    pub fn evaluate(&self, complex: &Complex) -> Result<Evaluation, ComplexError> {
        let mut fc = self.prepare(complex)?;
        let mfe = self.mfe_of(fc.as_mut(), complex)?;
        let ensemble = match mfe.favorable() {
            Some(m) => Some(self.subopt_of(fc.as_mut(), m)?),
            None => None,
        };
        Ok(Evaluation { mfe, ensemble })
    }
}

/// Enforced pairs that the oracle dropped are reported, not rejected.
fn check_enforced(complex: &Complex, structure: &DotBracketVec) -> Result<(), ComplexError> {
    let enforced = complex.constraint().enforced_pairs()?;
    if enforced.is_empty() {
        return Ok(());
    }
    let found = PairSet::from(&PairTable::try_from(structure)?);
    if !enforced.is_subset(&found) {
        let missing = enforced.missing_from(&found);
        warn!("MFE structure drops {} enforced pair(s): {}", missing.len(),
            missing.iter().join(","));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Assembler;
    use crate::Strand;
    use sf_energy::NearestNeighborModel;

    fn complex(seqs: &[&str]) -> Complex {
        let strands: Vec<Strand> = seqs.iter().map(|s| Strand::new(s).unwrap()).collect();
        Assembler::default().assemble(&strands).unwrap()
    }

    #[test]
    fn test_subopt_window() {
        assert_eq!(subopt_window(-5.69), 570);
        assert_eq!(subopt_window(-5.695), 571);
        assert_eq!(subopt_window(-0.01), 2);
        assert_eq!(subopt_window(-0.001), 2);
    }

    #[test]
    fn test_complementary_tetramers() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let c = complex(&["GGGG", "CCCC"]);

        let mfe = engine.compute_mfe(&c).unwrap();
        let fav = mfe.favorable().unwrap();
        assert!(fav.energy() < 0.0);
        assert!((fav.energy() - -5.69).abs() < 1e-9);

        let ens = engine.enumerate_suboptimal(&c, fav).unwrap();
        assert!(!ens.is_empty());
        let best = ens.best().unwrap();
        assert_eq!(best.structure.to_string(), "((((&))))");
        assert!(!best.structure.to_string().contains('.'));
        assert_eq!(best.energy, fav.energy());
    }

    #[test]
    fn test_weak_pair_is_not_favorable() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let c = complex(&["AC", "UG"]);
        assert_eq!(engine.compute_mfe(&c).unwrap(), ComplexMfe::NoFavorableStructure);
        let eval = engine.evaluate(&c).unwrap();
        assert_eq!(eval.mfe, ComplexMfe::NoFavorableStructure);
        assert!(eval.ensemble.is_none());
    }

    #[test]
    fn test_ensemble_window() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let c = complex(&["GGGAC", "GUCCC"]);
        let eval = engine.evaluate(&c).unwrap();
        let mfe = eval.mfe.energy().unwrap();
        let ens = eval.ensemble.unwrap();
        assert_eq!(ens.delta(), subopt_window(mfe));
        assert!(ens.len() > 1);
        assert!(ens.iter().any(|s| s.energy == mfe));
        for s in ens.iter() {
            assert!(s.energy >= mfe - 1e-9);
            assert!(s.energy <= mfe + ens.delta() as f64 / 100.0 + 1e-9);
        }
        assert!(ens.windows(2).all(|w| w[0].energy <= w[1].energy));
    }

    #[test]
    fn test_strand_order_symmetry() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        for (a, b) in [("GGGAC", "GUCCC"), ("GGGG", "CCCC"), ("AUAUGGC", "GCCAUAU")] {
            let ab = engine.compute_mfe(&complex(&[a, b])).unwrap();
            let ba = engine.compute_mfe(&complex(&[b, a])).unwrap();
            assert_eq!(ab.energy(), ba.energy(), "{a} {b}");
        }
    }

    #[test]
    fn test_ensemble_needs_the_mfe_of_its_complex() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let small = complex(&["GGGG", "CCCC"]);
        let large = complex(&["GGGAC", "GUCCC"]);
        let mfe = engine.compute_mfe(&small).unwrap();
        assert_eq!(engine.enumerate_suboptimal(&large, mfe.favorable().unwrap()).unwrap_err(),
            ComplexError::StructureMismatch { position: 9 });
    }

    #[test]
    fn test_strand_folds_must_match_the_model() {
        let nn = NearestNeighborModel::new();
        let strands: Vec<Strand> = ["GGGGAAAACCCC", "GGGGAAAACCCC"].iter()
            .map(|s| Strand::new(s).unwrap())
            .collect();
        for s in &strands {
            s.fold(&nn, &ModelDetails::default()).unwrap();
        }
        let c = Assembler::default().assemble(&strands).unwrap();
        assert_eq!(c.fold_temperature(), Some(37.0));

        let hot = MfeEngine::new(&nn, ModelDetails::with_temperature(90.0));
        let expected = ComplexError::TemperatureMismatch { folded: 37.0, requested: 90.0 };
        assert_eq!(hot.compute_mfe(&c).unwrap_err(), expected);
        assert_eq!(hot.evaluate(&c).unwrap_err(), expected);
        assert!(MfeEngine::new(&nn, ModelDetails::default()).compute_mfe(&c).is_ok());
    }

    #[test]
    fn test_oracle_errors_propagate() {
        let nn = NearestNeighborModel::new().with_subopt_limit(1);
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let c = complex(&["GGGAC", "GUCCC"]);
        assert!(matches!(engine.evaluate(&c),
            Err(ComplexError::Oracle(sf_energy::OracleError::TooManyStructures(_)))));
    }
}
