//! Strands and the strand registry.
//!
//! A `Strand` is a cheap handle: clones share the sequence and the cached
//! standalone fold, so a strand that takes part in many complexes is folded
//! only once.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use once_cell::sync::OnceCell;
use serde::Serialize;
use sf_energy::normalize_strand;
use sf_energy::FoldingOracle;
use sf_energy::ModelDetails;
use sf_structure::DotBracketVec;

use crate::ComplexError;

/// The standalone fold of a strand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fold {
    structure: DotBracketVec,
    mfe: f64,
    /// Celsius.
    temperature: f64,
}

impl Fold {
    pub fn structure(&self) -> &DotBracketVec {
        &self.structure
    }

    pub fn mfe(&self) -> f64 {
        self.mfe
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

#[derive(Debug)]
struct StrandData {
    sequence: String,
    fold: OnceCell<Fold>,
}

#[derive(Debug, Clone)]
pub struct Strand(Arc<StrandData>);

impl Strand {
    /// Upper-cases the sequence and reads `T` as `U`.
    pub fn new(sequence: &str) -> Result<Self, ComplexError> {
        let sequence = normalize_strand(sequence)?;
        Ok(Strand(Arc::new(StrandData {
            sequence,
            fold: OnceCell::new(),
        })))
    }

    pub fn sequence(&self) -> &str {
        &self.0.sequence
    }

    pub fn len(&self) -> usize {
        self.0.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.sequence.is_empty()
    }

    /// The unconstrained fold of this strand, computed on first use.
    ///
    /// A strand is folded once: asking for the fold at a temperature other
    /// than the cached one is a `TemperatureMismatch`.
    pub fn fold<O>(&self, oracle: &O, model: &ModelDetails) -> Result<&Fold, ComplexError>
    where
        O: FoldingOracle + ?Sized,
    {
        let fold = self.0.fold.get_or_try_init(|| {
            let (structure, mfe) = oracle.fold_single(self.sequence(), model)?;
            debug!("fold {} -> {} ({:.2})", self.sequence(), structure, mfe);
            Ok::<_, ComplexError>(Fold { structure, mfe, temperature: model.temperature })
        })?;
        if fold.temperature != model.temperature {
            return Err(ComplexError::TemperatureMismatch {
                folded: fold.temperature,
                requested: model.temperature,
            });
        }
        Ok(fold)
    }

    /// The fold, if it has been computed.
    pub fn cached_fold(&self) -> Option<&Fold> {
        self.0.fold.get()
    }

}

impl PartialEq for Strand {
    fn eq(&self, other: &Self) -> bool {
        self.sequence() == other.sequence()
    }
}

impl Eq for Strand {}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence())
    }
}

impl TryFrom<&str> for Strand {
    type Error = ComplexError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Strand::new(s)
    }
}

/// Interns strands by sequence and name, so that a repeated sequence shares
/// one handle.
#[derive(Debug, Default)]
pub struct StrandRegistry {
    strands: AHashMap<String, Strand>,
    names: AHashMap<String, String>,
    counter: usize,
}

impl StrandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `sequence`, creating it if necessary.
    /// Unnamed strands are called `s0`, `s1`, ...
    pub fn intern(&mut self, sequence: &str, name: Option<&str>) -> Result<Strand, ComplexError> {
        let sequence = normalize_strand(sequence)?;
        if let Some(existing) = self.names.get(&sequence) {
            return match name {
                Some(n) if n != existing => Err(ComplexError::NameConflict(n.to_string())),
                _ => Ok(self.strands[existing].clone()),
            };
        }

        let assigned = match name {
            Some(n) if self.strands.contains_key(n) => {
                return Err(ComplexError::NameConflict(n.to_string()));
            }
            Some(n) => n.to_string(),
            None => loop {
                let n = format!("s{}", self.counter);
                self.counter += 1;
                if !self.strands.contains_key(&n) {
                    break n;
                }
            },
        };

        let strand = Strand::new(&sequence)?;
        self.strands.insert(assigned.clone(), strand.clone());
        self.names.insert(sequence, assigned);
        Ok(strand)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Strand> {
        self.strands.get(name)
    }

    pub fn get_name(&self, strand: &Strand) -> Option<&str> {
        self.names.get(strand.sequence()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_energy::NearestNeighborModel;

    #[test]
    fn test_strand_normalization() {
        let s = Strand::new("ggTTcc").unwrap();
        assert_eq!(s.sequence(), "GGUUCC");
        assert_eq!(s.len(), 6);
        assert_eq!(Strand::new("GGNCC").unwrap_err(), ComplexError::InvalidSequence('N', 2));
        assert_eq!(Strand::new("GG&CC").unwrap_err(), ComplexError::InvalidSequence('&', 2));
        assert!(Strand::new("").unwrap().is_empty());
    }

    #[test]
    fn test_fold_is_cached() {
        let nn = NearestNeighborModel::new();
        let md = ModelDetails::default();
        let s = Strand::new("GGGGAAAACCCC").unwrap();
        assert!(s.cached_fold().is_none());

        let copy = s.clone();
        let f1 = s.fold(&nn, &md).unwrap();
        assert_eq!(f1.structure().to_string(), "((((....))))");
        assert!((f1.mfe() - -6.38).abs() < 1e-9);
        assert_eq!(f1.temperature(), 37.0);

        // The clone sees the same cached fold.
        let f2 = copy.cached_fold().unwrap();
        assert!(std::ptr::eq(f1, f2));
    }

    #[test]
    fn test_fold_at_another_temperature() {
        let nn = NearestNeighborModel::new();
        let s = Strand::new("GGGGAAAACCCC").unwrap();
        s.fold(&nn, &ModelDetails::default()).unwrap();

        let hot = ModelDetails::with_temperature(90.0);
        assert_eq!(s.fold(&nn, &hot).unwrap_err(),
            ComplexError::TemperatureMismatch { folded: 37.0, requested: 90.0 });
        assert_eq!(s.cached_fold().unwrap().temperature(), 37.0);

        let fresh = Strand::new("GGGGAAAACCCC").unwrap();
        let f = fresh.fold(&nn, &hot).unwrap();
        assert_eq!(f.temperature(), 90.0);
        assert!(f.mfe() > -6.38);
    }

    #[test]
    fn test_registry_shares_handles() {
        let mut reg = StrandRegistry::new();
        let a = reg.intern("GGGG", None).unwrap();
        let b = reg.intern("gggg", None).unwrap();
        a.fold(&NearestNeighborModel::new(), &ModelDetails::default()).unwrap();
        assert!(b.cached_fold().is_some());
        assert_eq!(reg.get_name(&a), Some("s0"));

        let c = reg.intern("CCCC", Some("c")).unwrap();
        assert_eq!(reg.get_by_name("c"), Some(&c));
        assert_eq!(reg.intern("CCCC", Some("c")).unwrap(), c);
        assert_eq!(reg.len(), 2);

        let d = reg.intern("AAAA", None).unwrap();
        assert_eq!(reg.get_name(&d), Some("s1"));
    }

    #[test]
    fn test_registry_name_conflicts() {
        let mut reg = StrandRegistry::new();
        reg.intern("GGGG", Some("g")).unwrap();
        assert_eq!(reg.intern("CCCC", Some("g")).unwrap_err(),
            ComplexError::NameConflict("g".to_string()));
        assert_eq!(reg.intern("GGGG", Some("h")).unwrap_err(),
            ComplexError::NameConflict("h".to_string()));
        assert!(reg.intern("GGGG", None).is_ok());
    }
}
