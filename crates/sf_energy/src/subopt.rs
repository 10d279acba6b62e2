//! Suboptimal structure enumeration (Wuchty-style).
//!
//! Partial structures are kept on a stack together with the blocks that
//! still need to be decomposed. The lower bound of a partial structure is
//! the energy decided so far plus the optimal energy of every pending block,
//! so a branch is dropped as soon as its bound leaves the energy window.
//! Because the grammar is unambiguous, every structure is reported once.

use log::trace;

use crate::recursions::Block;
use crate::recursions::FoldProblem;
use crate::OracleError;

#[derive(Debug, Clone)]
struct Partial {
    pending: Vec<Block>,
    pairs: Vec<(usize, usize)>,
    /// Energy of the decomposition steps taken so far.
    energy: i32,
    /// `energy` plus the optimal energy of all pending blocks.
    bound: i32,
}

/// All structures with energy `<= mfe + delta` as (pairs, energy).
pub(crate) fn enumerate(
    fp: &FoldProblem,
    delta: i32,
    limit: Option<usize>,
) -> Result<Vec<(Vec<(usize, usize)>, i32)>, OracleError> {
    let threshold = fp.mfe().saturating_add(delta.max(0));
    let mut results = Vec::new();

    let root = Partial {
        pending: fp.root().into_iter().collect(),
        pairs: Vec::new(),
        energy: 0,
        bound: fp.mfe(),
    };
    let mut stack = vec![root];

    while let Some(mut partial) = stack.pop() {
        let Some(block) = partial.pending.pop() else {
            if limit.is_some_and(|l| results.len() >= l) {
                return Err(OracleError::TooManyStructures(results.len()));
            }
            results.push((partial.pairs, partial.energy));
            continue;
        };
        let rest = partial.bound - fp.opt(block);
        for alt in fp.alternatives(block) {
            let bound = rest + fp.completion(&alt);
            if bound > threshold {
                continue;
            }
            let mut child = partial.clone();
            child.energy += alt.energy;
            child.bound = bound;
            child.pairs.extend(alt.pair);
            child.pending.extend(alt.blocks.into_iter().flatten());
            stack.push(child);
        }
    }
    trace!("{} structures within {} of {}", results.len(), delta, fp.mfe());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_complex;
    use crate::EnergyParams;
    use sf_structure::BoundaryMode;
    use sf_structure::Constraint;

    fn problem(seq: &str, constraint: Option<&str>) -> FoldProblem {
        let (bases, layout) = parse_complex(seq).unwrap();
        let c = constraint.map(|c| Constraint::parse(c, BoundaryMode::Soft).unwrap());
        FoldProblem::new(bases, layout, c.as_ref(), EnergyParams::default()).unwrap()
    }

    #[test]
    fn test_zero_window_contains_mfe() {
        let fp = problem("GGGG&CCCC", None);
        let sols = enumerate(&fp, 0, None).unwrap();
        assert_eq!(sols.len(), 1);
        assert_eq!(sols[0].1, fp.mfe());
        assert_eq!(fp.to_dotbracket(&sols[0].0).to_string(), "((((&))))");
    }

    #[test]
    fn test_window_bounds_and_uniqueness() {
        let fp = problem("GGGAC&GUCCC", None);
        let delta = 800;
        let sols = enumerate(&fp, delta, None).unwrap();
        assert!(sols.len() > 1);
        let mut seen = std::collections::HashSet::new();
        for (pairs, energy) in &sols {
            assert!(*energy >= fp.mfe());
            assert!(*energy <= fp.mfe() + delta);
            let dbv = fp.to_dotbracket(pairs);
            assert_eq!(fp.evaluate(&dbv).unwrap(), *energy, "{}", dbv);
            assert!(seen.insert(dbv.to_string()), "duplicate {}", dbv);
        }
        // the duplex is at -7.02, so the open chain (0.0) lies within the window
        assert_eq!(fp.mfe(), -702);
        assert!(seen.contains(".....&....."));
    }

    #[test]
    fn test_limit() {
        let fp = problem("GGGAC&GUCCC", None);
        let err = enumerate(&fp, 800, Some(2)).unwrap_err();
        assert_eq!(err, OracleError::TooManyStructures(2));
    }

    #[test]
    fn test_respects_constraint() {
        let fp = problem("GGGG&CCCC", Some("xxxx&xxxx"));
        let sols = enumerate(&fp, 1000, None).unwrap();
        assert_eq!(sols.len(), 1);
        assert!(sols[0].0.is_empty());
    }
}

