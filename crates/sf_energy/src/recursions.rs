//! Constrained minimum-free-energy recursions of the stacking model.
//!
//! The grammar is unambiguous, so that every structure has exactly one
//! derivation. This matters for suboptimal enumeration, which would
//! otherwise report structures more than once.
//!
//! ```text
//! W(i,j) = min( X(i,j), I(i,j) + V(i,j) )                 any structure on [i..j]
//! X(i,j) = min( W(i+1,j),                                 i unpaired
//!               min_k I(i,k) + V(i,k) + W(k+1,j) )        i pairs k < j
//! V(i,j) = min( S(i,j) + V(i+1,j-1),                      (i+1,j-1) stacks on (i,j)
//!               T(i,j) + X(i+1,j-1) )                     anything else inside
//! ```
//!
//! `I` is the helix initiation, `S` the stacking energy and `T` the terminal
//! penalty of a helix end. If (i,j) cannot stack (the backbone is broken by
//! a strand boundary next to i or j), the interior of V is a plain W.
//!
//! All indices are nucleotide coordinates (separators removed).

use ndarray::Array2;
use sf_structure::Constraint;
use sf_structure::ConstraintTag;
use sf_structure::DotBracket;
use sf_structure::DotBracketVec;
use sf_structure::PairTable;
use sf_structure::StrandLayout;
use sf_structure::StructureError;

use crate::Base;
use crate::EnergyParams;
use crate::OracleError;
use crate::PairType;
use crate::MIN_HAIRPIN;

/// Energy of impossible states. Three of them still fit into an `i32`.
pub(crate) const INF: i32 = i32::MAX / 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Any,
    Intermolecular,
    Intramolecular,
}

/// What the constraint allows at one nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SiteRule {
    scope: Scope,
    partner: Option<usize>,
    must_pair: bool,
}

impl SiteRule {
    const FREE: SiteRule = SiteRule { scope: Scope::Any, partner: None, must_pair: false };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block {
    W(usize, usize),
    X(usize, usize),
    V(usize, usize),
}

/// One way to decompose a block.
#[derive(Debug, Clone)]
pub(crate) struct Alternative {
    pub energy: i32,
    pub pair: Option<(usize, usize)>,
    pub blocks: [Option<Block>; 2],
}

/// Addition that keeps impossible states impossible.
fn plus(a: i32, b: i32) -> i32 {
    if a >= INF || b >= INF { INF } else { (a + b).min(INF) }
}

fn w_block(i: usize, j: usize) -> Option<Block> {
    (i <= j).then_some(Block::W(i, j))
}

fn x_block(i: usize, j: usize) -> Option<Block> {
    (i <= j).then_some(Block::X(i, j))
}

/// A folding problem with filled dynamic programming tables.
#[derive(Debug, Clone)]
pub(crate) struct FoldProblem {
    bases: Vec<Base>,
    strands: Vec<usize>,
    layout: StrandLayout,
    rules: Vec<SiteRule>,
    params: EnergyParams,
    v: Array2<i32>,
    x: Array2<i32>,
    w: Array2<i32>,
}

impl FoldProblem {
    /// Set up and fill the tables. `constraint` is in concatenated
    /// coordinates; `None` means unconstrained.
    pub fn new(
        bases: Vec<Base>,
        layout: StrandLayout,
        constraint: Option<&Constraint>,
        params: EnergyParams,
    ) -> Result<Self, OracleError> {
        debug_assert_eq!(bases.len(), layout.nucleotides());
        let rules = match constraint {
            Some(c) => site_rules(c, &layout)?,
            None => vec![SiteRule::FREE; bases.len()],
        };
        let n = bases.len();
        let mut fp = FoldProblem {
            strands: layout.nucleotide_strands(),
            bases,
            layout,
            rules,
            params,
            v: Array2::from_elem((n, n), INF),
            x: Array2::from_elem((n, n), INF),
            w: Array2::from_elem((n, n), INF),
        };
        fp.fill();
        Ok(fp)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Pair type of (i, j) if the pair is allowed by sequence, geometry and
    /// constraint.
    fn pair_type(&self, i: usize, j: usize) -> Option<PairType> {
        debug_assert!(i < j);
        let pt = PairType::of(self.bases[i], self.bases[j])?;
        let same = self.strands[i] == self.strands[j];
        if same && j - i - 1 < MIN_HAIRPIN {
            return None;
        }
        for (k, other) in [(i, j), (j, i)] {
            let rule = &self.rules[k];
            match rule.scope {
                Scope::Intermolecular if same => return None,
                Scope::Intramolecular if !same => return None,
                _ => (),
            }
            if rule.partner.is_some_and(|p| p != other) {
                return None;
            }
        }
        Some(pt)
    }

    fn unpaired_ok(&self, i: usize) -> bool {
        !self.rules[i].must_pair
    }

    /// (i+1, j-1) may stack on (i, j): both sides have an intact backbone.
    fn stackable(&self, i: usize, j: usize) -> bool {
        i + 1 < j - 1
            && self.strands[i] == self.strands[i + 1]
            && self.strands[j - 1] == self.strands[j]
    }

    fn initiation(&self, i: usize, j: usize, pt: PairType) -> i32 {
        self.params.initiation(pt, self.strands[i] != self.strands[j])
    }

    fn get_w(&self, i: usize, j: usize) -> i32 {
        if i > j { 0 } else { self.w[(i, j)] }
    }

    fn get_x(&self, i: usize, j: usize) -> i32 {
        if i > j { 0 } else { self.x[(i, j)] }
    }

    fn fill(&mut self) {
        let n = self.len();
        for l in 0..n {
            for i in 0..n - l {
                let j = i + l;
                let v = match (i < j).then(|| self.pair_type(i, j)).flatten() {
                    Some(pt) => self.interior(i, j, pt),
                    None => INF,
                };
                self.v[(i, j)] = v;

                let mut x = if self.unpaired_ok(i) { self.get_w(i + 1, j) } else { INF };
                for k in i + 1..j {
                    if let Some(pt) = self.pair_type(i, k) {
                        let e = plus(self.v[(i, k)], self.get_w(k + 1, j));
                        x = x.min(plus(self.initiation(i, k, pt), e));
                    }
                }
                self.x[(i, j)] = x.min(INF);

                let mut w = x;
                if v < INF {
                    if let Some(pt) = self.pair_type(i, j) {
                        w = w.min(plus(self.initiation(i, j, pt), v));
                    }
                }
                self.w[(i, j)] = w.min(INF);
            }
        }
    }

    fn interior(&self, i: usize, j: usize, pt: PairType) -> i32 {
        let term = self.params.terminal(pt);
        let e = if self.stackable(i, j) {
            let stacked = match self.pair_type(i + 1, j - 1) {
                Some(inner) => plus(self.params.stack(pt, inner), self.v[(i + 1, j - 1)]),
                None => INF,
            };
            stacked.min(plus(term, self.get_x(i + 1, j - 1)))
        } else {
            plus(term, self.get_w(i + 1, j - 1))
        };
        e.min(INF)
    }

    /// Optimal energy of a block.
    pub fn opt(&self, block: Block) -> i32 {
        match block {
            Block::W(i, j) => self.get_w(i, j),
            Block::X(i, j) => self.get_x(i, j),
            Block::V(i, j) => self.v[(i, j)],
        }
    }

    /// Minimum free energy of the whole problem (`INF` if unsatisfiable).
    pub fn mfe(&self) -> i32 {
        if self.len() == 0 { 0 } else { self.w[(0, self.len() - 1)] }
    }

    pub fn root(&self) -> Option<Block> {
        (self.len() > 0).then(|| Block::W(0, self.len() - 1))
    }

    /// All feasible decompositions of a block.
    pub fn alternatives(&self, block: Block) -> Vec<Alternative> {
        let mut alts = Vec::new();
        match block {
            Block::W(i, j) | Block::X(i, j) => {
                if self.unpaired_ok(i) {
                    alts.push(Alternative {
                        energy: 0,
                        pair: None,
                        blocks: [w_block(i + 1, j), None],
                    });
                }
                for k in i + 1..j {
                    if let Some(pt) = self.pair_type(i, k) {
                        if self.v[(i, k)] < INF {
                            alts.push(Alternative {
                                energy: self.initiation(i, k, pt),
                                pair: None,
                                blocks: [Some(Block::V(i, k)), w_block(k + 1, j)],
                            });
                        }
                    }
                }
                if let Block::W(..) = block {
                    if i < j && self.v[(i, j)] < INF {
                        if let Some(pt) = self.pair_type(i, j) {
                            alts.push(Alternative {
                                energy: self.initiation(i, j, pt),
                                pair: None,
                                blocks: [Some(Block::V(i, j)), None],
                            });
                        }
                    }
                }
            }
            Block::V(i, j) => {
                let Some(pt) = self.pair_type(i, j) else {
                    return alts;
                };
                let term = self.params.terminal(pt);
                if self.stackable(i, j) {
                    if let Some(inner) = self.pair_type(i + 1, j - 1) {
                        alts.push(Alternative {
                            energy: self.params.stack(pt, inner),
                            pair: Some((i, j)),
                            blocks: [Some(Block::V(i + 1, j - 1)), None],
                        });
                    }
                    alts.push(Alternative {
                        energy: term,
                        pair: Some((i, j)),
                        blocks: [x_block(i + 1, j - 1), None],
                    });
                } else {
                    alts.push(Alternative {
                        energy: term,
                        pair: Some((i, j)),
                        blocks: [w_block(i + 1, j - 1), None],
                    });
                }
            }
        }
        alts.retain(|a| self.completion(a) < INF);
        alts
    }

    /// Best energy reachable through an alternative.
    pub fn completion(&self, alt: &Alternative) -> i32 {
        alt.blocks.iter().flatten().fold(alt.energy, |acc, &b| plus(acc, self.opt(b)))
    }

    /// One minimum free energy structure in nucleotide coordinates.
    pub fn backtrack(&self) -> Result<Vec<(usize, usize)>, OracleError> {
        if self.mfe() >= INF {
            return Err(OracleError::Unsatisfiable);
        }
        let mut pairs = Vec::new();
        let mut stack: Vec<Block> = self.root().into_iter().collect();
        while let Some(block) = stack.pop() {
            let target = self.opt(block);
            let alt = self.alternatives(block)
                .into_iter()
                .find(|a| self.completion(a) == target)
                .ok_or(OracleError::Unsatisfiable)?;
            pairs.extend(alt.pair);
            stack.extend(alt.blocks.into_iter().flatten());
        }
        Ok(pairs)
    }

    /// Write pairs (nucleotide coordinates) as a dot-bracket string with
    /// separators.
    pub fn to_dotbracket(&self, pairs: &[(usize, usize)]) -> DotBracketVec {
        let mut dbv = vec![DotBracket::Unpaired; self.len()];
        for &(i, j) in pairs {
            dbv[i] = DotBracket::Open;
            dbv[j] = DotBracket::Close;
        }
        self.layout.insert_breaks(&dbv)
    }

    /// Free energy of a given structure (separators included) under the
    /// model. The constraint is not checked.
    pub fn evaluate(&self, structure: &DotBracketVec) -> Result<i32, StructureError> {
        if structure.len() != self.layout.len() {
            return Err(StructureError::LengthMismatch {
                expected: self.layout.len(),
                found: structure.len(),
            });
        }
        let nucleotides: Vec<DotBracket> = structure.iter()
            .copied()
            .filter(|&db| db != DotBracket::Break)
            .collect();
        let pt = PairTable::try_from(&DotBracketVec(nucleotides))?;
        let partner = |k: usize| pt[k].map(|p| p as usize);

        let mut energy = 0;
        for (i, j) in pt.pairs() {
            let (i, j) = (i as usize, j as usize);
            let Some(ptype) = PairType::of(self.bases[i], self.bases[j]) else {
                return Err(StructureError::InvalidToken('(', i));
            };
            let stacked_outside = i > 0
                && partner(i - 1) == Some(j + 1)
                && self.stackable(i - 1, j + 1);
            if !stacked_outside {
                energy += self.initiation(i, j, ptype);
            }
            let stacked_inside = self.stackable(i, j) && partner(i + 1) == Some(j - 1);
            if stacked_inside {
                let inner = PairType::of(self.bases[i + 1], self.bases[j - 1])
                    .ok_or(StructureError::InvalidToken('(', i + 1))?;
                energy += self.params.stack(ptype, inner);
            } else {
                energy += self.params.terminal(ptype);
            }
        }
        Ok(energy)
    }
}

/// Translate a constraint (concatenated coordinates) into per-nucleotide rules.
fn site_rules(constraint: &Constraint, layout: &StrandLayout) -> Result<Vec<SiteRule>, OracleError> {
    if constraint.len() != layout.len() {
        return Err(OracleError::LengthMismatch {
            sequence: layout.len(),
            constraint: constraint.len(),
        });
    }
    for (pos, site) in constraint.iter().enumerate() {
        let is_sep = site.tag() == ConstraintTag::Separator;
        if is_sep != layout.is_separator(pos) {
            return Err(StructureError::InvalidToken(site.symbol(), pos).into());
        }
    }
    // concatenated -> nucleotide coordinates
    let to_nt = |pos: usize| layout.strand_at(pos).map(|s| pos - s);
    let partners = constraint.partners()?;

    let mut rules = Vec::with_capacity(layout.nucleotides());
    for (pos, site) in constraint.iter().enumerate() {
        let rule = match site.tag() {
            ConstraintTag::Separator => continue,
            ConstraintTag::DanglingExternal => SiteRule { scope: Scope::Intermolecular, ..SiteRule::FREE },
            ConstraintTag::IntramolecularOnly => SiteRule { scope: Scope::Intramolecular, ..SiteRule::FREE },
            ConstraintTag::Free | ConstraintTag::EnforcedPair => SiteRule {
                scope: Scope::Any,
                partner: partners[pos].and_then(to_nt),
                must_pair: site.tag() == ConstraintTag::EnforcedPair,
            },
        };
        rules.push(rule);
    }
    Ok(rules)
}
