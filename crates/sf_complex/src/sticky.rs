//! Sticky-end constraints.
//!
//! The unpaired tails of a strand are the only regions that may pair with
//! another strand. Starting from a constraint that carries each strand's own
//! structure, the builder writes `e` (dangling external) over the unpaired
//! tail at every marked edge, and `x` (intramolecular only) over every other
//! unpaired position. Pairing information is never touched.

use log::trace;
use sf_structure::Constraint;
use sf_structure::ConstraintSite;
use sf_structure::ConstraintTag;
use sf_structure::Segment;

use crate::ComplexError;

/// The edges of a strand that face a binding partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StickyEdges {
    pub five_prime: bool,
    pub three_prime: bool,
}

impl StickyEdges {
    pub const NONE: StickyEdges = StickyEdges { five_prime: false, three_prime: false };
    pub const FIVE_PRIME: StickyEdges = StickyEdges { five_prime: true, three_prime: false };
    pub const THREE_PRIME: StickyEdges = StickyEdges { five_prime: false, three_prime: true };
    pub const BOTH: StickyEdges = StickyEdges { five_prime: true, three_prime: true };

    /// Edges of strand `index` in a chain of `count` strands.
    pub fn in_chain(index: usize, count: usize, outward_faces: bool) -> Self {
        StickyEdges {
            five_prime: index > 0 || outward_faces,
            three_prime: index + 1 < count || outward_faces,
        }
    }
}

fn mark_tail<'a, I>(sites: I)
where
    I: Iterator<Item = &'a mut ConstraintSite>,
{
    for site in sites {
        if !site.is_unpaired() {
            break;
        }
        *site = ConstraintSite::dangling();
    }
}

/// Mark the sticky ends of one strand in place.
///
/// Applying the builder twice, or edge by edge, gives the same result as
/// applying it once with all edges. Nothing is written if the segment is
/// empty or does not lie within the constraint.
pub fn mark_sticky_ends(
    constraint: &mut Constraint,
    segment: &Segment,
    edges: StickyEdges,
) -> Result<(), ComplexError> {
    let (start, end) = (segment.start(), segment.end());
    let invalid = ComplexError::InvalidRange { start, end, len: constraint.len() };
    if start >= end || end > constraint.len() {
        return Err(invalid);
    }
    let sites = &mut constraint.sites_mut()[start..end];
    if sites.iter().any(|s| s.tag() == ConstraintTag::Separator) {
        return Err(invalid);
    }

    if edges.three_prime {
        mark_tail(sites.iter_mut().rev());
    }
    if edges.five_prime {
        mark_tail(sites.iter_mut());
    }
    for site in sites.iter_mut() {
        if site.tag() == ConstraintTag::Free && site.is_unpaired() {
            *site = ConstraintSite::intramolecular();
        }
    }
    trace!("strand {} edges {:?}: {}", segment.strand(), edges,
        sites.iter().map(|s| s.symbol()).collect::<String>());
    Ok(())
}
