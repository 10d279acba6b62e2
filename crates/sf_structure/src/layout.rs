//! Strand layout of a concatenated multi-strand complex.
//!
//! A complex of N strands is written as one string with a separator
//! between consecutive strands. The `StrandLayout` computes the segment of
//! every strand once (from the strand lengths) so that all code working on
//! concatenated buffers shares the same boundary arithmetic.
//!
//! Two coordinate systems are in use:
//!  - *concatenated* offsets count the separators (as in dot-bracket strings),
//!  - *nucleotide* offsets skip them (as in the folding recursions).

use std::ops::Range;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::SEPARATOR;

/// One strand's contribution to a concatenated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    strand: usize,
    start: usize,
    end: usize,
}

impl Segment {
    pub fn new(strand: usize, start: usize, end: usize) -> Self {
        Segment { strand, start, end }
    }

    /// Index of the strand within the complex.
    pub fn strand(&self) -> usize {
        self.strand
    }

    /// First position (the 5' end) in concatenated coordinates.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last position (the 3' end) in concatenated coordinates.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The same segment in nucleotide coordinates (separators removed).
    pub fn nucleotide_range(&self) -> Range<usize> {
        (self.start - self.strand)..(self.end - self.strand)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StrandLayout {
    segments: Vec<Segment>,
}

impl StrandLayout {
    /// Layout for strands of the given lengths, separated by one position each.
    pub fn from_lengths<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        let mut segments = Vec::new();
        let mut start = 0;
        for (strand, len) in lengths.into_iter().enumerate() {
            segments.push(Segment::new(strand, start, start + len));
            start += len + 1;
        }
        StrandLayout { segments }
    }

    /// Layout of a concatenated string, split at every separator.
    pub fn from_concatenated(s: &str) -> Self {
        StrandLayout::from_lengths(s.split(SEPARATOR).map(|part| part.chars().count()))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, strand: usize) -> Option<&Segment> {
        self.segments.get(strand)
    }

    pub fn num_strands(&self) -> usize {
        self.segments.len()
    }

    /// Total length including separators.
    pub fn len(&self) -> usize {
        self.segments.last().map_or(0, |s| s.end())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nucleotides, i.e. the length without separators.
    pub fn nucleotides(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    /// Offsets of the separators in concatenated coordinates.
    pub fn separator_offsets(&self) -> Vec<usize> {
        self.segments.iter().skip(1).map(|s| s.start() - 1).collect()
    }

    pub fn is_separator(&self, pos: usize) -> bool {
        pos < self.len() && self.strand_at(pos).is_none()
    }

    /// Strand index of a concatenated position, `None` for separators.
    pub fn strand_at(&self, pos: usize) -> Option<usize> {
        self.segments.iter()
            .find(|s| s.range().contains(&pos))
            .map(|s| s.strand())
    }

    /// Strand index for every nucleotide position.
    pub fn nucleotide_strands(&self) -> Vec<usize> {
        self.segments.iter()
            .flat_map(|s| std::iter::repeat_n(s.strand(), s.len()))
            .collect()
    }

    /// Re-insert separators into a structure given in nucleotide coordinates.
    pub fn insert_breaks(&self, nucleotides: &[DotBracket]) -> DotBracketVec {
        debug_assert_eq!(nucleotides.len(), self.nucleotides());
        let mut out = Vec::with_capacity(self.len());
        for (k, seg) in self.segments.iter().enumerate() {
            if k > 0 {
                out.push(DotBracket::Break);
            }
            out.extend_from_slice(&nucleotides[seg.nucleotide_range()]);
        }
        DotBracketVec(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_lengths() {
        let layout = StrandLayout::from_lengths([4, 3, 2]);
        assert_eq!(layout.num_strands(), 3);
        assert_eq!(layout.len(), 4 + 3 + 2 + 2);
        assert_eq!(layout.nucleotides(), 9);
        assert_eq!(layout.separator_offsets(), vec![4, 8]);
        assert_eq!(layout.segment(1), Some(&Segment::new(1, 5, 8)));
        assert_eq!(layout.segment(2).unwrap().nucleotide_range(), 7..9);
    }

    #[test]
    fn test_layout_positions() {
        let layout = StrandLayout::from_concatenated("GGGG&CCC");
        assert_eq!(layout.strand_at(0), Some(0));
        assert_eq!(layout.strand_at(4), None);
        assert!(layout.is_separator(4));
        assert!(!layout.is_separator(8));
        assert_eq!(layout.strand_at(7), Some(1));
        assert_eq!(layout.nucleotide_strands(), vec![0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_insert_breaks() {
        let layout = StrandLayout::from_lengths([2, 2]);
        let inner = DotBracketVec::try_from("(())").unwrap();
        assert_eq!(layout.insert_breaks(&inner).to_string(), "((&))");
    }
}

