// src/kmer/filter.rs
//! Key subsampling and ambiguity-free segmentation.
//!
//! Index builders rarely keep every key. A [`HashMaskFilter`] keeps only keys
//! whose masked low bits equal a fixed value; the default `mask = 3, value = 1`
//! keeps the keys whose last base code is C, roughly a quarter of them.
//!
//! [`acgt_runs`] splits a sequence at runs of non-ACGT bytes so that callers
//! who do not want `N`-containing windows can encode each clean run on its own.

use crate::error::{KmerError, Result};
use crate::kmer::encoding::is_acgt;

/// Keeps keys where `key & mask == value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashMaskFilter {
    mask: u64,
    value: u64,
}

impl HashMaskFilter {
    pub fn new(mask: u64, value: u64) -> Result<Self> {
        if value & !mask != 0 {
            return Err(KmerError::InvalidHashFilter { mask, value });
        }
        Ok(Self { mask, value })
    }

    /// A filter that keeps every key.
    pub fn pass_all() -> Self {
        Self { mask: 0, value: 0 }
    }

    #[inline]
    pub fn keeps(&self, key: u64) -> bool {
        key & self.mask == self.value
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Lazily drop the keys this filter rejects.
    pub fn apply<I>(self, keys: I) -> impl Iterator<Item = u64>
    where
        I: IntoIterator<Item = u64>,
    {
        keys.into_iter().filter(move |&key| self.keeps(key))
    }
}

impl Default for HashMaskFilter {
    fn default() -> Self {
        Self { mask: 3, value: 1 }
    }
}

/// Iterator over maximal A/C/G/T runs of a sequence, as `(start, run)`.
pub struct AcgtRuns<'a> {
    seq: &'a [u8],
    pos: usize,
    min_len: usize,
}

impl<'a> Iterator for AcgtRuns<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.seq.len() {
            // skip ambiguous bytes
            while self.pos < self.seq.len() && !is_acgt(self.seq[self.pos]) {
                self.pos += 1;
            }
            let start = self.pos;
            while self.pos < self.seq.len() && is_acgt(self.seq[self.pos]) {
                self.pos += 1;
            }
            if self.pos > start && self.pos - start >= self.min_len {
                return Some((start, &self.seq[start..self.pos]));
            }
        }
        None
    }
}

/// Maximal runs of A/C/G/T at least `min_len` long. Pass k to skip runs too short for a window.
pub fn acgt_runs(seq: &[u8], min_len: usize) -> AcgtRuns<'_> {
    AcgtRuns {
        seq,
        pos: 0,
        min_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_keeps_trailing_c() {
        let filter = HashMaskFilter::default();
        assert!(filter.keeps(0b01));
        assert!(filter.keeps(0b1101));
        assert!(!filter.keeps(0b00));
        assert!(!filter.keeps(0b10));
        assert!(!filter.keeps(0b11));
    }

    #[test]
    fn test_filter_apply() {
        let kept: Vec<u64> = HashMaskFilter::new(0b1111, 0b0101)
            .unwrap()
            .apply(0..32u64)
            .collect();
        assert_eq!(kept, vec![5, 21]);

        let all: Vec<u64> = HashMaskFilter::pass_all().apply(vec![7, 8, 9]).collect();
        assert_eq!(all, vec![7, 8, 9]);
    }

    #[test]
    fn test_filter_rejects_value_outside_mask() {
        assert_eq!(
            HashMaskFilter::new(3, 4),
            Err(KmerError::InvalidHashFilter { mask: 3, value: 4 })
        );
    }

    #[test]
    fn test_acgt_runs() {
        let seq = b"NNACGTNNNGGNTTTTT";
        let runs: Vec<(usize, &[u8])> = acgt_runs(seq, 1).collect();
        assert_eq!(
            runs,
            vec![(2, &b"ACGT"[..]), (9, &b"GG"[..]), (12, &b"TTTTT"[..])]
        );

        let long: Vec<(usize, &[u8])> = acgt_runs(seq, 4).collect();
        assert_eq!(long, vec![(2, &b"ACGT"[..]), (12, &b"TTTTT"[..])]);
    }

    #[test]
    fn test_acgt_runs_edge_cases() {
        assert_eq!(acgt_runs(b"", 1).count(), 0);
        assert_eq!(acgt_runs(b"NNNN", 1).count(), 0);
        assert_eq!(acgt_runs(b"ACGT", 0).collect::<Vec<_>>(), vec![(0, &b"ACGT"[..])]);
        // lowercase is not ACGT
        assert_eq!(acgt_runs(b"acgtAC", 1).collect::<Vec<_>>(), vec![(4, &b"AC"[..])]);
    }
}
