// src/kmer/rolling.rs
//! Rolling 2-bit encoder producing canonical k-mer keys.
//!
//! Two accumulators are kept in step, one base at a time:
//!
//! - the forward word, shifted left with the new base OR'd into the low two
//!   bits and masked back to `2k` bits;
//! - the reverse-complement word, shifted right with the complement of the new
//!   base OR'd into the top slot of the `2k`-bit window (bit 60 for k = 31).
//!   Old bases fall off the bottom, so it never needs a mask.
//!
//! After k bases both words describe the same window from opposite strands and
//! the canonical key is their unsigned minimum. A key is emitted for every
//! window, starting with the first full one, so a sequence of length `L >= k`
//! yields exactly `L - k + 1` keys.

use std::iter::FusedIterator;

use crate::error::{KmerError, Result};
use crate::kmer::encoding::{
    base_code, complement_code, rc_shift, window_mask, BITS_PER_BASE, DEFAULT_K, KMER31_MASK,
    KMER31_RC_SHIFT, MAX_K,
};

/// Forward and reverse-complement accumulators for the current window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollingKmer {
    /// Forward strand word
    forward: u64,
    /// Reverse complement word
    reverse: u64,
    /// K-mer size
    k: usize,
    mask: u64,
    rc_shift: u32,
    /// Bases consumed since the last reset, saturating at k
    filled: usize,
}

impl RollingKmer {
    /// Create an empty encoder for windows of `k` bases.
    ///
    /// Returns [`KmerError::InvalidK`] unless `1 <= k <= 31`.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 || k > MAX_K {
            return Err(KmerError::InvalidK { k });
        }
        Ok(Self {
            forward: 0,
            reverse: 0,
            k,
            mask: window_mask(k),
            rc_shift: rc_shift(k),
            filled: 0,
        })
    }

    /// Consume one base.
    ///
    /// Bytes other than `A`, `C`, `G`, `T` contribute code 0 to both strands.
    #[inline]
    pub fn push(&mut self, base: u8) {
        self.forward = ((self.forward << BITS_PER_BASE) | base_code(base)) & self.mask;
        self.reverse = (self.reverse >> BITS_PER_BASE) | (complement_code(base) << self.rc_shift);
        if self.filled < self.k {
            self.filled += 1;
        }
    }

    /// Consume one base and return the canonical key once a full window is held.
    #[inline]
    pub fn roll(&mut self, base: u8) -> Option<u64> {
        self.push(base);
        self.is_full().then(|| self.canonical())
    }

    /// True once k bases have been pushed since creation or the last reset.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.k
    }

    /// Unsigned minimum of the forward and reverse-complement words.
    #[inline]
    pub fn canonical(&self) -> u64 {
        self.forward.min(self.reverse)
    }

    #[inline]
    pub fn forward(&self) -> u64 {
        self.forward
    }

    #[inline]
    pub fn reverse(&self) -> u64 {
        self.reverse
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Drop the current window so the next k bases start a fresh one.
    pub fn reset(&mut self) {
        self.forward = 0;
        self.reverse = 0;
        self.filled = 0;
    }
}

impl Default for RollingKmer {
    /// A 31-mer encoder.
    fn default() -> Self {
        Self {
            forward: 0,
            reverse: 0,
            k: DEFAULT_K,
            mask: KMER31_MASK,
            rc_shift: KMER31_RC_SHIFT,
            filled: 0,
        }
    }
}

/// Lazy, one-pass iterator over the canonical keys of a sequence.
#[derive(Clone, Debug)]
pub struct CanonicalKmers<'a> {
    seq: &'a [u8],
    state: RollingKmer,
    /// Number of bytes consumed so far
    pos: usize,
}

impl<'a> CanonicalKmers<'a> {
    fn with_state(seq: &'a [u8], state: RollingKmer) -> Self {
        Self { seq, state, pos: 0 }
    }

    /// The window length this iterator encodes.
    pub fn k(&self) -> usize {
        self.state.k()
    }

    /// Pair each key with the 0-based start of its window.
    pub fn with_positions(self) -> PositionedKmers<'a> {
        PositionedKmers { inner: self }
    }

    fn remaining(&self) -> usize {
        let k = self.state.k();
        if self.seq.len() < k {
            return 0;
        }
        let total = self.seq.len() - k + 1;
        let emitted = if self.pos >= k { self.pos - k + 1 } else { 0 };
        total - emitted
    }
}

impl<'a> Iterator for CanonicalKmers<'a> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        while let Some(&base) = self.seq.get(self.pos) {
            self.pos += 1;
            if let Some(key) = self.state.roll(base) {
                return Some(key);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for CanonicalKmers<'_> {}

impl FusedIterator for CanonicalKmers<'_> {}

/// Iterator yielding `(window_start, key)` pairs.
#[derive(Clone, Debug)]
pub struct PositionedKmers<'a> {
    inner: CanonicalKmers<'a>,
}

impl<'a> Iterator for PositionedKmers<'a> {
    type Item = (usize, u64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.inner.next()?;
        Some((self.inner.pos - self.inner.k(), key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PositionedKmers<'_> {}

impl FusedIterator for PositionedKmers<'_> {}

/// Canonical 31-mer keys of `seq`, left to right.
///
/// # Example
/// ```
/// let keys: Vec<u64> = kmerkey::encode("A".repeat(32).as_str()).collect();
/// assert_eq!(keys, vec![0, 0]);
/// ```
pub fn encode<S: AsRef<[u8]> + ?Sized>(seq: &S) -> CanonicalKmers<'_> {
    CanonicalKmers::with_state(seq.as_ref(), RollingKmer::default())
}

/// Canonical keys for windows of `k` bases. Fails only for an unsupported `k`.
pub fn encode_with_k<S: AsRef<[u8]> + ?Sized>(seq: &S, k: usize) -> Result<CanonicalKmers<'_>> {
    Ok(CanonicalKmers::with_state(seq.as_ref(), RollingKmer::new(k)?))
}
