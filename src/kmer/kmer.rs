use crate::kmer::encoding::{base_code, code_to_base, complement_code, window_mask};

/// Packs a window into a forward-strand word (2 bits per base, first base most significant).
///
/// Non-ACGT bytes pack as A. Only the last 32 bases of a longer window survive.
pub fn pack_kmer(window: &[u8]) -> u64 {
    window.iter().fold(0u64, |acc, &b| (acc << 2) | base_code(b))
}

/// Packs the reverse complement of a window, with the same unknown-base rule as the rolling encoder.
pub fn pack_kmer_rc(window: &[u8]) -> u64 {
    window
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 2) | complement_code(b))
}

/// Reverse complement of a packed k-mer word.
///
/// Every code is taken at face value, so a slot that came from an `N` is read
/// as `A` and complemented to `T`.
pub fn reverse_complement_packed(word: u64, k: usize) -> u64 {
    // complement is x ^ 0b11 for every 2-bit slot
    let mut fwd = !word & window_mask(k);
    let mut rc = 0u64;
    for _ in 0..k {
        rc = (rc << 2) | (fwd & 0b11);
        fwd >>= 2;
    }
    rc
}

/// Canonical form of a packed ACGT k-mer: the smaller of itself and its reverse complement.
pub fn canonical_packed(word: u64, k: usize) -> u64 {
    word.min(reverse_complement_packed(word, k))
}

/// Decodes a packed word back to its ACGT text.
///
/// Slots beyond the 32 a `u64` holds decode as `A`.
pub fn decode_kmer(word: u64, k: usize) -> String {
    (0..k)
        .rev()
        .map(|i| {
            let code = u32::try_from(2 * i)
                .ok()
                .and_then(|shift| word.checked_shr(shift))
                .unwrap_or(0);
            code_to_base(code) as char
        })
        .collect()
}

/// Returns the reverse complement of a DNA sequence.
///
/// Bytes other than `A`, `C`, `G`, `T` keep their value and only move position.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_decode() {
        let word = pack_kmer(b"ACGT");
        assert_eq!(word, 0b00_01_10_11);
        assert_eq!(decode_kmer(word, 4), "ACGT");
        assert_eq!(decode_kmer(pack_kmer(b"TTGCA"), 5), "TTGCA");
    }

    #[test]
    fn test_reverse_complement_packed() {
        let word = pack_kmer(b"AACGT");
        let rc = reverse_complement_packed(word, 5);
        assert_eq!(decode_kmer(rc, 5), "ACGTT");
        assert_eq!(reverse_complement_packed(rc, 5), word);
        assert_eq!(rc, pack_kmer_rc(b"AACGT"));
    }

    #[test]
    fn test_canonical_packed_strand_independent() {
        let a = pack_kmer(b"GATTACA");
        let b = pack_kmer(b"TGTAATC");
        assert_eq!(canonical_packed(a, 7), canonical_packed(b, 7));
        assert_eq!(canonical_packed(a, 7), a.min(b));
    }

    #[test]
    fn test_reverse_complement_bytes() {
        assert_eq!(reverse_complement(b"ATCG"), b"CGAT");
        assert_eq!(reverse_complement(b"AANCC"), b"GGNTT");
        assert!(reverse_complement(b"").is_empty());
    }

    #[test]
    fn test_full_width_32mer() {
        let c = pack_kmer(&[b'C'; 32]);
        let g = pack_kmer(&[b'G'; 32]);
        assert_eq!(c, 0x5555_5555_5555_5555);
        assert_eq!(reverse_complement_packed(c, 32), g);
        assert_eq!(canonical_packed(c, 32), c);
        assert_eq!(canonical_packed(g, 32), c);
        assert_eq!(decode_kmer(c, 32), "C".repeat(32));

        let mixed = pack_kmer(b"ACGTTGCAAGGCTTACCGATTAGCCATGACGT");
        assert_eq!(decode_kmer(mixed, 32), "ACGTTGCAAGGCTTACCGATTAGCCATGACGT");
        assert_eq!(reverse_complement_packed(reverse_complement_packed(mixed, 32), 32), mixed);
    }

    #[test]
    fn test_decode_wider_than_word() {
        let word = pack_kmer(b"TT");
        assert_eq!(decode_kmer(word, 34), format!("{}TT", "A".repeat(32)));
    }

    #[test]
    fn test_pack_rc_unknown_is_zero() {
        // N complements to code 0 rather than T
        assert_eq!(pack_kmer_rc(b"NA"), 0b11_00);
        assert_eq!(pack_kmer(b"NA"), 0);
    }
}
