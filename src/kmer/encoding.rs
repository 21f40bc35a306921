// src/kmer/encoding.rs
//! 2-bit nucleotide codes and the constants derived from them.
//!
//! Bases are packed as A=0, C=1, G=2, T=3. Anything that is not an uppercase
//! `A`, `C`, `G` or `T` takes code 0, the same as A, on the forward strand and
//! also contributes 0 on the reverse-complement strand. The unknown symbol is
//! treated as its own complement, which keeps canonical keys identical for a
//! sequence and its reverse complement even when the sequence carries `N`s.

/// Default k-mer length. 31 bases fill the low 62 bits of a `u64`.
pub const DEFAULT_K: usize = 31;

/// Largest supported k. Keeps the top two bits of every packed word clear.
pub const MAX_K: usize = 31;

/// Bits used per base.
pub const BITS_PER_BASE: u32 = 2;

pub const CODE_A: u64 = 0;
pub const CODE_C: u64 = 1;
pub const CODE_G: u64 = 2;
pub const CODE_T: u64 = 3;

/// Forward-strand window mask for k = 31.
pub const KMER31_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Shift that places a complement code in the top slot of a 31-mer window.
pub const KMER31_RC_SHIFT: u32 = 60;

/// Lookup table for base -> forward 2-bit code.
const BASE_CODE: [u8; 256] = {
    let mut table = [CODE_A as u8; 256];
    table[b'C' as usize] = CODE_C as u8;
    table[b'G' as usize] = CODE_G as u8;
    table[b'T' as usize] = CODE_T as u8;
    table
};

/// Lookup table for base -> 2-bit code of its complement.
const COMPLEMENT_CODE: [u8; 256] = {
    // unknown symbols complement to themselves (code 0)
    let mut table = [CODE_A as u8; 256];
    table[b'A' as usize] = CODE_T as u8;
    table[b'C' as usize] = CODE_G as u8;
    table[b'G' as usize] = CODE_C as u8;
    table[b'T' as usize] = CODE_A as u8;
    table
};

/// Forward-strand 2-bit code of a base.
#[inline(always)]
pub fn base_code(base: u8) -> u64 {
    BASE_CODE[base as usize] as u64
}

/// 2-bit code contributed to the reverse-complement strand by a base.
#[inline(always)]
pub fn complement_code(base: u8) -> u64 {
    COMPLEMENT_CODE[base as usize] as u64
}

/// True for the four bases with a real 2-bit code.
#[inline(always)]
pub fn is_acgt(base: u8) -> bool {
    matches!(base, b'A' | b'C' | b'G' | b'T')
}

/// Inverse of [`base_code`] for codes 0..=3.
#[inline]
pub fn code_to_base(code: u64) -> u8 {
    match code & 0b11 {
        0 => b'A',
        1 => b'C',
        2 => b'G',
        _ => b'T',
    }
}

/// Mask keeping the low `2k` bits of a packed word. Saturates at all ones for `k >= 32`.
#[inline]
pub const fn window_mask(k: usize) -> u64 {
    let bits = BITS_PER_BASE as usize * k;
    if bits >= u64::BITS as usize {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Bit offset of the most significant base slot in a `k`-base window.
#[inline]
pub const fn rc_shift(k: usize) -> u32 {
    BITS_PER_BASE * (k as u32 - 1)
}
