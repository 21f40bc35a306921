//! K-mer encoding: base codes, the rolling canonical encoder, packed-word helpers and key filters.

pub mod encoding;
pub mod filter;
pub mod kmer;
pub mod rolling;
