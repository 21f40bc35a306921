//! Canonical 64-bit keys for the k-mers of nucleotide sequences.
//!
//! [`encode`] turns a sequence into a lazy stream of canonical 31-mer keys,
//! each the unsigned minimum of the window's forward and reverse-complement
//! 2-bit packed words. The rest of the crate reads FASTA input, runs the
//! encoder over many records in parallel and summarizes the result.

pub mod error;
pub mod io;
pub mod kmer;
pub mod pipeline;
pub mod stats;

pub use error::{KmerError, Result};
pub use kmer::encoding::DEFAULT_K;
pub use kmer::filter::{acgt_runs, HashMaskFilter};
pub use kmer::rolling::{encode, encode_with_k, CanonicalKmers, PositionedKmers, RollingKmer};
