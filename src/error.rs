//! Parameter errors for the k-mer encoder and its filters.
//!
//! Encoding itself never fails; only configuration can be rejected.

use crate::kmer::encoding::MAX_K;

/// Common `Result` type for library operations.
pub type Result<T, E = KmerError> = core::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KmerError {
    /// k must leave the two top bits of a `u64` free.
    #[error("k-mer length {k} is not supported (must be between 1 and {max})", max = MAX_K)]
    InvalidK { k: usize },

    /// The filter value has bits outside the mask, so no key could ever match.
    #[error("hash filter value {value:#x} has bits outside mask {mask:#x}")]
    InvalidHashFilter { mask: u64, value: u64 },
}
