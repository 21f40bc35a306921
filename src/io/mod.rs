//! Input and output for the driver: FASTA records in, key tables out.

pub mod fasta;
pub mod keys;
