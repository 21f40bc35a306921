//! Pipelines that run the encoder over whole inputs.

pub mod keys;
