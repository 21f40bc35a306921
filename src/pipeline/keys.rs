// src/pipeline/keys.rs
//! Key extraction over many records.
//!
//! Every record gets its own encoder, so records are processed independently
//! with rayon and no shared state beyond the final merge. [`write_keys`] is
//! the sequential streaming path used for file output.

use ahash::AHashMap;
use rayon::prelude::*;
use tracing::{debug, info};

use std::error::Error;
use std::io;

use crate::error::{KmerError, Result};
use crate::io::fasta::FastaRecord;
use crate::io::keys::KeyWriter;
use crate::kmer::encoding::DEFAULT_K;
use crate::kmer::filter::{acgt_runs, HashMaskFilter};
use crate::kmer::rolling::{encode_with_k, RollingKmer};

/// How records are turned into keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub k: usize,
    /// Encode each A/C/G/T run separately instead of reading ambiguous bases as A
    pub split_on_n: bool,
    pub filter: HashMaskFilter,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            split_on_n: false,
            filter: HashMaskFilter::pass_all(),
        }
    }
}

impl EncodeOptions {
    pub fn validate(&self) -> Result<()> {
        RollingKmer::new(self.k).map(|_| ())
    }
}

/// Keys of a single record with their window start positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    pub name: String,
    /// Windows scanned, before filtering
    pub windows: usize,
    pub keys: Vec<(usize, u64)>,
}

/// Feed every kept `(position, key)` of `sequence` to a fallible `sink`; returns the number of windows scanned.
///
/// Stops at the first error the sink returns.
pub fn try_for_each_key<F, E>(
    sequence: &[u8],
    options: &EncodeOptions,
    mut sink: F,
) -> std::result::Result<usize, E>
where
    F: FnMut(usize, u64) -> std::result::Result<(), E>,
    E: From<KmerError>,
{
    let mut windows = 0;
    let mut scan = |offset: usize, seq: &[u8]| -> std::result::Result<(), E> {
        for (pos, key) in encode_with_k(seq, options.k)?.with_positions() {
            windows += 1;
            if options.filter.keeps(key) {
                sink(offset + pos, key)?;
            }
        }
        Ok(())
    };

    if options.split_on_n {
        for (start, run) in acgt_runs(sequence, options.k) {
            scan(start, run)?;
        }
    } else {
        scan(0, sequence)?;
    }
    Ok(windows)
}

/// Feed every kept `(position, key)` of `sequence` to `sink`; returns the number of windows scanned.
pub fn for_each_key<F>(sequence: &[u8], options: &EncodeOptions, mut sink: F) -> Result<usize>
where
    F: FnMut(usize, u64),
{
    try_for_each_key(sequence, options, |pos, key| -> Result<()> {
        sink(pos, key);
        Ok(())
    })
}

/// Collect the kept keys of one sequence.
pub fn record_keys(sequence: &[u8], options: &EncodeOptions) -> Result<Vec<(usize, u64)>> {
    let mut keys = Vec::new();
    for_each_key(sequence, options, |pos, key| keys.push((pos, key)))?;
    Ok(keys)
}

/// Encode records in parallel, preserving input order.
pub fn encode_records(records: &[FastaRecord], options: &EncodeOptions) -> Result<Vec<RecordKeys>> {
    options.validate()?;
    info!(
        "Encoding {} records with k={} (split on N: {})",
        records.len(),
        options.k,
        options.split_on_n
    );

    records
        .par_iter()
        .map(|record| -> Result<RecordKeys> {
            let mut keys = Vec::with_capacity(record.sequence.len().saturating_sub(options.k - 1));
            let windows = for_each_key(&record.sequence, options, |pos, key| keys.push((pos, key)))?;
            debug!("{}: {} windows, {} keys kept", record.name, windows, keys.len());
            Ok(RecordKeys {
                name: record.name.clone(),
                windows,
                keys,
            })
        })
        .collect()
}

/// Totals of a streaming [`write_keys`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub records: usize,
    pub windows: usize,
    pub written: usize,
}

/// Encode records as they arrive and write each kept key straight to `writer`.
///
/// Only the record being encoded is held in memory; no keys are buffered.
pub fn write_keys<I>(
    records: I,
    options: &EncodeOptions,
    writer: &mut KeyWriter,
) -> std::result::Result<WriteSummary, Box<dyn Error>>
where
    I: IntoIterator<Item = io::Result<FastaRecord>>,
{
    options.validate()?;
    let mut summary = WriteSummary::default();

    for record in records {
        let record = record?;
        let mut written = 0;
        let windows = try_for_each_key(
            &record.sequence,
            options,
            |pos, key| -> std::result::Result<(), Box<dyn Error>> {
                writer.write_key(&record.name, pos, key)?;
                written += 1;
                Ok(())
            },
        )?;
        debug!("{}: {} windows, {} keys written", record.name, windows, written);

        summary.records += 1;
        summary.windows += windows;
        summary.written += written;
    }
    Ok(summary)
}

/// Distinct-key occurrence counts over a set of records.
#[derive(Debug, Default)]
pub struct KeyCounts {
    pub counts: AHashMap<u64, u32>,
    pub windows: usize,
    pub emitted: usize,
}

impl KeyCounts {
    /// Count the kept keys of one more sequence.
    pub fn add_sequence(&mut self, sequence: &[u8], options: &EncodeOptions) -> Result<()> {
        let counts = &mut self.counts;
        let mut emitted = 0;
        let windows = for_each_key(sequence, options, |_, key| {
            emitted += 1;
            let entry = counts.entry(key).or_insert(0);
            *entry = entry.saturating_add(1);
        })?;
        self.windows += windows;
        self.emitted += emitted;
        Ok(())
    }

    fn merge(mut self, other: KeyCounts) -> KeyCounts {
        let (mut big, small) = if self.counts.len() >= other.counts.len() {
            (std::mem::take(&mut self.counts), other.counts)
        } else {
            (other.counts, std::mem::take(&mut self.counts))
        };
        for (key, count) in small {
            let entry = big.entry(key).or_insert(0);
            *entry = entry.saturating_add(count);
        }
        KeyCounts {
            counts: big,
            windows: self.windows + other.windows,
            emitted: self.emitted + other.emitted,
        }
    }
}

/// Count every kept key across `records` with thread-local maps merged at the end.
pub fn count_distinct(records: &[FastaRecord], options: &EncodeOptions) -> Result<KeyCounts> {
    options.validate()?;

    let merged = records
        .par_iter()
        .try_fold(KeyCounts::default, |mut local, record| -> Result<KeyCounts> {
            local.add_sequence(&record.sequence, options)?;
            Ok(local)
        })
        .try_reduce(KeyCounts::default, |a, b| Ok(a.merge(b)))?;

    info!(
        "Counted {} distinct keys from {} emitted ({} windows)",
        merged.counts.len(),
        merged.emitted,
        merged.windows
    );
    Ok(merged)
}
