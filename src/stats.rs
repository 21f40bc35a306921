use std::error::Error;
use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::io::fasta::{open_fasta, read_fasta_records, FastaRecord};
use crate::pipeline::keys::{count_distinct, EncodeOptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KmerStats {
    pub k: usize,
    pub records: usize,
    pub total_bases: usize,
    /// Windows scanned, before any key filter
    pub windows: usize,
    pub emitted_keys: usize,
    pub distinct_keys: usize,
    /// Records shorter than k
    pub short_records: usize,
    pub elapsed_secs: f64,
}

/// Summarize a set of in-memory records.
pub fn collect_stats(records: &[FastaRecord], options: &EncodeOptions) -> crate::Result<KmerStats> {
    let start = Instant::now();
    let counts = count_distinct(records, options)?;

    Ok(KmerStats {
        k: options.k,
        records: records.len(),
        total_bases: records.iter().map(|r| r.sequence.len()).sum(),
        windows: counts.windows,
        emitted_keys: counts.emitted,
        distinct_keys: counts.counts.len(),
        short_records: records.iter().filter(|r| r.sequence.len() < options.k).count(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

/// Read a FASTA(.gz) file and summarize its keys.
pub fn calculate_stats(path: &str, options: &EncodeOptions) -> Result<KmerStats, Box<dyn Error>> {
    let records = read_fasta_records(open_fasta(path)?)?;
    Ok(collect_stats(&records, options)?)
}

impl fmt::Display for KmerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "k\t{}", self.k)?;
        writeln!(f, "records\t{}", self.records)?;
        writeln!(f, "short_records\t{}", self.short_records)?;
        writeln!(f, "total_bases\t{}", self.total_bases)?;
        writeln!(f, "windows\t{}", self.windows)?;
        writeln!(f, "emitted_keys\t{}", self.emitted_keys)?;
        writeln!(f, "distinct_keys\t{}", self.distinct_keys)?;
        write!(f, "elapsed_secs\t{:.3}", self.elapsed_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_calculate_stats() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">contig_1").unwrap();
        writeln!(file, "{}", "A".repeat(40)).unwrap(); // 10 windows, 1 distinct
        writeln!(file, ">contig_2").unwrap();
        writeln!(file, "{}", "T".repeat(31)).unwrap(); // same canonical key as poly-A
        writeln!(file, ">contig_3").unwrap();
        writeln!(file, "ACGT").unwrap();

        let stats = calculate_stats(file.path().to_str().unwrap(), &EncodeOptions::default()).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.total_bases, 75);
        assert_eq!(stats.windows, 11);
        assert_eq!(stats.emitted_keys, 11);
        assert_eq!(stats.distinct_keys, 1);
        assert_eq!(stats.short_records, 1);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = collect_stats(&[], &EncodeOptions::default()).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["k"], 31);
        assert_eq!(json["distinct_keys"], 0);
        assert!(stats.to_string().starts_with("k\t31\n"));
    }

    #[test]
    fn test_missing_file() {
        assert!(calculate_stats("/nonexistent/input.fa", &EncodeOptions::default()).is_err());
    }
}
