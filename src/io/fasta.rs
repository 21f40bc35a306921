// src/io/fasta.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::Peekable;

use flate2::read::MultiGzDecoder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header text after `>` up to the first whitespace
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Open a FASTA file for reading, handles gzipped files automatically
pub fn open_fasta(path: &str) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.ends_with(".gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Stream FASTA records one at a time.
///
/// Sequence lines are concatenated with surrounding whitespace trimmed; bytes
/// are otherwise passed through untouched, so soft-masked (lowercase) bases
/// reach the encoder as-is.
pub fn stream_fasta_records<R: BufRead>(reader: R) -> FastaStreamParser<io::Lines<R>> {
    FastaStreamParser {
        lines: reader.lines().peekable(),
    }
}

/// Read every record into memory.
pub fn read_fasta_records<R: BufRead>(reader: R) -> io::Result<Vec<FastaRecord>> {
    stream_fasta_records(reader).collect()
}

/// Iterator adaptor for streaming FASTA parsing
pub struct FastaStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    lines: Peekable<I>,
}

impl<I> Iterator for FastaStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        // find the next header, skipping blank lines
        let header = loop {
            match self.lines.next()? {
                Err(e) => return Some(Err(e)),
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match line.strip_prefix('>') {
                        Some(rest) => break rest.to_string(),
                        None => {
                            return Some(Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!("expected FASTA header, found {:?}", line),
                            )))
                        }
                    }
                }
            }
        };

        let name = header
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        if name.is_empty() {
            tracing::warn!("FASTA record with an empty header");
        }

        let mut sequence = Vec::new();
        while let Some(Ok(line)) = self.lines.peek() {
            if line.trim_start().starts_with('>') {
                break;
            }
            sequence.extend_from_slice(line.trim().as_bytes());
            self.lines.next();
        }
        // surface a read error on the following call
        if let Some(Err(_)) = self.lines.peek() {
            if let Some(Err(e)) = self.lines.next() {
                return Some(Err(e));
            }
        }

        Some(Ok(FastaRecord { name, sequence }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_multi_line_records() {
        let data = ">chr1 first contig\nACGT\nTTGG\n\n>chr2\nNNAC\n";
        let records = read_fasta_records(Cursor::new(data)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "chr1");
        assert_eq!(records[0].sequence, b"ACGTTTGG");
        assert_eq!(records[1].name, "chr2");
        assert_eq!(records[1].sequence, b"NNAC");
    }

    #[test]
    fn test_empty_input() {
        let records = read_fasta_records(Cursor::new("")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_sequence_and_crlf() {
        let data = ">a\r\n>b\r\nAC\r\nGT\r\n";
        let records = read_fasta_records(Cursor::new(data)).unwrap();
        assert_eq!(records[0].sequence, b"");
        assert_eq!(records[1].sequence, b"ACGT");
    }

    #[test]
    fn test_indented_header_starts_new_record() {
        let data = ">a\nACGT\n >b\nGG\n\t>c desc\nTT\n";
        let records = read_fasta_records(Cursor::new(data)).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sequence, b"ACGT");
        assert_eq!(records[1].name, "b");
        assert_eq!(records[1].sequence, b"GG");
        assert_eq!(records[2].name, "c");
        assert_eq!(records[2].sequence, b"TT");
    }

    #[test]
    fn test_missing_header_is_error() {
        let err = read_fasta_records(Cursor::new("ACGT\n")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
