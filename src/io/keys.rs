// src/io/keys.rs
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Tab-separated `record, position, key` writer.
pub enum KeyWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
    Stdout(BufWriter<Stdout>),
}

impl KeyWriter {
    /// Write to `path`, gzip-compressed when it ends in `.gz`.
    pub fn create(path: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        if path.ends_with(".gz") {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(KeyWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(KeyWriter::Plain(BufWriter::new(file)))
        }
    }

    pub fn stdout() -> Self {
        KeyWriter::Stdout(BufWriter::new(io::stdout()))
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            KeyWriter::Plain(writer) => writer,
            KeyWriter::Compressed(writer) => writer,
            KeyWriter::Stdout(writer) => writer,
        }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.writer(), "record\tposition\tkey")
    }

    pub fn write_key(&mut self, record: &str, position: usize, key: u64) -> io::Result<()> {
        writeln!(self.writer(), "{}\t{}\t{}", record, position, key)
    }

    /// Flush buffered output and finish the gzip stream if there is one.
    pub fn finish(self) -> io::Result<()> {
        match self {
            KeyWriter::Plain(mut writer) => writer.flush(),
            KeyWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
                Ok(())
            }
            KeyWriter::Stdout(mut writer) => writer.flush(),
        }
    }
}
