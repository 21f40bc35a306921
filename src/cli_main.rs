use clap::{Args, Parser, Subcommand, ValueEnum};

use kmerkey::pipeline::keys::EncodeOptions;
use kmerkey::{HashMaskFilter, DEFAULT_K};

#[derive(Parser, Debug)]
#[command(name = "kmerkey", version, about = "Canonical 2-bit k-mer keys for genome indexing", long_about = None)]
pub struct Cli {
    /// Number of threads
    #[arg(long, global = true, default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Log per-record progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the canonical key of every window as TSV
    Encode {
        /// Input FASTA(.gz) file
        #[arg(short, long)]
        input: String,

        /// Output TSV(.gz) file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        encoding: EncodingArgs,
    },

    /// Summarize the keys of a FASTA file
    Stats {
        /// Input FASTA(.gz) file
        #[arg(short, long)]
        input: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,

        #[command(flatten)]
        encoding: EncodingArgs,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tsv,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct EncodingArgs {
    /// K-mer length (1..=31)
    #[arg(short = 'k', long = "kmer-size", default_value_t = DEFAULT_K)]
    pub k: usize,

    /// Skip windows containing non-ACGT bases instead of reading them as A
    #[arg(long)]
    pub split_n: bool,

    /// Keep only keys where key & mask == value
    #[arg(long)]
    pub hash_mask: Option<u64>,

    /// Value compared against the masked key
    #[arg(long, default_value_t = 1, requires = "hash_mask")]
    pub hash_value: u64,
}

impl EncodingArgs {
    pub fn to_options(&self) -> kmerkey::Result<EncodeOptions> {
        let filter = match self.hash_mask {
            Some(mask) => HashMaskFilter::new(mask, self.hash_value)?,
            None => HashMaskFilter::pass_all(),
        };
        let options = EncodeOptions {
            k: self.k,
            split_on_n: self.split_n,
            filter,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let cli = Cli::try_parse_from([
            "kmerkey", "encode", "-i", "in.fa", "-k", "21", "--split-n", "--hash-mask", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Encode { input, output, encoding } => {
                assert_eq!(input, "in.fa");
                assert!(output.is_none());
                let options = encoding.to_options().unwrap();
                assert_eq!(options.k, 21);
                assert!(options.split_on_n);
                assert_eq!(options.filter, HashMaskFilter::default());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_defaults_and_invalid_k() {
        let cli = Cli::try_parse_from(["kmerkey", "stats", "-i", "in.fa"]).unwrap();
        match cli.command {
            Commands::Stats { format, encoding, .. } => {
                assert_eq!(format, OutputFormat::Tsv);
                assert_eq!(encoding.to_options().unwrap(), EncodeOptions::default());
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["kmerkey", "stats", "-i", "in.fa", "-k", "32"]).unwrap();
        if let Commands::Stats { encoding, .. } = cli.command {
            assert!(encoding.to_options().is_err());
        }
    }

    #[test]
    fn test_format_checked_at_parse_time() {
        let cli = Cli::try_parse_from(["kmerkey", "stats", "-i", "in.fa", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Stats { format, .. } => assert_eq!(format, OutputFormat::Json),
            other => panic!("unexpected command {:?}", other),
        }

        let err = Cli::try_parse_from(["kmerkey", "stats", "-i", "in.fa", "--format", "xml"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
