mod cli_main;

use std::error::Error;
use std::time::Instant;

use clap::Parser;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use cli_main::{Cli, Commands, OutputFormat};
use kmerkey::io::fasta::{open_fasta, stream_fasta_records};
use kmerkey::io::keys::KeyWriter;
use kmerkey::pipeline::keys::write_keys;
use kmerkey::stats::calculate_stats;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    if let Err(e) = ThreadPoolBuilder::new().num_threads(cli.threads).build_global() {
        warn!("Could not configure thread pool: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Encode { input, output, encoding } => {
            let options = encoding.to_options()?;
            let start = Instant::now();
            info!("Encoding k-mers from {}", input);

            let records = stream_fasta_records(open_fasta(&input)?);
            let mut writer = match &output {
                Some(path) => KeyWriter::create(path)?,
                None => KeyWriter::stdout(),
            };
            writer.write_header()?;
            let summary = write_keys(records, &options, &mut writer)?;
            writer.finish()?;

            info!(
                "Wrote {} keys ({} windows) from {} records in {:.2}s",
                summary.written,
                summary.windows,
                summary.records,
                start.elapsed().as_secs_f32()
            );
        }

        Commands::Stats { input, format, encoding } => {
            let options = encoding.to_options()?;
            info!("Calculating k-mer statistics for: {}", input);
            let stats = calculate_stats(&input, &options)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Tsv => println!("{}", stats),
            }
        }
    }
    Ok(())
}
