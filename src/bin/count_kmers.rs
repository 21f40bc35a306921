use ahash::AHashMap;
use kmerkey::io::fasta::{open_fasta, stream_fasta_records};
use kmerkey::kmer::kmer::decode_kmer;
use kmerkey::pipeline::keys::{EncodeOptions, KeyCounts};
use kmerkey::DEFAULT_K;
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input.fa(.gz)> [k-mer length]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let k = if args.len() > 2 {
        args[2].parse::<usize>().unwrap_or(DEFAULT_K)
    } else {
        DEFAULT_K
    };

    let options = EncodeOptions {
        k,
        ..Default::default()
    };
    if let Err(e) = options.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    println!("Processing {} with k-mer size: {}", input_path, k);
    let start = Instant::now();

    let reader = match open_fasta(input_path) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Unable to open {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // one record in memory at a time
    let mut total_records = 0usize;
    let mut counts = KeyCounts::default();

    for record in stream_fasta_records(reader) {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Error reading {}: {}", input_path, e);
                std::process::exit(1);
            }
        };
        total_records += 1;

        if let Err(e) = counts.add_sequence(&record.sequence, &options) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let elapsed = start.elapsed();

    let mut histogram: AHashMap<u32, usize> = AHashMap::new();
    for &count in counts.counts.values() {
        *histogram.entry(count).or_insert(0) += 1;
    }

    println!("\nStatistics:");
    println!("  Total records processed: {}", total_records);
    println!("  Total k-mers processed: {}", counts.emitted);
    println!("  Distinct canonical k-mers: {}", counts.counts.len());
    println!("  Processing time: {:.2?}", elapsed);

    println!("\nK-mer frequency histogram:");
    let mut hist_entries: Vec<_> = histogram.into_iter().collect();
    hist_entries.sort_by_key(|&(count, _)| count);
    for (count, occurrences) in hist_entries.iter().take(10) {
        println!("  Count {}: {} k-mers", count, occurrences);
    }

    println!("\nTop 5 most frequent k-mers:");
    let mut top_kmers: Vec<_> = counts.counts.into_iter().collect();
    top_kmers.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (key, count) in top_kmers.iter().take(5) {
        println!("  {} ({}): {} occurrences", decode_kmer(*key, k), key, count);
    }

    println!("\nComplete.");
}
