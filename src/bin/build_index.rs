//! CLI: load a DNA/RNA text and build + serialize a [`maw_index::BwtIndex`].
//!
//! Mirrors `buildIndex.c`'s argument list and CSV status line.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use maw_index::alphabet::reverse_complement;
use maw_index::io::fasta::load_sequence;
use maw_index::BwtIndex;

/// Builds a serialized BWT index from a plain-text or FASTA DNA/RNA file.
#[derive(Parser, Debug)]
#[command(name = "build_index")]
struct Args {
    /// Path to the input file.
    input_path: std::path::PathBuf,

    /// The input file is FASTA (otherwise it is read as plain text).
    #[arg(long, default_value_t = false)]
    is_fasta: bool,

    /// Append the reverse complement of the loaded text before indexing.
    #[arg(long, default_value_t = false)]
    append_rc: bool,

    /// Path to write the serialized index to (overwritten if it exists).
    output_path: std::path::PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let t0 = Instant::now();
    let mut sequence = match load_sequence(&args.input_path, args.is_fasta) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR loading input: {e}");
            return ExitCode::FAILURE;
        }
    };
    let input_length = sequence.len() as u64;
    if args.append_rc {
        let rc = reverse_complement(&sequence);
        sequence.extend(rc);
    }
    let loading_time = t0.elapsed().as_secs_f64();

    let t1 = Instant::now();
    let index = match BwtIndex::build(&sequence) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("ERROR building index: {e}");
            return ExitCode::FAILURE;
        }
    };
    let indexing_time = t1.elapsed().as_secs_f64();

    let t2 = Instant::now();
    let file = match File::create(&args.output_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ERROR opening output file: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut writer = BufWriter::new(file);
    let n_bytes = match index.serialize(&mut writer) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("ERROR serializing index: {e}");
            return ExitCode::FAILURE;
        }
    };
    let serialization_time = t2.elapsed().as_secs_f64();

    println!(
        "{},{},{}|{:.6},{:.6},{:.6}|{}",
        input_length,
        sequence.len(),
        args.append_rc as u8,
        loading_time,
        indexing_time,
        serialization_time,
        n_bytes,
    );
    ExitCode::SUCCESS
}
