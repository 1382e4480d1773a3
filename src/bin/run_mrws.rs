//! CLI: detect minimal rare words (MRWs) of a serialized BWT index.
//!
//! Mirrors `run_MRWs_single.c`'s argument list and CSV status line.

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use maw_index::detector::{DetectionStats, Mode, WordDetector};
use maw_index::enumerator::{enumerate_sequential, EnumParams, TraversalMaximality, TraversalOrder};
use maw_index::score::ScoreId;
use maw_index::BwtIndex;

/// Detects minimal rare words of a text from its serialized BWT index.
#[derive(Parser, Debug)]
#[command(name = "run_mrws")]
struct Args {
    /// Path to the serialized index.
    index_path: std::path::PathBuf,

    /// Number of worker threads (1 runs the sequential enumerator).
    #[arg(long, default_value_t = 1)]
    n_threads: usize,

    /// Minimum length of a reported MRW (full `aVb` length).
    #[arg(long, default_value_t = 2)]
    min_len: u64,

    /// Maximum length of a reported MRW.
    #[arg(long, default_value_t = u64::MAX)]
    max_len: u64,

    /// Low end of the rare-frequency band (inclusive).
    #[arg(long, default_value_t = 1)]
    lo_freq: u64,

    /// High end of the rare-frequency band (exclusive); also the minimum
    /// frequency required of `aV` and `Vb`.
    #[arg(long, default_value_t = 2)]
    hi_freq: u64,

    /// Minimum length bucketed in the histogram (0 disables it).
    #[arg(long, default_value_t = 0)]
    hist_min: u64,

    /// Maximum length bucketed in the histogram.
    #[arg(long, default_value_t = 0)]
    hist_max: u64,

    /// Compute a per-MRW score.
    #[arg(long, default_value_t = false)]
    compute_scores: bool,

    /// ID of the score to compute (`0` = log-probability).
    #[arg(long, default_value_t = 0)]
    score_id: u8,

    /// Minimum score for a MRW to be selected.
    #[arg(long, default_value_t = f64::NEG_INFINITY)]
    score_threshold: f64,

    /// Write MRWs to a file.
    #[arg(long, default_value_t = false)]
    write_output: bool,

    /// Output path, required when `--write-output` is set.
    #[arg(long)]
    output_path: Option<std::path::PathBuf>,

    /// Compress the run-form output (ignored when scores are computed).
    #[arg(long, default_value_t = false)]
    compress_output: bool,
}

fn print_length_histogram(stats: &maw_index::detector::LengthHistogram) {
    for (i, count) in stats.counts.iter().enumerate() {
        let length = stats.min + i as u64;
        println!("{length},{count}");
    }
}

fn print_status_line(
    text_length: u64,
    min_len: u64,
    max_len: u64,
    lo_freq: u64,
    hi_freq: u64,
    loading_time: f64,
    processing_time: f64,
    stats: &DetectionStats,
) {
    let ratio = if stats.n_maxreps > 0 {
        stats.n_maxreps_with_hit as f64 / stats.n_maxreps as f64
    } else {
        0.0
    };
    println!(
        "{},{},{},{},{}|{:.6},{:.6}|0|{},{},{},{:.6}",
        text_length,
        min_len,
        max_len,
        lo_freq,
        hi_freq,
        loading_time,
        processing_time,
        stats.n_reported,
        stats.min_observed_length.unwrap_or(0),
        stats.max_observed_length,
        ratio,
    );
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if args.write_output && args.output_path.is_none() {
        eprintln!("ERROR: --write-output requires --output-path");
        return ExitCode::FAILURE;
    }

    let t0 = Instant::now();
    let file = match File::open(&args.index_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ERROR while reading the index: {e}");
            return ExitCode::FAILURE;
        }
    };
    let index = match BwtIndex::deserialize(&mut BufReader::new(file)) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("ERROR while reading the index: {e}");
            return ExitCode::FAILURE;
        }
    };
    let loading_time = t0.elapsed().as_secs_f64();

    let mode = Mode::Mrw { low_freq: args.lo_freq, high_freq: args.hi_freq };
    let mut detector = WordDetector::new(index.text_length(), args.min_len, mode);
    if args.write_output {
        detector = match detector.with_output(args.output_path.as_ref().unwrap(), args.compress_output && !args.compute_scores) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("ERROR opening output file: {e}");
                return ExitCode::FAILURE;
            }
        };
    }
    if args.hist_min > 0 {
        detector = detector.with_length_histogram(args.hist_min, args.hist_max);
    }
    if args.compute_scores {
        let Some(score_id) = ScoreId::from_id(args.score_id) else {
            eprintln!("ERROR: unknown score id {}", args.score_id);
            return ExitCode::FAILURE;
        };
        let hook = score_id.build(*index.log_dna_probabilities(), args.score_threshold);
        detector = detector.with_score_hook(hook);
    }

    let node_min_len = if args.min_len >= 2 { args.min_len - 2 } else { args.min_len };
    let node_max_len = args.max_len.saturating_sub(2);
    let params = EnumParams {
        min_length: node_min_len,
        max_length: node_max_len,
        min_frequency: args.hi_freq,
        max_frequency: u64::MAX,
        traversal_order: TraversalOrder::StackTrick,
        traversal_maximality: TraversalMaximality::Policy0,
    };

    let t1 = Instant::now();
    if args.n_threads <= 1 {
        enumerate_sequential(&index, &params, &mut detector);
        detector.finalize();
    } else {
        detector = maw_index::enumerate_parallel(&index, &params, detector, args.n_threads);
    }
    let processing_time = t1.elapsed().as_secs_f64();

    print_status_line(
        index.text_length(),
        args.min_len,
        args.max_len,
        args.lo_freq,
        args.hi_freq,
        loading_time,
        processing_time,
        &detector.stats,
    );
    if let Some(hist) = detector.length_histogram() {
        print_length_histogram(hist);
    }
    ExitCode::SUCCESS
}
