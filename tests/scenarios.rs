//! Literal end-to-end scenarios S1-S6 (spec section 8) plus testable
//! property 8 (parallel/sequential equivalence).

mod support;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use maw_index::alphabet::DnaCode;
use maw_index::detector::{Mode, WordDetector};
use maw_index::enumerator::{EnumParams, TraversalMaximality, TraversalOrder};
use maw_index::{enumerate_parallel, BwtIndex};

use support::{build_index, default_params_for, run_words_on_index};

fn gen_strings(alphabet: &[char], len: usize) -> Vec<String> {
    if len == 0 {
        return vec![String::new()];
    }
    let mut out = Vec::new();
    for prefix in gen_strings(alphabet, len - 1) {
        for &c in alphabet {
            out.push(format!("{prefix}{c}"));
        }
    }
    out
}

fn occurring_substrings(text: &str, max_len: usize) -> HashSet<String> {
    let n = text.len();
    let mut set = HashSet::new();
    for len in 1..=max_len.min(n) {
        for i in 0..=(n - len) {
            set.insert(text[i..i + len].to_string());
        }
    }
    set
}

/// Brute-force oracle for the MAW definition (testable property 7): a word
/// `w` of length >= 2 is a MAW iff `w` itself does not occur but both of its
/// maximal proper substrings (`w` minus its last character, `w` minus its
/// first character) do. Restricted to the alphabet actually present in
/// `text_upper` since the enumerator never extends towards a letter that
/// never occurs.
fn brute_force_maws(text_upper: &str, max_len: usize) -> HashSet<String> {
    let mut alphabet: Vec<char> = text_upper.chars().collect::<HashSet<_>>().into_iter().collect();
    alphabet.sort_unstable();

    let occurring = occurring_substrings(text_upper, max_len);
    let mut maws = HashSet::new();
    for len in 2..=max_len {
        for w in gen_strings(&alphabet, len) {
            if occurring.contains(&w) {
                continue;
            }
            let prefix = &w[..w.len() - 1];
            let suffix = &w[1..];
            if occurring.contains(prefix) && occurring.contains(suffix) {
                maws.insert(w);
            }
        }
    }
    maws
}

fn emitted_words(words: &[(String, String, String)]) -> HashSet<String> {
    words.iter().map(|(a, v, b)| format!("{a}{v}{b}")).collect()
}

#[test]
fn s1_acgt_c_array_and_maw_set() {
    let idx = build_index("acgt");
    assert_eq!(idx.c_array(), &[0, 1, 2, 3, 4]);

    let (words, n_reported) = support::run_words("acgt", 2, Mode::Maw);
    let expected = brute_force_maws("ACGT", 4);
    assert_eq!(emitted_words(&words), expected);
    assert_eq!(n_reported, expected.len() as u64);
}

#[test]
fn s2_aaaa_c_array_and_no_maws() {
    let idx = build_index("aaaa");
    assert_eq!(idx.c_array(), &[0, 3, 3, 3, 3]);

    let (words, _) = support::run_words("aaaa", 2, Mode::Maw);
    assert!(words.is_empty(), "no length>=2 MAW should be reported for a run of a single letter");

    let (mrw_words, _) = support::run_words("aaaa", 1, Mode::Mrw { low_freq: 1, high_freq: 2 });
    assert!(mrw_words.is_empty(), "[1,2) MRW band should be empty for aaaa");
}

#[test]
fn s3_acacaca_maw_set() {
    let (words, n_reported) = support::run_words("acacaca", 2, Mode::Maw);
    let expected = brute_force_maws("ACACACA", 7);
    assert_eq!(emitted_words(&words), expected);
    assert_eq!(n_reported, expected.len() as u64);

    for w in ["AA", "CC", "AG", "GA", "AT", "TA", "CG", "GC", "CT", "TC", "GG", "GT", "TG", "TT"] {
        assert!(expected.contains(w), "{w} should be a MAW of acacaca");
    }
}

#[test]
fn s4_round_trip_preserves_maw_multiset() {
    let idx = build_index("acgtacgtn");
    let mut buf = Vec::new();
    idx.serialize(&mut buf).unwrap();
    let restored = BwtIndex::deserialize(&mut std::io::Cursor::new(buf)).unwrap();

    let (original_words, _) = run_words_on_index(&idx, 2, Mode::Maw);
    let (restored_words, _) = run_words_on_index(&restored, 2, Mode::Maw);

    let mut original_sorted = emitted_words(&original_words).into_iter().collect::<Vec<_>>();
    let mut restored_sorted = emitted_words(&restored_words).into_iter().collect::<Vec<_>>();
    original_sorted.sort();
    restored_sorted.sort();
    assert_eq!(original_sorted, restored_sorted);
}

#[test]
fn s5_parallel_matches_sequential_on_a_long_text() {
    let mut rng = StdRng::seed_from_u64(5);
    let bases = [DnaCode::A, DnaCode::C, DnaCode::G, DnaCode::T];
    let text: Vec<DnaCode> = (0..2 * 384).map(|_| bases[rng.gen_range(0..4)]).collect();
    let idx = BwtIndex::build(&text).unwrap();

    let params = EnumParams {
        min_length: 0,
        max_length: u64::MAX,
        min_frequency: 0,
        max_frequency: u64::MAX,
        traversal_order: TraversalOrder::PushOrder,
        traversal_maximality: TraversalMaximality::Policy0,
    };

    let mut sequential = WordDetector::new(idx.text_length(), 2, Mode::Maw).with_length_histogram(0, 20);
    maw_index::enumerate_sequential(&idx, &params, &mut sequential);
    sequential.finalize();

    let seed = WordDetector::new(idx.text_length(), 2, Mode::Maw).with_length_histogram(0, 20);
    let parallel = enumerate_parallel(&idx, &params, seed, 4);

    assert_eq!(sequential.stats.n_reported, parallel.stats.n_reported);
    assert_eq!(sequential.stats.min_observed_length, parallel.stats.min_observed_length);
    assert_eq!(sequential.stats.max_observed_length, parallel.stats.max_observed_length);
    assert_eq!(sequential.stats.n_maxreps, parallel.stats.n_maxreps);
    assert_eq!(sequential.stats.n_maxreps_with_hit, parallel.stats.n_maxreps_with_hit);
    assert_eq!(
        sequential.length_histogram().unwrap().counts,
        parallel.length_histogram().unwrap().counts
    );
}

#[test]
fn s6_compressed_run_collapses_a_maximal_repeat_without_changing_counts() {
    // T="acgggggc": the run of 5 g's gives rise to several right-maximal
    // G^k infixes sharing the same pair of flanking bases, which
    // compress_output collapses into one comma-separated record per
    // (a, infix-base, c) slot instead of one line per k. Compression only
    // changes how a record is written, not whether it's counted.
    let idx = build_index("acgggggc");

    let tmp_plain = tempfile::NamedTempFile::new().unwrap();
    let mut plain = WordDetector::new(idx.text_length(), 4, Mode::Maw).with_output(tmp_plain.path(), false).unwrap();
    let params = default_params_for(4, Mode::Maw);
    maw_index::enumerate_sequential(&idx, &params, &mut plain);
    plain.finalize();
    let n_plain = plain.stats.n_reported;
    drop(plain);

    let tmp_compressed = tempfile::NamedTempFile::new().unwrap();
    let mut compressed =
        WordDetector::new(idx.text_length(), 4, Mode::Maw).with_output(tmp_compressed.path(), true).unwrap();
    maw_index::enumerate_sequential(&idx, &params, &mut compressed);
    compressed.finalize();
    let n_compressed = compressed.stats.n_reported;
    drop(compressed);

    assert_eq!(n_plain, n_compressed, "compression must not change the reported count");
    assert!(n_plain > 0, "acgggggc at minLength 4 should report at least one MAW");

    let contents = std::fs::read_to_string(tmp_compressed.path()).unwrap();
    let has_collapsed_run = contents.lines().any(|line| {
        let Some((record, _bits)) = line.split_once(',') else { return false };
        let bytes = record.as_bytes();
        bytes.len() >= 3 && bytes.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
    });
    assert!(has_collapsed_run, "expected a run-length-collapsed record in:\n{contents}");
}
