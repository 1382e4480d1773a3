//! Shared helpers for the integration tests: building an index from a
//! plain ASCII string and running MAW/MRW detection to a temp file, then
//! parsing the `a,V,b` / `a,b` record format back out.

use maw_index::alphabet::DnaCode;
use maw_index::detector::{Mode, WordDetector};
use maw_index::enumerator::{enumerate_sequential, EnumParams, TraversalMaximality, TraversalOrder};
use maw_index::{BwtIndex, Detector};

pub fn build_index(text: &str) -> BwtIndex {
    let codes: Vec<DnaCode> = text.bytes().map(|b| DnaCode::from_ascii(b).unwrap()).collect();
    BwtIndex::build(&codes).unwrap()
}

pub fn parse_word_lines(contents: &str) -> Vec<(String, String, String)> {
    let mut out = Vec::new();
    let mut last_v = String::new();
    for line in contents.lines() {
        let parts: Vec<&str> = line.split(',').collect();
        match parts.len() {
            3 => {
                last_v = parts[1].to_string();
                out.push((parts[0].to_string(), last_v.clone(), parts[2].to_string()));
            }
            2 => {
                out.push((parts[0].to_string(), last_v.clone(), parts[1].to_string()));
            }
            _ => {}
        }
    }
    out
}

pub fn default_params_for(min_len: u64, mode: Mode) -> EnumParams {
    EnumParams {
        min_length: min_len.saturating_sub(2),
        max_length: u64::MAX,
        min_frequency: match mode {
            Mode::Maw => 0,
            Mode::Mrw { high_freq, .. } => high_freq,
        },
        max_frequency: u64::MAX,
        traversal_order: TraversalOrder::PushOrder,
        traversal_maximality: TraversalMaximality::Policy0,
    }
}

pub fn run_words_on_index(
    idx: &BwtIndex,
    min_len: u64,
    mode: Mode,
) -> (Vec<(String, String, String)>, WordDetector) {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    let mut detector = WordDetector::new(idx.text_length(), min_len, mode).with_output(tmp.path(), false).unwrap();

    let params = default_params_for(min_len, mode);
    enumerate_sequential(idx, &params, &mut detector);
    detector.finalize();

    let contents = std::fs::read_to_string(tmp.path()).unwrap();
    (parse_word_lines(&contents), detector)
}

pub fn run_words(text: &str, min_len: u64, mode: Mode) -> (Vec<(String, String, String)>, u64) {
    let idx = build_index(text);
    let (words, detector) = run_words_on_index(&idx, min_len, mode);
    (words, detector.stats.n_reported)
}

pub fn run_maws(text: &str) -> Vec<(String, String, String)> {
    run_words(text, 0, Mode::Maw).0
}
