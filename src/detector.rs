//! MAW/MRW callback detectors: the code run at every right-maximal node
//! the enumerator visits.
//!
//! Mirrors `MAWs_single.c`'s `MAWs_callback`/`MRWs_callback`: for each
//! right-maximal string `V` with at least two left extensions, every pair
//! `(a,b)` of a left extension and a right extension is a MAW/MRW
//! candidate `aVb`; a MAW candidate additionally requires `aVb` itself to
//! be absent (`frequency_leftRight[a][b] == 0`), while an MRW candidate
//! requires its frequency to fall in `[lowFreq, highFreq)` with both `aV`
//! and `Vb` at least `highFreq`.

use std::path::{Path, PathBuf};

use crate::bits::{ceil_div, has_one_bit, read_bit, read_two_bits, write_bit, write_two_bits};
use crate::enumerator::RightMaximalString;
use crate::error::Error;
use crate::io::writer::OutputWriter;
use crate::score::ScoreHook;

const DNA_ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Receives one call per node the enumerator visits during a traversal
/// (sequential, or one of a parallel scheduler's workpackages).
pub trait Detector: Send {
    fn on_node(&mut self, node: &RightMaximalString);

    /// A fresh, independent copy for workpackage `id`, with output
    /// counters reset to zero (mirrors `cloneMAWState`).
    fn clone_for_workpackage(&self, id: u64) -> Self
    where
        Self: Sized;

    /// Folds `other`'s statistics into `self` (mirrors `mergeMAWState`).
    fn merge(&mut self, other: Self)
    where
        Self: Sized;

    /// Flushes any buffered output (mirrors `MAWs_finalize`).
    fn finalize(&mut self);
}

/// Which of the two word families this detector reports.
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    Maw,
    Mrw { low_freq: u64, high_freq: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct LengthHistogram {
    pub min: u64,
    pub max: u64,
    pub counts: Vec<u64>,
}

impl LengthHistogram {
    fn new(min: u64, max: u64) -> Self {
        LengthHistogram { min, max, counts: vec![0; (max - min + 1) as usize] }
    }

    fn increment(&mut self, length: u64) {
        let position = if length >= self.max {
            self.counts.len() - 1
        } else if length <= self.min {
            0
        } else {
            (length - self.min) as usize
        };
        self.counts[position] += 1;
    }

    fn merge_from(&mut self, other: &LengthHistogram) {
        for (a, b) in self.counts.iter_mut().zip(other.counts.iter()) {
            *a += b;
        }
    }
}

/// Running counters produced by a traversal, independent of whether output
/// was written to a file.
#[derive(Debug, Clone, Default)]
pub struct DetectionStats {
    pub n_reported: u64,
    pub min_observed_length: Option<u64>,
    pub max_observed_length: u64,
    pub n_maxreps: u64,
    pub n_maxreps_with_hit: u64,
}

impl DetectionStats {
    fn record(&mut self, reported_length: u64) {
        self.n_reported += 1;
        self.min_observed_length =
            Some(self.min_observed_length.map_or(reported_length, |m| m.min(reported_length)));
        self.max_observed_length = self.max_observed_length.max(reported_length);
    }

    fn merge_from(&mut self, other: &DetectionStats) {
        self.n_reported += other.n_reported;
        self.min_observed_length = match (self.min_observed_length, other.min_observed_length) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
        self.max_observed_length = self.max_observed_length.max(other.max_observed_length);
        self.n_maxreps += other.n_maxreps;
        self.n_maxreps_with_hit += other.n_maxreps_with_hit;
    }
}

type CompressionBuffers = [[[Vec<u64>; 4]; 4]; 4];
type CompressionLengths = [[[u64; 4]; 4]; 4];

/// Detector for minimal absent words and minimal rare words of a single
/// text, generalizing `MAWs_callback_state_t`.
pub struct WordDetector {
    text_length: u64,
    min_length: u64,
    mode: Mode,

    char_stack: Vec<u64>,
    runs_stack: Vec<u64>,
    compress_output: bool,
    compression_buffers: CompressionBuffers,
    compression_buffers_len: CompressionLengths,

    output_path: Option<PathBuf>,
    writer: Option<OutputWriter>,
    score_hook: Option<Box<dyn ScoreHook>>,

    length_histogram: Option<LengthHistogram>,

    left_freqs: [u64; 4],
    right_freqs: [u64; 4],

    pub stats: DetectionStats,
}

impl WordDetector {
    pub fn new(text_length: u64, min_length: u64, mode: Mode) -> Self {
        WordDetector {
            text_length,
            min_length,
            mode,
            char_stack: Vec::new(),
            runs_stack: Vec::new(),
            compress_output: false,
            compression_buffers: Default::default(),
            compression_buffers_len: [[[0u64; 4]; 4]; 4],
            output_path: None,
            writer: None,
            score_hook: None,
            length_histogram: None,
            left_freqs: [0; 4],
            right_freqs: [0; 4],
            stats: DetectionStats::default(),
        }
    }

    pub fn with_output(mut self, path: impl AsRef<Path>, compress_output: bool) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        self.writer = Some(OutputWriter::create(&path)?);
        self.output_path = Some(path);
        self.compress_output = compress_output;
        Ok(self)
    }

    pub fn with_length_histogram(mut self, min: u64, max: u64) -> Self {
        self.length_histogram = Some(LengthHistogram::new(min, max));
        self
    }

    pub fn with_score_hook(mut self, hook: Box<dyn ScoreHook>) -> Self {
        self.score_hook = Some(hook);
        self
    }

    pub fn length_histogram(&self) -> Option<&LengthHistogram> {
        self.length_histogram.as_ref()
    }

    fn char_stack_words(length: u64) -> usize {
        ceil_div(length * 2, 64).max(1) as usize
    }

    fn push_char(&mut self, node: &RightMaximalString) -> Result<(), Error> {
        let length = node.length;
        let needed = Self::char_stack_words(length);
        if self.char_stack.len() < needed {
            self.char_stack.resize(needed, 0);
        }
        let c = node.first_character - 1;
        write_two_bits(&mut self.char_stack, length - 1, c);

        if let Some(hook) = &mut self.score_hook {
            hook.push(c, length);
        } else if self.compress_output {
            let runs_words = ceil_div(length, 64).max(1) as usize;
            if self.runs_stack.len() < runs_words {
                self.runs_stack.resize(runs_words, 0);
            }
            let flag = if length <= 1 {
                1
            } else if read_bit(&self.runs_stack, length - 2) == 0 {
                0
            } else {
                u8::from(c == read_two_bits(&self.char_stack, length - 2))
            };
            write_bit(&mut self.runs_stack, length - 1, flag);
        }
        Ok(())
    }

    fn init_left_right_freqs(&mut self, node: &RightMaximalString) {
        for i in 1..=4usize {
            if node.left_extension_bitmap & (1 << i) == 0 {
                continue;
            }
            self.left_freqs[i - 1] = (0..=5).map(|j| node.freq_left_right[i][j]).sum();
        }
        for j in 1..=4usize {
            if node.right_extension_bitmap & (1 << j) == 0 {
                continue;
            }
            self.right_freqs[j - 1] = (0..=5).map(|i| node.freq_left_right[i][j]).sum();
        }
    }

    fn compress(&mut self, i: usize, j: usize, k: usize, n: u64) {
        let len = &mut self.compression_buffers_len[i][j][k];
        if n > *len {
            *len = n;
            let words = ceil_div(n, 64).max(1) as usize;
            if self.compression_buffers[i][j][k].len() < words {
                self.compression_buffers[i][j][k].resize(words, 0);
            }
        }
        write_bit(&mut self.compression_buffers[i][j][k], n - 1, 1);
    }

    fn emit(&mut self, node: &RightMaximalString, a: u8, b: u8, first_for_node: bool) -> Result<(), Error> {
        let reported_length = node.length + 2;
        self.stats.record(reported_length);
        if let Some(hist) = &mut self.length_histogram {
            hist.increment(reported_length);
        }
        let Some(writer) = &mut self.writer else { return Ok(()) };

        let i = (a - 1) as usize;
        let j = (b - 1) as usize;
        let is_run = self.compress_output
            && node.length >= 1
            && a != node.first_character
            && b != node.first_character
            && read_bit(&self.runs_stack, node.length - 1) != 0;

        if self.compress_output && is_run {
            let k = (node.first_character - 1) as usize;
            self.compress(i, k, j, node.length);
        } else {
            if first_for_node && node.length != 0 {
                writer.write_two_bits_reversed(&self.char_stack, node.length - 1)?;
                writer.write_separator_2()?;
            }
            writer.write_flanked_pair(DNA_ALPHABET[i], DNA_ALPHABET[j])?;
            writer.write_separator_2()?;
        }
        Ok(())
    }

    fn flush_compressed_output(&mut self) -> Result<(), Error> {
        let Some(writer) = &mut self.writer else { return Ok(()) };
        for i in 0..4usize {
            for j in 0..4usize {
                for k in 0..4usize {
                    let infix_length = self.compression_buffers_len[i][j][k];
                    if infix_length == 0 {
                        continue;
                    }
                    writer.write_char(DNA_ALPHABET[i])?;
                    writer.write_chars(&vec![DNA_ALPHABET[j]; infix_length as usize])?;
                    writer.write_char(DNA_ALPHABET[k])?;
                    writer.write_separator_1()?;
                    if infix_length > 1 && has_one_bit(&self.compression_buffers[i][j][k], infix_length - 2) {
                        writer.write_bits(&self.compression_buffers[i][j][k], infix_length - 2)?;
                    }
                    writer.write_separator_2()?;
                }
            }
        }
        Ok(())
    }

    fn on_node_maw(&mut self, node: &RightMaximalString) {
        if node.n_left_extensions < 2 || node.length + 2 < self.min_length {
            return;
        }
        self.stats.n_maxreps += 1;
        if self.score_hook.is_some() {
            self.init_left_right_freqs(node);
        }
        let mut found = 0u32;
        for i in 1..=4usize {
            if node.left_extension_bitmap & (1 << i) == 0 {
                continue;
            }
            for j in 1..=4usize {
                if node.right_extension_bitmap & (1 << j) == 0 {
                    continue;
                }
                // A MAW requires the flanked string itself to be absent.
                if node.freq_left_right[i][j] > 0 {
                    continue;
                }
                if let Some(hook) = &mut self.score_hook {
                    let score = hook.score(
                        (i - 1) as u8,
                        (j - 1) as u8,
                        self.left_freqs[i - 1],
                        self.right_freqs[j - 1],
                        self.text_length,
                        node,
                    );
                    if !hook.select(score) {
                        continue;
                    }
                }
                found += 1;
                let _ = self.emit(node, i as u8, j as u8, found == 1);
            }
        }
        if found > 0 {
            self.stats.n_maxreps_with_hit += 1;
        }
    }

    fn on_node_mrw(&mut self, node: &RightMaximalString, low_freq: u64, high_freq: u64) {
        if node.n_left_extensions < 2 || node.length + 2 < self.min_length {
            return;
        }
        self.stats.n_maxreps += 1;
        self.init_left_right_freqs(node);
        let mut found = 0u32;
        for i in 1..=4usize {
            if node.left_extension_bitmap & (1 << i) == 0 || self.left_freqs[i - 1] < high_freq {
                continue;
            }
            for j in 1..=4usize {
                if node.right_extension_bitmap & (1 << j) == 0 || self.right_freqs[j - 1] < high_freq {
                    continue;
                }
                let f = node.freq_left_right[i][j];
                if f >= high_freq || f < low_freq {
                    continue;
                }
                if let Some(hook) = &mut self.score_hook {
                    let score = hook.score(
                        (i - 1) as u8,
                        (j - 1) as u8,
                        self.left_freqs[i - 1],
                        self.right_freqs[j - 1],
                        self.text_length,
                        node,
                    );
                    if !hook.select(score) {
                        continue;
                    }
                }
                found += 1;
                let _ = self.emit(node, i as u8, j as u8, found == 1);
            }
        }
        if found > 0 {
            self.stats.n_maxreps_with_hit += 1;
        }
    }
}

impl Detector for WordDetector {
    fn on_node(&mut self, node: &RightMaximalString) {
        if (self.writer.is_some() || self.score_hook.is_some()) && node.length != 0 {
            let _ = self.push_char(node);
        }
        match self.mode {
            Mode::Maw => self.on_node_maw(node),
            Mode::Mrw { low_freq, high_freq } => self.on_node_mrw(node, low_freq, high_freq),
        }
    }

    fn clone_for_workpackage(&self, id: u64) -> Self {
        let writer_and_path = self.output_path.as_ref().map(|p| {
            let suffixed = p.with_file_name(format!(
                "{}.{id}",
                p.file_name().unwrap_or_default().to_string_lossy()
            ));
            (OutputWriter::create(&suffixed).ok(), suffixed)
        });

        WordDetector {
            text_length: self.text_length,
            min_length: self.min_length,
            mode: self.mode,
            char_stack: self.char_stack.clone(),
            runs_stack: self.runs_stack.clone(),
            compress_output: self.compress_output,
            compression_buffers: Default::default(),
            compression_buffers_len: [[[0u64; 4]; 4]; 4],
            output_path: writer_and_path.as_ref().map(|(_, p)| p.clone()),
            writer: writer_and_path.and_then(|(w, _)| w),
            score_hook: self.score_hook.as_ref().map(|h| h.clone_box()),
            length_histogram: self
                .length_histogram
                .as_ref()
                .map(|h| LengthHistogram::new(h.min, h.max)),
            left_freqs: [0; 4],
            right_freqs: [0; 4],
            stats: DetectionStats::default(),
        }
    }

    fn merge(&mut self, other: Self) {
        if let (Some(a), Some(b)) = (&mut self.length_histogram, &other.length_histogram) {
            a.merge_from(b);
        }
        for i in 0..4usize {
            for j in 0..4usize {
                for k in 0..4usize {
                    let b_len = other.compression_buffers_len[i][j][k];
                    if b_len == 0 {
                        continue;
                    }
                    let a_len = self.compression_buffers_len[i][j][k];
                    let merged_len = a_len.max(b_len);
                    let words = ceil_div(merged_len, 64).max(1) as usize;
                    let mut merged = vec![0u64; words];
                    if a_len > 0 {
                        for (w, v) in merged.iter_mut().zip(self.compression_buffers[i][j][k].iter()) {
                            *w |= v;
                        }
                    }
                    for (w, v) in merged.iter_mut().zip(other.compression_buffers[i][j][k].iter()) {
                        *w |= v;
                    }
                    self.compression_buffers_len[i][j][k] = merged_len;
                    self.compression_buffers[i][j][k] = merged;
                }
            }
        }
        self.stats.merge_from(&other.stats);
    }

    fn finalize(&mut self) {
        if self.compress_output {
            let _ = self.flush_compressed_output();
        }
        if let Some(writer) = &mut self.writer {
            let _ = writer.flush();
        }
    }
}
