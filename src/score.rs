//! Optional per-candidate scoring hook, run just before a MAW/MRW is
//! reported. Supplements the detectors with the same score machinery the
//! original wires through `ScoreState_t`, generalized into a trait so new
//! scoring strategies can be plugged in without touching the detectors.

use crate::enumerator::RightMaximalString;

/// Which scoring strategy a CLI invocation selected (`SELECTED_SCORE` in
/// the original). `LogProbability` is the only variant for now; the enum
/// exists so a second scorer can be added without changing the CLI
/// argument shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreId {
    LogProbability,
}

impl ScoreId {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(ScoreId::LogProbability),
            _ => None,
        }
    }

    /// Builds the selected hook, wired with a threshold: the hook's
    /// `select` only keeps finite, `>= threshold` scores (`threshold` of
    /// `f64::NEG_INFINITY` keeps every finite score, matching
    /// `SELECTED_SCORE_THRESHOLD`'s "0 disables the cutoff" default).
    pub fn build(self, log_dna_probabilities: [f64; 4], threshold: f64) -> Box<dyn ScoreHook> {
        match self {
            ScoreId::LogProbability => {
                Box::new(ThresholdedScore::new(LogProbabilityScore::new(log_dna_probabilities), threshold))
            }
        }
    }
}

/// Wraps a [`ScoreHook`] with a minimum-score cutoff on top of its own
/// `select` rule.
#[derive(Clone)]
struct ThresholdedScore<H> {
    inner: H,
    threshold: f64,
}

impl<H: ScoreHook + Clone + 'static> ThresholdedScore<H> {
    fn new(inner: H, threshold: f64) -> Self {
        ThresholdedScore { inner, threshold }
    }
}

impl<H: ScoreHook + Clone + 'static> ScoreHook for ThresholdedScore<H> {
    fn push(&mut self, char_id: u8, string_depth: u64) {
        self.inner.push(char_id, string_depth);
    }

    fn score(
        &mut self,
        left_char_id: u8,
        right_char_id: u8,
        left_freq: u64,
        right_freq: u64,
        text_length: u64,
        node: &RightMaximalString,
    ) -> f64 {
        self.inner.score(left_char_id, right_char_id, left_freq, right_freq, text_length, node)
    }

    fn select(&self, score: f64) -> bool {
        self.inner.select(score) && score >= self.threshold
    }

    fn clone_box(&self) -> Box<dyn ScoreHook> {
        Box::new(self.clone())
    }
}

/// Receives the same character-push and candidate-emission events as the
/// character stack in [`crate::detector`], and decides whether a candidate
/// is worth keeping.
pub trait ScoreHook: Send {
    /// Called whenever a character is pushed on the detector's character
    /// stack, in the same order the enumerator visits nodes.
    fn push(&mut self, char_id: u8, string_depth: u64);

    /// Called for each MAW/MRW candidate `aVb`, where `V` is described by
    /// `node`. `left_freq`/`right_freq` are the frequencies of `aV`/`Vb`.
    fn score(
        &mut self,
        left_char_id: u8,
        right_char_id: u8,
        left_freq: u64,
        right_freq: u64,
        text_length: u64,
        node: &RightMaximalString,
    ) -> f64;

    /// Whether the last [`ScoreHook::score`] result should be kept.
    fn select(&self, score: f64) -> bool;

    /// A fresh, independent copy for a parallel workpackage.
    fn clone_box(&self) -> Box<dyn ScoreHook>;
}

/// Log-probability score of a candidate word under the text's empirical
/// per-character distribution: `sum(log p(c))` over the flanking
/// characters and the maximal-repeat infix, matching the model the
/// original's reference score implementation favors for ranking MAWs by
/// surprise. Selects candidates whose score is finite (i.e. every
/// character appears in the text).
///
/// `log_prob_stack[d-1]` holds the cumulative `sum(log p(c))` of the
/// infix's first `d` characters, mirroring `scoreStack` in the original:
/// a stack indexed by depth (like the detector's own two-bit character
/// stack), not a running total, since the DFS backtracks and re-pushes a
/// different character at the same depth on every sibling branch.
#[derive(Debug, Clone)]
pub struct LogProbabilityScore {
    log_dna_probabilities: [f64; 4],
    log_prob_stack: Vec<f64>,
}

impl LogProbabilityScore {
    pub fn new(log_dna_probabilities: [f64; 4]) -> Self {
        LogProbabilityScore { log_dna_probabilities, log_prob_stack: Vec::new() }
    }
}

impl ScoreHook for LogProbabilityScore {
    fn push(&mut self, char_id: u8, string_depth: u64) {
        let depth = string_depth as usize;
        if self.log_prob_stack.len() < depth {
            self.log_prob_stack.resize(depth, 0.0);
        }
        let prior = if depth >= 2 { self.log_prob_stack[depth - 2] } else { 0.0 };
        self.log_prob_stack[depth - 1] = prior + self.log_dna_probabilities[char_id as usize];
    }

    fn score(
        &mut self,
        left_char_id: u8,
        right_char_id: u8,
        _left_freq: u64,
        _right_freq: u64,
        _text_length: u64,
        node: &RightMaximalString,
    ) -> f64 {
        let depth = node.length as usize;
        let infix_log_prob = if depth == 0 { 0.0 } else { self.log_prob_stack[depth - 1] };
        self.log_dna_probabilities[left_char_id as usize]
            + infix_log_prob
            + self.log_dna_probabilities[right_char_id as usize]
    }

    fn select(&self, score: f64) -> bool {
        score.is_finite()
    }

    fn clone_box(&self) -> Box<dyn ScoreHook> {
        Box::new(self.clone())
    }
}
