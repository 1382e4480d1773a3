//! Stack-based DFS enumerator of all right-maximal substrings of `T`,
//! driven purely through BWT range ("backward search") operations.
//!
//! One call to [`Detector::on_node`] is issued per enumerated right-maximal
//! string whose length and frequency satisfy the configured bounds. No
//! suffix tree is ever materialized: each stack frame only carries the BWT
//! interval `[bwt_start, bwt_start+frequency)` of the string it represents.

use crate::bwt_index::BwtIndex;
use crate::detector::Detector;

/// Order in which newly pushed children are left on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// No particular order: A, C, G, T push order (T is popped first).
    PushOrder,
    /// Push order, but the child with the largest BWT interval is moved to
    /// the bottom of the newly pushed range, so it is popped last.
    StackTrick,
    /// The newly pushed range is reversed, giving a lexicographic pop
    /// order.
    Lexicographic,
}

/// Policy used to decide whether a left-extended string is itself
/// right-maximal (and therefore worth pushing and exploring further).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMaximality {
    /// At least two distinct characters in `{#,A,C,G,T,N}`.
    Policy0,
    /// Policy 0, or at least two occurrences of N.
    Policy1,
    /// At least two distinct characters in `{A,C,G,T}` only.
    Policy2,
}

#[derive(Debug, Clone, Copy)]
pub struct EnumParams {
    pub min_length: u64,
    pub max_length: u64,
    pub min_frequency: u64,
    pub max_frequency: u64,
    pub traversal_order: TraversalOrder,
    pub traversal_maximality: TraversalMaximality,
}

/// One pending node on the enumerator's stack: the BWT interval of a
/// string `W`, plus the frequency of each of its 6 possible right
/// extensions (`#,A,C,G,T,N`), already known from when `W` was pushed.
#[derive(Debug, Clone)]
pub(crate) struct StackFrame {
    pub(crate) length: u64,
    pub(crate) bwt_start: u64,
    pub(crate) frequency: u64,
    /// `0` for the root (empty string); otherwise `1=A,2=C,3=G,4=T`.
    pub(crate) first_character: u8,
    pub(crate) frequency_right: [u64; 6],
}

pub(crate) fn root_frame(index: &BwtIndex) -> StackFrame {
    let c = index.c_array();
    let mut frequency_right = [0u64; 6];
    frequency_right[0] = 1;
    for i in 1..=4 {
        frequency_right[i] = c[i] - c[i - 1];
    }
    frequency_right[5] = index.text_length() - c[4];
    StackFrame {
        length: 0,
        bwt_start: 0,
        frequency: index.bwt_len(),
        first_character: 0,
        frequency_right,
    }
}

/// The right-maximal string descriptor handed to the detector at each
/// visited node.
#[derive(Debug, Clone)]
pub struct RightMaximalString {
    pub length: u64,
    pub bwt_start: u64,
    pub frequency: u64,
    /// `0` at the root; otherwise `1=A,2=C,3=G,4=T`.
    pub first_character: u8,
    /// LSB order `#,A,C,G,T,N`.
    pub right_extension_bitmap: u8,
    pub n_right_extensions: u8,
    /// LSB order `#,A,C,G,T,N`.
    pub left_extension_bitmap: u8,
    pub n_left_extensions: u8,
    /// BWT interval starts of the `A,C,G,T,N` left extensions.
    pub bwt_start_left: [u64; 5],
    /// `freq_left_right[left][right]`, both indexed `#,A,C,G,T,N`.
    pub freq_left_right: [[u64; 6]; 6],
}

/// Per-node scratch produced alongside the descriptor: how many distinct
/// right extensions each possible left-extension has, and the total BWT
/// interval size for each left-extension (used to decide what to push).
pub(crate) struct NodeExpansion {
    pub(crate) descriptor: RightMaximalString,
    pub(crate) n_right_extensions_of_left: [u8; 6],
    pub(crate) interval_size_of_left: [u64; 6],
}

/// Computes, for the popped frame's string `W`, the rank-burst boundary
/// positions of its right sub-intervals and the resulting per-character
/// prefix counts (mirrors `getRanksOfRightExtensions`).
fn rank_right_extensions(frame: &StackFrame, index: &BwtIndex) -> (u8, Vec<i64>, Vec<[u64; 4]>, Vec<u64>) {
    let mut bitmap = 0u8;
    let mut points: Vec<i64> = Vec::with_capacity(7);
    points.push(frame.bwt_start as i64 - 1);
    for i in 0..6 {
        if frame.frequency_right[i] > 0 {
            bitmap |= 1 << i;
            let last = *points.last().unwrap();
            points.push(last + frame.frequency_right[i] as i64);
        }
    }

    let k = points.len();
    let mut ranks = vec![[0u64; 4]; k];
    if points[0] < 0 {
        if k > 1 {
            let real_points: Vec<u64> = points[1..].iter().map(|&p| p as u64).collect();
            let burst = index.rank_burst(&real_points);
            ranks[1..].copy_from_slice(&burst);
        }
    } else {
        let real_points: Vec<u64> = points.iter().map(|&p| p as u64).collect();
        ranks = index.rank_burst(&real_points);
    }

    let mut ranks_n = vec![0u64; k];
    for i in 0..k {
        let total = (points[i] + 1) as u64;
        let acgt: u64 = ranks[i].iter().sum();
        ranks_n[i] = total - acgt;
    }

    (bitmap, points, ranks, ranks_n)
}

/// Builds the callback descriptor and the left-extension push scratch
/// (mirrors `buildCallbackState`).
pub(crate) fn build_node_expansion(frame: &StackFrame, index: &BwtIndex) -> NodeExpansion {
    let (bitmap, points, ranks, ranks_n) = rank_right_extensions(frame, index);
    let c = index.c_array();

    let mut bwt_start_left = [0u64; 5];
    for i in 0..4 {
        bwt_start_left[i] = c[i] + ranks[0][i] + 1;
    }
    if index.sharp_position() < frame.bwt_start {
        bwt_start_left[0] -= 1;
    }
    bwt_start_left[4] = c[4] + ranks_n[0] + 1;

    let mut freq_left_right = [[0u64; 6]; 6];
    let mut n_right_extensions_of_left = [0u8; 6];
    let mut interval_size_of_left = [0u64; 6];
    n_right_extensions_of_left[0] = 1;
    interval_size_of_left[0] = 1;
    let mut left_bitmap = 0u8;

    let mut j = 0usize;
    for i in 0..6 {
        if bitmap & (1 << i) == 0 {
            continue;
        }
        j += 1;
        let sharp = index.sharp_position();
        let contains_sharp_sub = sharp as i64 >= points[j - 1] + 1 && sharp as i64 <= points[j];
        freq_left_right[0][i] = contains_sharp_sub as u64;
        if contains_sharp_sub {
            left_bitmap |= 1;
        }

        let a_count = ranks[j][0] - ranks[j - 1][0] - contains_sharp_sub as u64;
        freq_left_right[1][i] = a_count;
        if a_count > 0 {
            left_bitmap |= 1 << 1;
            n_right_extensions_of_left[1] += 1;
        }
        interval_size_of_left[1] += a_count;

        for k in 1..=3usize {
            let c_count = ranks[j][k] - ranks[j - 1][k];
            freq_left_right[k + 1][i] = c_count;
            if c_count > 0 {
                left_bitmap |= 1 << (k + 1);
                n_right_extensions_of_left[k + 1] += 1;
            }
            interval_size_of_left[k + 1] += c_count;
        }

        let n_count = ranks_n[j] - ranks_n[j - 1];
        freq_left_right[5][i] = n_count;
        if n_count > 0 {
            left_bitmap |= 1 << 5;
            n_right_extensions_of_left[5] += 1;
        }
        interval_size_of_left[5] += n_count;
    }

    let descriptor = RightMaximalString {
        length: frame.length,
        bwt_start: frame.bwt_start,
        frequency: frame.frequency,
        first_character: frame.first_character,
        n_right_extensions: (points.len() - 1) as u8,
        right_extension_bitmap: bitmap,
        bwt_start_left,
        left_extension_bitmap: left_bitmap,
        n_left_extensions: left_bitmap.count_ones() as u8,
        freq_left_right,
    };

    NodeExpansion {
        descriptor,
        n_right_extensions_of_left,
        interval_size_of_left,
    }
}

fn is_left_extension_right_maximal(
    b: usize,
    descriptor: &RightMaximalString,
    n_right_extensions_of_left: &[u8; 6],
    maximality: TraversalMaximality,
) -> bool {
    match maximality {
        TraversalMaximality::Policy0 => n_right_extensions_of_left[b] >= 2,
        TraversalMaximality::Policy1 => {
            n_right_extensions_of_left[b] >= 2 || descriptor.freq_left_right[b][5] >= 2
        }
        TraversalMaximality::Policy2 => {
            (1..=4).filter(|&i| descriptor.freq_left_right[b][i] > 0).count() >= 2
        }
    }
}

fn reorder_children(children: &mut [(StackFrame, u64)], order: TraversalOrder) {
    match order {
        TraversalOrder::PushOrder => {}
        TraversalOrder::StackTrick => {
            let mut max_idx = 0usize;
            let mut max_val = 0u64;
            for (i, (_, v)) in children.iter().enumerate() {
                if *v > max_val {
                    max_val = *v;
                    max_idx = i;
                }
            }
            children.swap(0, max_idx);
        }
        TraversalOrder::Lexicographic => children.reverse(),
    }
}

/// Processes one popped stack frame: computes its descriptor and the set
/// of right-maximal children to push, in the configured traversal order.
/// Returns `None` children when the node has no qualifying left extension
/// or `length+1` would exceed `max_length`.
pub(crate) fn expand(
    frame: &StackFrame,
    index: &BwtIndex,
    params: &EnumParams,
) -> (RightMaximalString, Vec<StackFrame>) {
    let expansion = build_node_expansion(frame, index);
    let descriptor = expansion.descriptor;

    let new_length = descriptor.length + 1;
    if new_length > params.max_length {
        return (descriptor, Vec::new());
    }

    let mut to_push: Vec<(StackFrame, u64)> = Vec::with_capacity(4);
    for b in 1..=4usize {
        let size = expansion.interval_size_of_left[b];
        if size < params.min_frequency {
            continue;
        }
        if !is_left_extension_right_maximal(
            b,
            &descriptor,
            &expansion.n_right_extensions_of_left,
            params.traversal_maximality,
        ) {
            continue;
        }
        let child = StackFrame {
            length: new_length,
            bwt_start: descriptor.bwt_start_left[b - 1],
            frequency: size,
            first_character: b as u8,
            frequency_right: descriptor.freq_left_right[b],
        };
        to_push.push((child, size));
    }

    reorder_children(&mut to_push, params.traversal_order);
    let children = to_push.into_iter().map(|(f, _)| f).collect();
    (descriptor, children)
}

/// Runs the enumerator sequentially to completion, starting from the whole
/// text, invoking `detector.on_node` for every qualifying node.
pub fn enumerate_sequential<D: Detector>(
    index: &BwtIndex,
    params: &EnumParams,
    detector: &mut D,
) -> u64 {
    let mut stack = vec![root_frame(index)];
    run_stack(index, params, &mut stack, 0, detector)
}

/// Drives `stack` down to (but not past) `min_stack_pointer` frames,
/// invoking the detector along the way. Shared by
/// [`enumerate_sequential`] and the parallel scheduler's workpackage
/// execution.
pub(crate) fn run_stack<D: Detector>(
    index: &BwtIndex,
    params: &EnumParams,
    stack: &mut Vec<StackFrame>,
    min_stack_pointer: usize,
    detector: &mut D,
) -> u64 {
    let mut traversed = 0u64;
    while stack.len() > min_stack_pointer {
        let frame = stack.pop().unwrap();
        traversed += 1;
        let (descriptor, children) = expand(&frame, index, params);
        if descriptor.length >= params.min_length && descriptor.frequency <= params.max_frequency {
            detector.on_node(&descriptor);
        }
        stack.extend(children);
    }
    traversed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::DnaCode;
    use crate::detector::Detector;

    fn text(s: &str) -> Vec<DnaCode> {
        s.bytes().map(|b| DnaCode::from_ascii(b).unwrap()).collect()
    }

    struct CollectStrings {
        results: Vec<(u64, u64)>, // (length, frequency)
    }

    impl Detector for CollectStrings {
        fn on_node(&mut self, node: &RightMaximalString) {
            self.results.push((node.length, node.frequency));
        }
        fn clone_for_workpackage(&self, _id: u64) -> Self {
            CollectStrings { results: Vec::new() }
        }
        fn merge(&mut self, mut other: Self) {
            self.results.append(&mut other.results);
        }
        fn finalize(&mut self) {}
    }

    fn default_params() -> EnumParams {
        EnumParams {
            min_length: 0,
            max_length: u64::MAX,
            min_frequency: 0,
            max_frequency: u64::MAX,
            traversal_order: TraversalOrder::PushOrder,
            traversal_maximality: TraversalMaximality::Policy0,
        }
    }

    #[test]
    fn every_right_maximal_string_has_at_least_two_right_extensions() {
        let idx = BwtIndex::build(&text("acacaca")).unwrap();
        let mut detector = CollectStrings { results: Vec::new() };
        let mut stack = vec![root_frame(&idx)];
        let params = default_params();
        while let Some(frame) = stack.pop() {
            let (descriptor, children) = expand(&frame, &idx, &params);
            detector.on_node(&descriptor);
            assert!(
                descriptor.right_extension_bitmap.count_ones() >= 2 || descriptor.length == 0 && idx.text_length() == 0,
                "node of length {} has bitmap {:#b}",
                descriptor.length,
                descriptor.right_extension_bitmap
            );
            stack.extend(children);
        }
        assert!(!detector.results.is_empty());
    }

    #[test]
    fn enumerator_visits_each_node_once() {
        let idx = BwtIndex::build(&text("acacaca")).unwrap();
        let mut detector = CollectStrings { results: Vec::new() };
        let params = default_params();
        let traversed = enumerate_sequential(&idx, &params, &mut detector);
        assert_eq!(traversed as usize, detector.results.len());
    }

    #[test]
    fn aaaa_only_a_runs_are_right_maximal() {
        let idx = BwtIndex::build(&text("aaaa")).unwrap();
        let mut detector = CollectStrings { results: Vec::new() };
        let params = default_params();
        enumerate_sequential(&idx, &params, &mut detector);
        // lengths 0..=3 (the A^k runs) should all appear; nothing longer.
        let max_len = detector.results.iter().map(|&(l, _)| l).max().unwrap();
        assert!(max_len <= 3);
    }
}
