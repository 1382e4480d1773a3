//! Generalized multi-string right-maximal enumerator: the same stack-based
//! DFS as [`crate::enumerator`], but driven across `N` independent
//! [`BwtIndex`]es at once so a single traversal can answer "is `W`
//! right-maximal, and what is its frequency" simultaneously for every
//! participating text.
//!
//! A node passes the frequency filter iff every string's count is
//! in-range; right-maximality under policy 0/1 additionally requires that
//! the *union* of distinct right extensions across strings has at least
//! two members (the `#` of each string counts as its own distinct symbol,
//! since two different texts ending the same way are still two occurrences
//! of a text boundary, not one).
//!
//! Not wired to a CLI binary: the distributed spec frames this as a variant
//! of the single-string core, not a standalone deliverable.

use crate::bwt_index::BwtIndex;
use crate::enumerator::{
    build_node_expansion, EnumParams, RightMaximalString, StackFrame, TraversalMaximality,
    TraversalOrder,
};

fn root_frame_for(index: &BwtIndex) -> StackFrame {
    crate::enumerator::root_frame(index)
}

/// One pending node shared across all `N` indexed strings: same string
/// length and first character, but one BWT interval + right-extension
/// frequency vector per string.
#[derive(Debug, Clone)]
pub struct MultiStackFrame {
    per_string: Vec<StackFrame>,
}

/// The right-maximal string descriptor for the multi-string variant: one
/// [`RightMaximalString`] per participating text (frequency 0, no left/
/// right extensions, wherever that particular text doesn't contain `W`).
#[derive(Debug, Clone)]
pub struct MultiRightMaximalString {
    pub length: u64,
    pub first_character: u8,
    pub per_string: Vec<RightMaximalString>,
}

impl MultiRightMaximalString {
    pub fn frequency(&self, string_index: usize) -> u64 {
        self.per_string[string_index].frequency
    }
}

/// Receives one call per qualifying multi-string node.
pub trait MultiDetector: Send {
    fn on_node(&mut self, node: &MultiRightMaximalString);
}

/// Union, across all strings, of which of the 6 possible right extensions
/// (`#,A,C,G,T,N`) a given left extension `b` has a nonzero frequency for,
/// plus the summed per-string size of that left extension's interval.
struct UnionExpansion {
    /// `union_right_bitmap[b]`: OR across strings of `freq_left_right[b][*]
    /// > 0`.
    union_right_bitmap: [u8; 6],
    /// `union_n_right[b]`: popcount of the above, for Policy0/Policy2.
    union_n_right: [u8; 6],
    /// Summed N-extension frequency across strings, for Policy1's "two
    /// occurrences of N" rule.
    union_n_freq: [u64; 6],
}

fn union_expansions(expansions: &[crate::enumerator::NodeExpansion]) -> UnionExpansion {
    let mut union_right_bitmap = [0u8; 6];
    let mut union_n_freq = [0u64; 6];
    for expansion in expansions {
        for b in 0..6 {
            let mut bitmap = 0u8;
            for i in 0..6 {
                if expansion.descriptor.freq_left_right[b][i] > 0 {
                    bitmap |= 1 << i;
                }
            }
            union_right_bitmap[b] |= bitmap;
            union_n_freq[b] += expansion.descriptor.freq_left_right[b][5];
        }
    }
    let mut union_n_right = [0u8; 6];
    for b in 0..6 {
        union_n_right[b] = union_right_bitmap[b].count_ones() as u8;
    }
    UnionExpansion { union_right_bitmap, union_n_right, union_n_freq }
}

fn is_left_extension_right_maximal_multi(
    b: usize,
    expansions: &[crate::enumerator::NodeExpansion],
    union: &UnionExpansion,
    maximality: TraversalMaximality,
) -> bool {
    match maximality {
        TraversalMaximality::Policy0 => union.union_n_right[b] >= 2,
        TraversalMaximality::Policy1 => union.union_n_right[b] >= 2 || union.union_n_freq[b] >= 2,
        TraversalMaximality::Policy2 => {
            (1..=4).filter(|&i| union.union_right_bitmap[b] & (1 << i) != 0).count() >= 2
                || expansions
                    .iter()
                    .filter(|e| (1..=4).any(|i| e.descriptor.freq_left_right[b][i] > 0))
                    .count()
                    >= 2
        }
    }
}

fn reorder_children(children: &mut [(MultiStackFrame, u64)], order: TraversalOrder) {
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

fn expand_multi(
    frame: &MultiStackFrame,
    indexes: &[BwtIndex],
    params: &EnumParams,
) -> (MultiRightMaximalString, Vec<MultiStackFrame>) {
    let expansions: Vec<crate::enumerator::NodeExpansion> = frame
        .per_string
        .iter()
        .zip(indexes)
        .map(|(f, idx)| build_node_expansion(f, idx))
        .collect();

    let length = expansions[0].descriptor.length;
    let first_character = expansions[0].descriptor.first_character;
    let descriptor = MultiRightMaximalString {
        length,
        first_character,
        per_string: expansions.iter().map(|e| e.descriptor.clone()).collect(),
    };

    let new_length = length + 1;
    if new_length > params.max_length {
        return (descriptor, Vec::new());
    }

    let union = union_expansions(&expansions);
    let mut to_push: Vec<(MultiStackFrame, u64)> = Vec::with_capacity(4);

    for b in 1..=4usize {
        let total_size: u64 = expansions.iter().map(|e| e.interval_size_of_left[b]).sum();
        let max_size = expansions.iter().map(|e| e.interval_size_of_left[b]).max().unwrap_or(0);
        if max_size < params.min_frequency {
            continue;
        }
        if !is_left_extension_right_maximal_multi(b, &expansions, &union, params.traversal_maximality) {
            continue;
        }

        let per_string: Vec<StackFrame> = expansions
            .iter()
            .map(|e| StackFrame {
                length: new_length,
                bwt_start: e.descriptor.bwt_start_left[b - 1],
                frequency: e.interval_size_of_left[b],
                first_character: b as u8,
                frequency_right: e.descriptor.freq_left_right[b],
            })
            .collect();
        to_push.push((MultiStackFrame { per_string }, total_size));
    }

    reorder_children(&mut to_push, params.traversal_order);
    let children = to_push.into_iter().map(|(f, _)| f).collect();
    (descriptor, children)
}

fn passes_frequency_filter(descriptor: &MultiRightMaximalString, params: &EnumParams) -> bool {
    descriptor
        .per_string
        .iter()
        .all(|d| d.frequency >= params.min_frequency && d.frequency <= params.max_frequency)
}

/// Runs the multi-string enumerator sequentially over `indexes`, invoking
/// `detector.on_node` for every node whose length is in range and whose
/// frequency, in every participating text, is in range.
pub fn enumerate_sequential_multi<D: MultiDetector>(
    indexes: &[BwtIndex],
    params: &EnumParams,
    detector: &mut D,
) -> u64 {
    assert!(!indexes.is_empty(), "multi-string enumeration needs at least one text");
    let root = MultiStackFrame {
        per_string: indexes.iter().map(root_frame_for).collect(),
    };
    let mut stack = vec![root];
    let mut traversed = 0u64;
    while let Some(frame) = stack.pop() {
        traversed += 1;
        let (descriptor, children) = expand_multi(&frame, indexes, params);
        if descriptor.length >= params.min_length && passes_frequency_filter(&descriptor, params) {
            detector.on_node(&descriptor);
        }
        stack.extend(children);
    }
    traversed
}
