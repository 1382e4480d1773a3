//! Testable properties 5 and 6 (spec section 8): every right-maximal
//! string has at least two distinct right extensions under policy 0, and
//! the enumerator visits each right-maximal string at most once.

use std::collections::HashSet;

use maw_index::alphabet::DnaCode;
use maw_index::detector::Detector;
use maw_index::enumerator::{enumerate_sequential, EnumParams, RightMaximalString, TraversalMaximality, TraversalOrder};
use maw_index::BwtIndex;
use proptest::prelude::*;

fn code_strategy() -> impl Strategy<Value = DnaCode> {
    prop_oneof![Just(DnaCode::A), Just(DnaCode::C), Just(DnaCode::G), Just(DnaCode::T)]
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

struct Recorder {
    keys: Vec<(u64, u64)>, // (length, bwt_start) uniquely identifies a node
    bitmap_violations: usize,
}

impl Detector for Recorder {
    fn on_node(&mut self, node: &RightMaximalString) {
        self.keys.push((node.length, node.bwt_start));
        if node.length > 0 && node.right_extension_bitmap.count_ones() < 2 {
            self.bitmap_violations += 1;
        }
    }
    fn clone_for_workpackage(&self, _id: u64) -> Self {
        Recorder { keys: Vec::new(), bitmap_violations: 0 }
    }
    fn merge(&mut self, mut other: Self) {
        self.keys.append(&mut other.keys);
        self.bitmap_violations += other.bitmap_violations;
    }
    fn finalize(&mut self) {}
}

proptest! {
    #[test]
    fn every_node_is_right_maximal_and_visited_once(text in prop::collection::vec(code_strategy(), 1..300)) {
        let idx = BwtIndex::build(&text).unwrap();
        let mut recorder = Recorder { keys: Vec::new(), bitmap_violations: 0 };
        enumerate_sequential(&idx, &default_params(), &mut recorder);

        prop_assert_eq!(recorder.bitmap_violations, 0);

        let unique: HashSet<_> = recorder.keys.iter().cloned().collect();
        prop_assert_eq!(unique.len(), recorder.keys.len());
    }
}
