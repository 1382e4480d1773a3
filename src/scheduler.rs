//! Parallel work-package scheduler: runs the sequential enumerator down to a
//! fixed small depth, clones the detector state at each frame reached at
//! that depth into an independent workpackage, then drains all workpackages
//! on a bounded `rayon` pool and merges their detector states back into one.
//!
//! Mirrors `SLT_single_string.c`'s `iterate_parallel`: the sequential phase
//! to depth `W = ceil(log5(2*n_threads))`, the OpenMP `schedule(dynamic)`
//! loop over workpackages, and the final merge pass.

use rayon::prelude::*;
use tracing::debug;

use crate::bwt_index::BwtIndex;
use crate::detector::Detector;
use crate::enumerator::{expand, run_stack, EnumParams};

/// `ceil(log5(x))` for `x >= 1`.
fn ceil_log5(x: u64) -> u32 {
    if x <= 1 {
        return 0;
    }
    let mut power = 1u64;
    let mut exponent = 0u32;
    while power < x {
        power *= 5;
        exponent += 1;
    }
    exponent
}

/// The workpackage length `W` for `n_threads` workers: the depth at which
/// the sequential phase stops cloning off independent subtrees. Each node
/// has up to 4 right-maximal children, but the branching factor bound used
/// by the original is base 5 (it includes the possibility of an all-`N`
/// sibling), hence `log5`, not `log4`.
pub fn workpackage_length(n_threads: usize) -> u32 {
    ceil_log5(2 * n_threads.max(1) as u64)
}

struct WorkPackage<D> {
    id: u64,
    stack: Vec<crate::enumerator::StackFrame>,
    detector: D,
}

/// Runs the enumerator using up to `n_threads` workers. Behaviorally
/// identical to [`crate::enumerator::enumerate_sequential`] (testable
/// property 8: per-thread-count runs agree on every aggregated counter),
/// only the wall-clock schedule differs.
pub fn enumerate_parallel<D: Detector>(
    index: &BwtIndex,
    params: &EnumParams,
    mut seed: D,
    n_threads: usize,
) -> D {
    let w = workpackage_length(n_threads);
    debug!(n_threads, workpackage_length = w, "starting parallel enumeration");

    let mut stack = vec![crate::enumerator::root_frame(index)];
    let mut packages: Vec<WorkPackage<D>> = Vec::new();
    let mut next_id = 0u64;

    // Sequential phase: drive the stack, but whenever a popped frame has
    // already reached depth `w`, peel it into its own workpackage instead
    // of expanding it here (mirrors `iterate`'s workpackage cutoff check,
    // performed right after the pop and before `buildCallbackState`).
    while let Some(frame) = stack.pop() {
        if frame.length as u32 >= w {
            let id = next_id;
            next_id += 1;
            let cloned_detector = seed.clone_for_workpackage(id);
            packages.push(WorkPackage { id, stack: vec![frame], detector: cloned_detector });
            continue;
        }
        let (descriptor, children) = expand(&frame, index, params);
        if descriptor.length >= params.min_length && descriptor.frequency <= params.max_frequency {
            seed.on_node(&descriptor);
        }
        stack.extend(children);
    }

    debug!(n_packages = packages.len(), "sequential phase done, dispatching workpackages");

    let finished: Vec<(u64, D)> = packages
        .into_par_iter()
        .map(|mut pkg| {
            run_stack(index, params, &mut pkg.stack, 0, &mut pkg.detector);
            (pkg.id, pkg.detector)
        })
        .collect();

    for (id, detector) in finished {
        debug!(id, "merging workpackage");
        seed.merge(detector);
    }

    seed.finalize();
    seed
}
