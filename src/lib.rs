//! Minimal absent word (MAW) and minimal rare word (MRW) detection over a
//! rank-indexed Burrows-Wheeler transform of a DNA/RNA text.
//!
//! The crate is organized bottom-up:
//! - [`bits`] / [`tables`] — bit-buffer primitives and miniblock lookup
//!   tables.
//! - [`packed_seq`] — the 5-ary rank-indexed packed sequence.
//! - [`suffix_array`] — suffix-array construction (delegated to `libsais`).
//! - [`bwt_index`] — [`bwt_index::BwtIndex`], the built, read-only index.
//! - [`enumerator`] / [`multi_enumerator`] — the right-maximal substring
//!   DFS, single- and multi-string.
//! - [`scheduler`] — the parallel workpackage scheduler.
//! - [`detector`] / [`score`] — the MAW/MRW callback and its optional score
//!   hook.
//! - [`alphabet`] — the six-symbol DNA/RNA alphabet.
//! - [`io`] — FASTA/plain-text loading and buffered text output.

#![allow(clippy::len_without_is_empty)]

pub mod alphabet;
pub mod bits;
pub mod bwt_index;
pub mod detector;
pub mod enumerator;
pub mod error;
pub mod io;
pub mod multi_enumerator;
pub mod packed_seq;
pub mod scheduler;
pub mod score;
pub mod suffix_array;
pub mod tables;

pub use alphabet::DnaCode;
pub use bwt_index::BwtIndex;
pub use detector::{Detector, Mode, WordDetector};
pub use enumerator::{enumerate_sequential, EnumParams, TraversalMaximality, TraversalOrder};
pub use error::Error;
pub use scheduler::enumerate_parallel;
