//! Input loading and output writing.

pub mod fasta;
pub mod writer;

pub use fasta::load_sequence;
pub use writer::OutputWriter;
