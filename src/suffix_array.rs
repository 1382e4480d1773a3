//! Suffix array construction, delegated to the `libsais` crate.
//!
//! Given the packed text (no terminator, no sentinel byte), produces the
//! suffix array of that text treating end-of-text as implicitly smaller
//! than every symbol — the same "SA of T, not T#" contract
//! [`crate::bwt_index`] builds its BWT from.

use crate::error::Error;

/// Builds the suffix array of `text` (packed symbols `0..=4`).
///
/// Mirrors the construction pattern used by other FM-index crates in this
/// space: a caller-sized output buffer handed to `libsais`'s builder.
pub fn build_suffix_array(text: &[u8]) -> Result<Vec<i64>, Error> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut sa = vec![0i64; text.len()];
    libsais::SuffixArrayConstruction::for_text(text)
        .in_borrowed_buffer(&mut sa)
        .run()
        .map_err(|e| Error::Resource(format!("suffix array construction failed: {e}")))?;
    Ok(sa)
}
