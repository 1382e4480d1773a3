//! The fixed six-symbol alphabet `{#, A, C, G, T, N}` this crate indexes.
//!
//! `Sharp` only ever appears inside a built [`crate::bwt_index::BwtIndex`] at
//! its recorded `sharp_position`, materialized there as `A`; text handed to
//! the builder never contains it.

use std::fmt;

/// A DNA/RNA symbol, or the end-of-text sentinel.
///
/// The numeric values double as the BWT's cumulative-count ordering
/// (`C[0]=#`, `C[1]=A`, ..., `C[4]=N`) and must not be renumbered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DnaCode {
    Sharp = 0,
    A = 1,
    C = 2,
    G = 3,
    T = 4,
    N = 5,
}

impl DnaCode {
    /// The four proper DNA bases, in the C array's order.
    pub const BASES: [DnaCode; 4] = [DnaCode::A, DnaCode::C, DnaCode::G, DnaCode::T];

    /// All six codes, `#` first.
    pub const ALL: [DnaCode; 6] = [
        DnaCode::Sharp,
        DnaCode::A,
        DnaCode::C,
        DnaCode::G,
        DnaCode::T,
        DnaCode::N,
    ];

    #[inline]
    pub fn from_u8(v: u8) -> Self {
        debug_assert!(v <= 5, "DnaCode out of range: {v}");
        // Safety-free: repr(u8) enum reconstructed via match, no transmute.
        match v {
            0 => DnaCode::Sharp,
            1 => DnaCode::A,
            2 => DnaCode::C,
            3 => DnaCode::G,
            4 => DnaCode::T,
            _ => DnaCode::N,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self as usize
    }

    /// Maps an input byte (uppercase or lowercase ASCII) to its code.
    ///
    /// Returns `None` for anything outside `{A,C,G,T,U,N}` (case-insensitive);
    /// callers treat that as an [`crate::error::Error::InputFormat`].
    pub fn from_ascii(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(DnaCode::A),
            b'C' => Some(DnaCode::C),
            b'G' => Some(DnaCode::G),
            b'T' | b'U' => Some(DnaCode::T),
            b'N' => Some(DnaCode::N),
            _ => None,
        }
    }

    pub fn to_ascii(self) -> u8 {
        match self {
            DnaCode::Sharp => b'#',
            DnaCode::A => b'A',
            DnaCode::C => b'C',
            DnaCode::G => b'G',
            DnaCode::T => b'T',
            DnaCode::N => b'N',
        }
    }

    /// Watson-Crick complement; `N` and `Sharp` complement to themselves.
    pub fn complement(self) -> Self {
        match self {
            DnaCode::A => DnaCode::T,
            DnaCode::T => DnaCode::A,
            DnaCode::C => DnaCode::G,
            DnaCode::G => DnaCode::C,
            other => other,
        }
    }
}

impl fmt::Display for DnaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii() as char)
    }
}

/// Reverses and complements a strand, for the optional reverse-complement
/// concatenation performed by [`crate::io::fasta`].
pub fn reverse_complement(text: &[DnaCode]) -> Vec<DnaCode> {
    text.iter().rev().map(|&c| c.complement()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trip() {
        for &c in &DnaCode::BASES {
            assert_eq!(DnaCode::from_ascii(c.to_ascii()), Some(c));
            assert_eq!(DnaCode::from_ascii(c.to_ascii().to_ascii_lowercase()), Some(c));
        }
    }

    #[test]
    fn complement_is_involution() {
        for &c in &DnaCode::BASES {
            assert_eq!(c.complement().complement(), c);
        }
    }

    #[test]
    fn reverse_complement_reverses_and_complements() {
        let t = [DnaCode::A, DnaCode::C, DnaCode::G, DnaCode::T];
        assert_eq!(
            reverse_complement(&t),
            vec![DnaCode::A, DnaCode::C, DnaCode::G, DnaCode::T]
        );
        let t2 = [DnaCode::A, DnaCode::A, DnaCode::C];
        assert_eq!(reverse_complement(&t2), vec![DnaCode::G, DnaCode::T, DnaCode::T]);
    }
}
