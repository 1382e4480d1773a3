//! The BWT index wrapper: owns the packed sequence, the global cumulative
//! character array, the sharp position, and the empirical character
//! probabilities.

use std::io::{Read, Write};

use tracing::debug;

use crate::alphabet::DnaCode;
use crate::error::Error;
use crate::packed_seq::PackedSeq;
use crate::suffix_array;

/// Header size in 64-bit words: `size, sharp_position, text_length,
/// C[0..4]`.
const HEADER_WORDS: usize = 8;

/// A built, read-only BWT index of a single text `T` (length `text_length`,
/// no terminator stored explicitly — the BWT of `T#` is represented
/// internally with `#` materialized as `A` at `sharp_position`).
#[derive(Debug, Clone)]
pub struct BwtIndex {
    packed: PackedSeq,
    sharp_position: u64,
    text_length: u64,
    /// `c[0]=0`, `c[1]=f_A-1`, `c[i]=c[i-1]+f_{char i}` for `i=2..=4`
    /// (A,C,G,T order).
    c: [u64; 5],
    dna_probabilities: [f64; 4],
    log_dna_probabilities: [f64; 4],
}

impl BwtIndex {
    /// Builds the index from `text` (no sentinel, no `DnaCode::Sharp`
    /// entries). Delegates suffix-array construction to
    /// [`crate::suffix_array::build_suffix_array`].
    pub fn build(text: &[DnaCode]) -> Result<Self, Error> {
        let l = text.len() as u64;
        if l == 0 {
            return Err(Error::InputFormat("text must be non-empty".to_string()));
        }
        debug!(length = l, "building BWT index");

        let codes: Vec<u8> = text
            .iter()
            .map(|c| {
                debug_assert_ne!(*c, DnaCode::Sharp, "text must not contain the sentinel");
                c.as_u8() - 1 // A=1..N=5 -> packed 0..4
            })
            .collect();

        let sa = suffix_array::build_suffix_array(&codes)?;

        let mut packed_symbols = vec![0u8; (l + 1) as usize];
        packed_symbols[0] = codes[(l - 1) as usize];
        let mut sharp_position = 0u64;
        for (i, &j) in sa.iter().enumerate() {
            let i = i + 1;
            let j = j as usize;
            packed_symbols[i] = if j == 0 {
                sharp_position = i as u64;
                0 // sharp stored as A
            } else {
                codes[j - 1]
            };
        }

        let packed = PackedSeq::build(&packed_symbols);
        let (c, dna_probabilities, log_dna_probabilities) = Self::derive_stats(&packed);

        debug!(sharp_position, "BWT index built");
        Ok(BwtIndex {
            packed,
            sharp_position,
            text_length: l,
            c,
            dna_probabilities,
            log_dna_probabilities,
        })
    }

    fn derive_stats(packed: &PackedSeq) -> ([u64; 5], [f64; 4], [f64; 4]) {
        let totals = packed.total_counts(); // A,C,G,T, A inflated by the sharp
        let count_a = totals[0] - 1;
        let count_c = totals[1];
        let count_g = totals[2];
        let count_t = totals[3];

        let mut c = [0u64; 5];
        c[1] = count_a;
        c[2] = c[1] + count_c;
        c[3] = c[2] + count_g;
        c[4] = c[3] + count_t;

        let raw = [count_a, count_c, count_g, count_t];
        let total_dna: u64 = raw.iter().sum();
        let mut p = [0f64; 4];
        let mut log_p = [0f64; 4];
        for i in 0..4 {
            p[i] = if total_dna > 0 {
                raw[i] as f64 / total_dna as f64
            } else {
                0.0
            };
            log_p[i] = if p[i] > 0.0 { p[i].ln() } else { f64::NEG_INFINITY };
        }
        (c, p, log_p)
    }

    #[inline]
    pub fn text_length(&self) -> u64 {
        self.text_length
    }

    /// Length of the indexed BWT (`text_length + 1`).
    #[inline]
    pub fn bwt_len(&self) -> u64 {
        self.text_length + 1
    }

    #[inline]
    pub fn sharp_position(&self) -> u64 {
        self.sharp_position
    }

    #[inline]
    pub fn c_array(&self) -> &[u64; 5] {
        &self.c
    }

    #[inline]
    pub fn dna_probabilities(&self) -> &[f64; 4] {
        &self.dna_probabilities
    }

    #[inline]
    pub fn log_dna_probabilities(&self) -> &[f64; 4] {
        &self.log_dna_probabilities
    }

    /// True iff `sharp_position` lies in the half-open interval
    /// `[start, end)`, the case where a right-extension count computed over
    /// that interval double-counts the sentinel as `A`.
    #[inline]
    pub fn sharp_in_range(&self, start: u64, end: u64) -> bool {
        start <= self.sharp_position && self.sharp_position < end
    }

    /// Prefix counts of `A,C,G,T` in `BWT[0..=p]`, with the sharp-as-A
    /// correction already applied by the caller where relevant (this method
    /// returns the raw packed-sequence count; callers that need the
    /// "occurrences of true A" count subtract 1 when `sharp_position <= p`).
    pub fn rank_prefix(&self, p: u64) -> [u64; 4] {
        self.packed.rank_prefix(p)
    }

    /// Batched prefix-count query over sorted BWT positions.
    pub fn rank_burst(&self, positions: &[u64]) -> Vec<[u64; 4]> {
        self.packed.rank_burst(positions)
    }

    /// The decoded packed symbol (`0..=4`) at BWT position `p`.
    pub fn bwt_symbol(&self, p: u64) -> u8 {
        self.packed.get(p)
    }

    /// Writes `{size, sharp_position, text_length, C[0..4]}` as eight
    /// little-endian 64-bit words, followed by the packed sequence's
    /// payload words (headers are not stored; they are recomputed on load).
    pub fn serialize(&self, w: &mut impl Write) -> Result<usize, Error> {
        let payload = self.packed.payload_words();
        let size_bytes = payload.len() * 4;
        let header = [
            size_bytes as u64,
            self.sharp_position,
            self.text_length,
            self.c[0],
            self.c[1],
            self.c[2],
            self.c[3],
            self.c[4],
        ];
        for word in header {
            w.write_all(&word.to_le_bytes())?;
        }
        for word in payload {
            w.write_all(&word.to_le_bytes())?;
        }
        Ok(HEADER_WORDS * 8 + size_bytes)
    }

    /// Reads back an index written by [`BwtIndex::serialize`].
    pub fn deserialize(r: &mut impl Read) -> Result<Self, Error> {
        let mut header_bytes = [0u8; HEADER_WORDS * 8];
        r.read_exact(&mut header_bytes)?;
        let mut words = [0u64; HEADER_WORDS];
        for (i, chunk) in header_bytes.chunks_exact(8).enumerate() {
            words[i] = u64::from_le_bytes(chunk.try_into().unwrap());
        }
        let size_bytes = words[0] as usize;
        let sharp_position = words[1];
        let text_length = words[2];
        let c = [words[3], words[4], words[5], words[6], words[7]];

        if size_bytes % 4 != 0 {
            return Err(Error::InputFormat(
                "serialized index payload size is not word-aligned".to_string(),
            ));
        }
        let mut payload = vec![0u32; size_bytes / 4];
        let mut raw = vec![0u8; size_bytes];
        r.read_exact(&mut raw)?;
        for (w, chunk) in payload.iter_mut().zip(raw.chunks_exact(4)) {
            *w = u32::from_le_bytes(chunk.try_into().unwrap());
        }

        let packed = PackedSeq::from_payload(payload.into_boxed_slice(), text_length + 1);
        let (_recomputed_c, dna_probabilities, log_dna_probabilities) = Self::derive_stats(&packed);
        debug!(sharp_position, text_length, "BWT index deserialized");

        Ok(BwtIndex {
            packed,
            sharp_position,
            text_length,
            c,
            dna_probabilities,
            log_dna_probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Vec<DnaCode> {
        s.bytes().map(|b| DnaCode::from_ascii(b).unwrap()).collect()
    }

    #[test]
    fn build_rejects_empty_text() {
        assert!(BwtIndex::build(&[]).is_err());
    }

    #[test]
    fn c_array_accounts_for_whole_text() {
        let idx = BwtIndex::build(&text("acgt")).unwrap();
        let c = idx.c_array();
        let n_count = 0u64;
        assert_eq!(
            c[1] + (c[2] - c[1]) + (c[3] - c[2]) + (c[4] - c[3]) + n_count,
            idx.text_length()
        );
    }

    #[test]
    fn aaaa_has_all_a_counts() {
        let idx = BwtIndex::build(&text("aaaa")).unwrap();
        assert_eq!(idx.c_array(), &[0, 3, 3, 3, 3]);
    }

    #[test]
    fn serialize_deserialize_round_trip() {
        let idx = BwtIndex::build(&text("acgtacgtnacgtacgt")).unwrap();
        let mut buf = Vec::new();
        idx.serialize(&mut buf).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        let restored = BwtIndex::deserialize(&mut cursor).unwrap();
        assert_eq!(restored.sharp_position(), idx.sharp_position());
        assert_eq!(restored.text_length(), idx.text_length());
        assert_eq!(restored.c_array(), idx.c_array());
        for p in 0..idx.bwt_len() {
            assert_eq!(restored.rank_prefix(p), idx.rank_prefix(p));
        }
    }
}
