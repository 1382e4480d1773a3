//! Lookup tables derived from the miniblock encoding.
//!
//! A miniblock packs three consecutive packed-sequence symbols (`0=A, 1=C,
//! 2=G, 3=T, 4=N`) into the 7-bit value `c0 + 5*c1 + 25*c2` (fewer terms at
//! the tail of the sequence). These tables turn that 7-bit value directly
//! into A/C/G/T occurrence counts without redecoding the symbols on every
//! rank query.
//!
//! The original encodes three distinct tables (whole-miniblock counts,
//! suffix counts, substring counts); here a single *prefix*-count table
//! subsumes all three, since `suffix(k) = total - prefix(k)` and any
//! sub-range `[from..to)` is `prefix(to) - prefix(from)`.

use std::sync::OnceLock;

pub const MINIBLOCK_MASK: u32 = 0x7F;
pub const CHARS_PER_MINIBLOCK: usize = 3;

/// `PREFIX[v][k]` = counts of `A,C,G,T` among the first `k` characters
/// (`k` in `0..=3`) of miniblock value `v`. `PREFIX[v][3]` is the whole
/// miniblock's count (there are only 3 characters per miniblock, so `k=3`
/// is also the total).
type PrefixTable = [[[u8; 4]; 4]; 128];

static PREFIX: OnceLock<Box<PrefixTable>> = OnceLock::new();

fn build_prefix_table() -> Box<PrefixTable> {
    let mut table: Box<PrefixTable> = Box::new([[[0u8; 4]; 4]; 128]);
    for v in 0..128usize {
        let chars = decode_miniblock(v as u32);
        let mut running = [0u8; 4];
        table[v][0] = running;
        for (k, c) in chars.iter().enumerate() {
            if let Some(code) = *c {
                running[code as usize] += 1;
            }
            table[v][k + 1] = running;
        }
    }
    table
}

fn prefix_table() -> &'static PrefixTable {
    PREFIX.get_or_init(build_prefix_table)
}

/// Decodes a 7-bit miniblock value into its (up to 3) packed symbols.
/// `None` marks positions beyond the valid range for a value that was only
/// ever assigned fewer than 3 characters (the table still covers every
/// value in `0..128`, including ones that never occur in a well-formed
/// sequence; those rows are simply unused).
fn decode_miniblock(v: u32) -> [Option<u8>; 3] {
    let c0 = (v % 5) as u8;
    let r = v / 5;
    let c1 = (r % 5) as u8;
    let c2 = (r / 5) as u8;
    [
        Some(c0).filter(|&c| c < 5),
        Some(c1).filter(|&c| c < 5),
        Some(c2).filter(|&c| c < 5),
    ]
}

/// Encodes up to 3 packed symbols (`0..=4`) into a miniblock value. Missing
/// tail positions must be passed as `4` (N) by convention of the caller,
/// matching how the original pads a partial trailing miniblock with A (0)
/// in practice since those slots are never read past `validChars`.
#[inline]
pub fn encode_miniblock(c0: u8, c1: u8, c2: u8) -> u32 {
    debug_assert!(c0 < 5 && c1 < 5 && c2 < 5);
    c0 as u32 + 5 * c1 as u32 + 25 * c2 as u32
}

/// Counts of A,C,G,T among the first `k` (`0..=3`) characters of miniblock
/// `v`.
#[inline]
pub fn miniblock_prefix_counts(v: u32, k: usize) -> [u8; 4] {
    debug_assert!(v < 128 && k <= 3);
    prefix_table()[v as usize][k]
}

/// Counts of A,C,G,T over the whole miniblock.
#[inline]
pub fn miniblock_counts(v: u32) -> [u8; 4] {
    miniblock_prefix_counts(v, 3)
}

/// Counts of A,C,G,T in the suffix starting at character index `k`
/// (`0..=3`; `k=3` is the empty suffix).
#[inline]
pub(crate) fn miniblock_suffix_counts(v: u32, k: usize) -> [u8; 4] {
    let total = miniblock_counts(v);
    let pre = miniblock_prefix_counts(v, k);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = total[i] - pre[i];
    }
    out
}

/// Counts of A,C,G,T over the half-open character range `[from, to)`
/// (`from <= to <= 3`).
#[inline]
pub(crate) fn miniblock_range_counts(v: u32, from: usize, to: usize) -> [u8; 4] {
    debug_assert!(from <= to && to <= 3);
    let pre_to = miniblock_prefix_counts(v, to);
    let pre_from = miniblock_prefix_counts(v, from);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = pre_to[i] - pre_from[i];
    }
    out
}
