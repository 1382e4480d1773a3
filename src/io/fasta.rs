//! Loading a DNA/RNA sequence from FASTA or plain text.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;

use crate::alphabet::DnaCode;
use crate::error::Error;

/// Reads `path` as FASTA when `is_fasta` is set, otherwise as a single
/// newline-free plain-text sequence; mirrors `buildIndex.c`'s explicit
/// `is_fasta` flag rather than sniffing the file's first byte. Multi-record
/// FASTA files are concatenated in record order, matching the
/// single-string indexing this crate builds (multi-sequence indexing is
/// out of scope).
pub fn load_sequence(path: impl AsRef<Path>, is_fasta: bool) -> Result<Vec<DnaCode>, Error> {
    let path = path.as_ref();
    if !is_fasta {
        return load_plain_text(path);
    }

    let file = File::open(path).map_err(crate::error::io_at(path))?;
    let reader = fasta::Reader::new(BufReader::new(file));

    let mut codes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::InputFormat(format!("malformed FASTA record in {}: {e}", path.display())))?;
        for &b in record.seq() {
            codes.push(to_code(b, path)?);
        }
    }
    if codes.is_empty() {
        return Err(Error::InputFormat(format!("no FASTA records in {}", path.display())));
    }
    Ok(codes)
}

fn to_code(b: u8, path: &Path) -> Result<DnaCode, Error> {
    DnaCode::from_ascii(b).ok_or_else(|| {
        Error::InputFormat(format!("unsupported character {:?} in {}", b as char, path.display()))
    })
}

fn load_plain_text(path: &Path) -> Result<Vec<DnaCode>, Error> {
    let raw = std::fs::read_to_string(path).map_err(crate::error::io_at(path))?;
    raw.bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| to_code(b, path))
        .collect()
}
