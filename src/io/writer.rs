//! Buffered output writer for MAW/MRW text reports.
//!
//! The original buffers characters by hand and flushes to disk when full;
//! `std::io::BufWriter` already gives the same amortized-flush behavior, so
//! this wraps one instead of re-implementing the resize/flush dance.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bits::{read_bit, read_two_bits};
use crate::error::Error;

const DNA_ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];
const OUTPUT_SEPARATOR_1: u8 = b',';
const OUTPUT_SEPARATOR_2: u8 = b'\n';

/// Appends reports to `path` (previous content is truncated, matching the
/// original's "open in write mode, clear the old content" contract).
pub struct OutputWriter {
    inner: BufWriter<File>,
}

impl OutputWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(crate::error::io_at(path))?;
        Ok(OutputWriter { inner: BufWriter::new(file) })
    }

    pub fn write_char(&mut self, c: u8) -> Result<(), Error> {
        self.inner.write_all(&[c])?;
        Ok(())
    }

    pub fn write_chars(&mut self, chars: &[u8]) -> Result<(), Error> {
        self.inner.write_all(chars)?;
        Ok(())
    }

    pub fn write_separator_1(&mut self) -> Result<(), Error> {
        self.write_char(OUTPUT_SEPARATOR_1)
    }

    pub fn write_separator_2(&mut self) -> Result<(), Error> {
        self.write_char(OUTPUT_SEPARATOR_2)
    }

    /// Writes `from[0..=last_bit]` as `'0'`/`'1'` characters.
    pub fn write_bits(&mut self, from: &[u64], last_bit: u64) -> Result<(), Error> {
        for i in 0..=last_bit {
            self.write_char(if read_bit(from, i) == 0 { b'0' } else { b'1' })?;
        }
        Ok(())
    }

    /// Writes `from[0..=last]` (two-bit codes 0..=3) in reverse order, each
    /// mapped through the DNA alphabet.
    pub fn write_two_bits_reversed(&mut self, from: &[u64], last: u64) -> Result<(), Error> {
        for i in (0..=last).rev() {
            self.write_char(DNA_ALPHABET[read_two_bits(from, i) as usize])?;
        }
        Ok(())
    }

    /// Writes `a`, a separator, then `b` (the two flanking characters of a
    /// minimal absent/rare word around the maximal-repeat infix).
    pub fn write_flanked_pair(&mut self, a: u8, b: u8) -> Result<(), Error> {
        self.write_char(a)?;
        self.write_separator_1()?;
        self.write_char(b)
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.inner.flush();
    }
}
