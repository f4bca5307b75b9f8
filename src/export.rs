//! CSV serialization of spectrogram matrices.
//!
//! One comma-separated line per frame, one field per bin, no header. Fields
//! use fixed six-decimal notation so the files diff cleanly between runs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::spectrogram::Spectrogram;

/// Write `spectrogram` as CSV to an arbitrary writer.
pub fn write_csv<W: Write>(spectrogram: &Spectrogram, out: &mut W) -> io::Result<()> {
    for row in spectrogram.rows() {
        let mut first = true;
        for value in row {
            if !first {
                out.write_all(b",")?;
            }
            write!(out, "{value:.6}")?;
            first = false;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Write `spectrogram` as CSV to a file, creating or truncating it.
pub fn save_csv<P: AsRef<Path>>(spectrogram: &Spectrogram, path: P) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_csv(spectrogram, &mut writer)?;
    writer.flush()
}
