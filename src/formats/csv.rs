//! CSV export of decoded channels

use crate::core::Channel;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;

/// Write channels to `writer`, header first
pub fn write_channels<W: Write>(mut writer: W, channels: &[Channel]) -> Result<usize> {
    writeln!(writer, "{}", Channel::CSV_HEADER.join(","))?;

    let mut written = 0;
    for ch in channels {
        // Skip slots with both VFOs blank
        if ch.is_empty() {
            continue;
        }
        writeln!(writer, "{}", ch.to_csv().join(","))?;
        written += 1;
    }

    Ok(written)
}

/// Export channels to a CSV file. Returns the number of rows written.
pub fn export_channels(filename: impl AsRef<Path>, channels: &[Channel]) -> Result<usize> {
    let file = File::create(filename)?;
    write_channels(file, channels)
}
