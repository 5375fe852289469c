pub mod tablewriter;

use crate::error::ChangesUtilsError;
use std::io::{prelude::*, BufReader};
use std::path::Path;

pub fn tsv_reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.quoting(false).delimiter(b'\t').escape(None);
    builder
}

/// Open plain or compressed text. The compression format is detected from the contents.
pub fn open_input(path: impl AsRef<Path>) -> Result<BufReader<Box<dyn Read>>, ChangesUtilsError> {
    let path = path.as_ref();
    let reader = autocompress::autodetect_open(path)
        .map_err(|e| ChangesUtilsError::OpenError(path.to_path_buf(), e.to_string()))?;
    Ok(BufReader::new(Box::new(reader)))
}

/// Consume up to `count` lines. Returns the number of lines actually skipped.
pub fn skip_lines(reader: &mut impl BufRead, count: usize) -> std::io::Result<usize> {
    let mut buffer = Vec::new();
    for skipped in 0..count {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(skipped);
        }
    }
    Ok(count)
}
