use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangesUtilsError {
    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Utf8 Error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Cannot open {}: {}", .0.display(), .1)]
    OpenError(PathBuf, String),
    #[error("Input file is empty: header row is not found")]
    EmptyFile,
    #[error("None of the wanted columns are found in the header")]
    NoMatchingColumns,
    #[error("Malformed row at line {line}: column index {index} is required, but only {found} fields are found")]
    MalformedRow { line: u64, index: usize, found: usize },
    #[error("Column {0} is specified more than once")]
    DuplicateColumn(String),
    #[error("'{}' is not a file", .0.display())]
    NotAFile(PathBuf),
    #[error("Cannot create symlink {} -> {}: {}", .link.display(), .original.display(), .source)]
    Symlink {
        original: PathBuf,
        link: PathBuf,
        source: std::io::Error,
    },
    #[error("Converter {} failed ({}): {}", .program.display(), .status, .diagnostic)]
    ConverterFailed {
        program: PathBuf,
        status: String,
        diagnostic: String,
    },
    #[error("Error: {0}")]
    OtherError(&'static str),
}
