use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Unfiltered,
    Filtered,
    MafFiltered,
    Unknown,
}

const FILE_NAME_PATTERNS: &[(&str, FileType)] = &[
    ("allchanges.txt", FileType::Unfiltered),
    ("plasmachanges.txt", FileType::Filtered),
    ("vv_changes.txt", FileType::MafFiltered),
];

impl FileType {
    /// Guess the type of a changes file from its base name. Case is ignored.
    pub fn classify(path: impl AsRef<Path>) -> FileType {
        let basename = path
            .as_ref()
            .file_name()
            .map(|x| x.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        FILE_NAME_PATTERNS
            .iter()
            .find(|(pattern, _)| basename.contains(pattern))
            .map(|(_, file_type)| *file_type)
            .unwrap_or(FileType::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Unfiltered => "Unfiltered",
            FileType::Filtered => "Filtered",
            FileType::MafFiltered => "MAF-Filtered",
            FileType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
