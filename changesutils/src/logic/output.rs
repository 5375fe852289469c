use super::file_type::FileType;
use crate::error::ChangesUtilsError;
use crate::utils::tablewriter::Delimiter;
use std::fs;
use std::path::{Path, PathBuf};

/// Files produced for one sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub vcf: PathBuf,
}

impl OutputPaths {
    pub fn new(
        outdir: impl AsRef<Path>,
        sample_id: &str,
        file_type: FileType,
        delimiter: Delimiter,
    ) -> Self {
        let prefix = format!("{}_{}", sample_id, file_type.label());
        OutputPaths {
            table: outdir
                .as_ref()
                .join(format!("{}.{}", prefix, delimiter.extension())),
            vcf: outdir.as_ref().join(format!("{}.vcf", prefix)),
        }
    }
}

/// Create the output directory and its parents. Returns `true` if it did not exist.
pub fn prepare_output_dir(outdir: impl AsRef<Path>) -> Result<bool, ChangesUtilsError> {
    let outdir = outdir.as_ref();
    if outdir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(outdir)?;
    Ok(true)
}

/// Link `{outdir}/{basename(infile)}` to the original input file.
pub fn create_input_symlink(
    infile: impl AsRef<Path>,
    outdir: impl AsRef<Path>,
) -> Result<PathBuf, ChangesUtilsError> {
    let infile = infile.as_ref();
    let file_name = infile
        .file_name()
        .ok_or(ChangesUtilsError::OtherError("input path has no file name"))?;
    let link = outdir.as_ref().join(file_name);
    let original = fs::canonicalize(infile).unwrap_or_else(|_| infile.to_path_buf());

    symlink(&original, &link).map_err(|e| {
        log::error!(
            "Encountered some error while attempting to create symlink {} -> {}",
            original.display(),
            link.display()
        );
        ChangesUtilsError::Symlink {
            original: original.clone(),
            link: link.clone(),
            source: e,
        }
    })?;
    Ok(link)
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}
