use crate::error::ChangesUtilsError;
use crate::utils::skip_lines;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

pub const DEFAULT_CONVERTER: &str = "./changestovcf.pl";
pub const DEFAULT_INTERPRETER: &str = "perl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub diagnostic: String,
}

impl ConversionOutcome {
    fn failure(diagnostic: String) -> Self {
        ConversionOutcome {
            success: false,
            exit_code: None,
            diagnostic,
        }
    }
}

/// Turns the data rows of a projected table into a VCF file.
///
/// A converter that ran but failed reports it through [`ConversionOutcome`];
/// `Err` is reserved for problems with the input or output files.
pub trait VcfConverter {
    fn program(&self) -> &Path;
    fn describe(&self, input: &Path, output: &Path, skip_rows: usize) -> String {
        format!(
            "{} {} {} (skip {} rows)",
            self.program().display(),
            input.display(),
            output.display(),
            skip_rows
        )
    }
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        skip_rows: usize,
    ) -> Result<ConversionOutcome, ChangesUtilsError>;
}

/// External converter which reads table rows from stdin and writes VCF to stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConverter {
    interpreter: Option<PathBuf>,
    executable: PathBuf,
}

impl ExternalConverter {
    pub fn new(interpreter: Option<impl AsRef<Path>>, executable: impl AsRef<Path>) -> Self {
        ExternalConverter {
            interpreter: interpreter.map(|x| x.as_ref().to_path_buf()),
            executable: executable.as_ref().to_path_buf(),
        }
    }

    fn command(&self) -> Command {
        match self.interpreter.as_ref() {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&self.executable);
                command
            }
            None => Command::new(&self.executable),
        }
    }
}

impl Default for ExternalConverter {
    fn default() -> Self {
        ExternalConverter::new(Some(DEFAULT_INTERPRETER), DEFAULT_CONVERTER)
    }
}

impl VcfConverter for ExternalConverter {
    fn program(&self) -> &Path {
        &self.executable
    }

    fn describe(&self, input: &Path, output: &Path, skip_rows: usize) -> String {
        let program = match self.interpreter.as_ref() {
            Some(interpreter) => format!(
                "{} {}",
                interpreter.display(),
                self.executable.display()
            ),
            None => self.executable.display().to_string(),
        };
        format!(
            "tail -n +{} {} | {} > {}",
            skip_rows + 1,
            input.display(),
            program,
            output.display()
        )
    }

    fn convert(
        &self,
        input: &Path,
        output: &Path,
        skip_rows: usize,
    ) -> Result<ConversionOutcome, ChangesUtilsError> {
        let mut reader = BufReader::new(File::open(input)?);
        let output_file = File::create(output)?;

        let mut child = match self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::from(output_file))
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return Ok(ConversionOutcome::failure(format!(
                    "Cannot start {}: {}",
                    self.executable.display(),
                    e
                )))
            }
        };

        let mut stdin = child
            .stdin
            .take()
            .ok_or(ChangesUtilsError::OtherError("converter stdin is not available"))?;
        // feed rows from another thread so a chatty stderr cannot block the pipe
        let feeder = thread::spawn(move || -> io::Result<u64> {
            skip_lines(&mut reader, skip_rows)?;
            io::copy(&mut reader, &mut stdin)
        });

        let result = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| ChangesUtilsError::OtherError("converter input thread panicked"))?;
        let diagnostic = String::from_utf8_lossy(&result.stderr).trim().to_string();

        if !result.status.success() {
            return Ok(ConversionOutcome {
                success: false,
                exit_code: result.status.code(),
                diagnostic,
            });
        }

        match fed {
            Ok(bytes) => log::trace!("{} bytes were passed to the converter", bytes),
            // converter finished without reading all rows
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::warn!("Converter exited before reading all rows")
            }
            Err(e) => return Err(e.into()),
        }

        Ok(ConversionOutcome {
            success: true,
            exit_code: result.status.code(),
            diagnostic,
        })
    }
}
