use crate::error::ChangesUtilsError;
use crate::logic::converter::{
    ExternalConverter, VcfConverter, DEFAULT_CONVERTER, DEFAULT_INTERPRETER,
};
use crate::logic::file_type::FileType;
use crate::logic::output::{create_input_symlink, prepare_output_dir, OutputPaths};
use crate::logic::projection::{default_columns, project_file};
use crate::utils::tablewriter::Delimiter;
use anyhow::Context;
use clap::Args;
use std::path::Path;

#[derive(Debug, Clone, Args)]
#[command(about = "Extract columns of a changes file and convert them into VCF")]
pub struct Changes2Vcf {
    #[arg(help = "The input file to be processed")]
    infile: String,
    #[arg(help = "The sample identifier")]
    sample_id: String,
    #[arg(
        long = "create_symlink",
        alias = "create-symlink",
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = clap::ArgAction::Set,
        help = "Create a symlink to the input file in the output directory"
    )]
    create_symlink: bool,
    #[arg(long, default_value = "./", help = "Output directory")]
    outdir: String,
    #[arg(
        long = "header_row_count",
        alias = "header-row-count",
        default_value_t = 1,
        help = "Number of header rows stripped before running the converter"
    )]
    header_row_count: usize,
    #[arg(
        short = 'c',
        long = "column",
        help = "Column name to keep (repeatable, replaces the default column list)"
    )]
    columns: Vec<String>,
    #[arg(long, default_value = DEFAULT_CONVERTER, help = "changestovcf executable")]
    converter: String,
    #[arg(
        long,
        default_value = DEFAULT_INTERPRETER,
        help = "Interpreter for the converter (empty to run it directly)"
    )]
    interpreter: String,
    #[arg(long, help = "Exit with an error when the converter fails")]
    fail_on_converter_error: bool,
}

impl Changes2Vcf {
    pub fn run(&self) -> anyhow::Result<()> {
        let interpreter = Some(self.interpreter.as_str()).filter(|x| !x.is_empty());
        let converter = ExternalConverter::new(interpreter, &self.converter);
        self.run_with_converter(&converter)
    }

    pub fn run_with_converter(&self, converter: &impl VcfConverter) -> anyhow::Result<()> {
        if prepare_output_dir(&self.outdir)
            .with_context(|| format!("Failed to create {}", self.outdir))?
        {
            log::debug!("output directory '{}' was created", self.outdir);
        }

        let infile = Path::new(&self.infile);
        if !infile.is_file() {
            return Err(ChangesUtilsError::NotAFile(infile.to_path_buf()).into());
        }

        log::debug!("The input file is {}", self.infile);
        log::debug!("The sample_id is {}", self.sample_id);

        let file_type = FileType::classify(infile);
        if file_type == FileType::Unknown {
            log::warn!("Unsupported file type");
        }
        log::debug!("Found file type '{}'", file_type);

        let columns = if self.columns.is_empty() {
            default_columns()
        } else {
            self.columns.clone()
        };
        log::debug!("Including only the following column names:");
        for name in &columns {
            log::debug!("{}", name);
        }

        let outputs = OutputPaths::new(&self.outdir, &self.sample_id, file_type, Delimiter::Comma);
        let summary = project_file(infile, &outputs.table, &columns, Delimiter::Comma)
            .with_context(|| format!("Failed to extract columns from {}", self.infile))?;
        log::debug!(
            "{} rows with columns {}",
            summary.rows,
            summary.header.join(",")
        );
        log::info!("Wrote output file CSV file '{}'", outputs.table.display());

        // projected table has one header line
        let tail_count = (summary.rows as usize + 1).saturating_sub(self.header_row_count);
        log::debug!("{} rows will be passed to the converter", tail_count);

        self.convert(converter, &outputs)?;

        if self.create_symlink {
            let link = create_input_symlink(infile, &self.outdir)?;
            log::debug!("created symlink {}", link.display());
        }

        Ok(())
    }

    fn convert(&self, converter: &impl VcfConverter, outputs: &OutputPaths) -> anyhow::Result<()> {
        log::debug!(
            "Will attempt to execute : '{}'",
            converter.describe(&outputs.table, &outputs.vcf, self.header_row_count)
        );
        let outcome = converter.convert(&outputs.table, &outputs.vcf, self.header_row_count)?;
        if outcome.success {
            log::info!("VCF file '{}' is ready", outputs.vcf.display());
            return Ok(());
        }

        let status = outcome
            .exit_code
            .map(|x| format!("exit status {}", x))
            .unwrap_or_else(|| "no exit status".to_string());
        log::error!(
            "Encountered some problem during invocation of '{}' ({}) : {}",
            converter.program().display(),
            status,
            outcome.diagnostic
        );
        if self.fail_on_converter_error {
            return Err(ChangesUtilsError::ConverterFailed {
                program: converter.program().to_path_buf(),
                status,
                diagnostic: outcome.diagnostic,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::logic::converter::ConversionOutcome;
    use clap::Parser;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        changes2vcf: Changes2Vcf,
    }

    fn clean_outdir(outdir: &str) -> anyhow::Result<()> {
        if Path::new(outdir).exists() {
            fs::remove_dir_all(outdir)?;
        }
        Ok(())
    }

    #[derive(Debug, Default)]
    struct RecordingConverter {
        calls: RefCell<Vec<(PathBuf, PathBuf, usize)>>,
        fail: bool,
    }

    impl VcfConverter for RecordingConverter {
        fn program(&self) -> &Path {
            Path::new("recording-converter")
        }

        fn convert(
            &self,
            input: &Path,
            output: &Path,
            skip_rows: usize,
        ) -> Result<ConversionOutcome, ChangesUtilsError> {
            self.calls
                .borrow_mut()
                .push((input.to_path_buf(), output.to_path_buf(), skip_rows));
            Ok(ConversionOutcome {
                success: !self.fail,
                exit_code: Some(if self.fail { 1 } else { 0 }),
                diagnostic: if self.fail {
                    "broken record".to_string()
                } else {
                    String::new()
                },
            })
        }
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(&["command", "input_AllChanges.txt", "S01"]);
        let args = cli.changes2vcf;
        assert_eq!(args.infile, "input_AllChanges.txt");
        assert_eq!(args.sample_id, "S01");
        assert_eq!(args.create_symlink, true);
        assert_eq!(args.outdir, "./");
        assert_eq!(args.header_row_count, 1);
        assert!(args.columns.is_empty());
        assert_eq!(args.converter, DEFAULT_CONVERTER);
        assert_eq!(args.interpreter, DEFAULT_INTERPRETER);
        assert_eq!(args.fail_on_converter_error, false);
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::parse_from(&[
            "command",
            "--create_symlink=false",
            "--outdir",
            "out",
            "--header_row_count",
            "2",
            "-c",
            "Chrom",
            "--column",
            "Start",
            "input_AllChanges.txt",
            "S01",
        ]);
        let args = cli.changes2vcf;
        assert_eq!(args.create_symlink, false);
        assert_eq!(args.outdir, "out");
        assert_eq!(args.header_row_count, 2);
        assert_eq!(args.columns, vec!["Chrom".to_string(), "Start".to_string()]);

        let cli = Cli::parse_from(&["command", "input_AllChanges.txt", "S01", "--create_symlink"]);
        assert_eq!(cli.changes2vcf.create_symlink, true);
    }

    #[test]
    fn test_parse_bare_create_symlink() {
        let cli = Cli::parse_from(&["command", "--create_symlink", "input_AllChanges.txt", "S01"]);
        assert_eq!(cli.changes2vcf.create_symlink, true);
        assert_eq!(cli.changes2vcf.infile, "input_AllChanges.txt");
        assert_eq!(cli.changes2vcf.sample_id, "S01");

        let cli = Cli::parse_from(&["command", "input_AllChanges.txt", "--create_symlink", "S01"]);
        assert_eq!(cli.changes2vcf.create_symlink, true);
        assert_eq!(cli.changes2vcf.sample_id, "S01");

        let cli = Cli::parse_from(&["command", "--create-symlink=false", "input_AllChanges.txt", "S01"]);
        assert_eq!(cli.changes2vcf.create_symlink, false);
    }

    #[cfg(unix)]
    #[test]
    fn test_run() -> anyhow::Result<()> {
        let outdir = "../target/changesutils-test/run/nested";
        clean_outdir("../target/changesutils-test/run")?;
        let cli = Cli::parse_from(&[
            "command",
            "--outdir",
            outdir,
            "--interpreter",
            "sh",
            "--converter",
            "./testfiles/fake_changestovcf.sh",
            "-c",
            "GeneName",
            "-c",
            "ChangeUID",
            "-c",
            "MutPct",
            "./testfiles/sample_AllChanges.txt",
            "S01",
        ]);
        cli.changes2vcf.run()?;

        assert_eq!(
            fs::read_to_string(Path::new(outdir).join("S01_Unfiltered.csv"))?,
            "ChangeUID,MutPct,GeneName\n1001,12.5,BRAF\n1002,3.2,KRAS\n1003,0.8,TP53\n1004,5.6,PIK3CA\n"
        );
        assert_eq!(
            fs::read_to_string(Path::new(outdir).join("S01_Unfiltered.vcf"))?,
            "##fileformat=VCFv4.1\nVCF:1001,12.5,BRAF\nVCF:1002,3.2,KRAS\nVCF:1003,0.8,TP53\nVCF:1004,5.6,PIK3CA\n"
        );
        let link = Path::new(outdir).join("sample_AllChanges.txt");
        assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
        Ok(())
    }

    #[test]
    fn test_run_default_columns() -> anyhow::Result<()> {
        let outdir = "../target/changesutils-test/run-default";
        clean_outdir(outdir)?;
        let cli = Cli::parse_from(&[
            "command",
            "--outdir",
            outdir,
            "--create_symlink=false",
            "./testfiles/S02_PlasmaChanges.txt",
            "S02",
        ]);
        let converter = RecordingConverter::default();
        cli.changes2vcf.run_with_converter(&converter)?;

        let csv_path = Path::new(outdir).join("S02_Filtered.csv");
        assert_eq!(
            fs::read_to_string(&csv_path)?,
            "Chrom,Start,ChangeUID,GeneName,MutPct\nchr7,140453136,2001,BRAF,11.9\nchr12,25398284,2002,KRAS,4.4\n"
        );
        assert_eq!(
            converter.calls.borrow().as_slice(),
            &[(csv_path, Path::new(outdir).join("S02_Filtered.vcf"), 1)]
        );
        assert!(!Path::new(outdir).join("S02_PlasmaChanges.txt").exists());
        Ok(())
    }

    #[test]
    fn test_run_converter_failure() -> anyhow::Result<()> {
        let outdir = "../target/changesutils-test/run-failure";
        clean_outdir(outdir)?;
        let args = [
            "command",
            "--outdir",
            outdir,
            "--create_symlink=false",
            "--header_row_count",
            "3",
            "./testfiles/S02_PlasmaChanges.txt",
            "S02",
        ];
        let converter = RecordingConverter {
            fail: true,
            ..Default::default()
        };

        // reported but not fatal
        Cli::parse_from(&args).changes2vcf.run_with_converter(&converter)?;
        assert_eq!(converter.calls.borrow()[0].2, 3);

        let mut strict_args = args.to_vec();
        strict_args.insert(1, "--fail-on-converter-error");
        let result = Cli::parse_from(&strict_args)
            .changes2vcf
            .run_with_converter(&converter);
        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ChangesUtilsError>(),
            Some(ChangesUtilsError::ConverterFailed { status, diagnostic, .. })
                if status == "exit status 1" && diagnostic == "broken record"
        ));
        Ok(())
    }

    #[test]
    fn test_run_not_a_file() -> anyhow::Result<()> {
        let outdir = "../target/changesutils-test/run-not-a-file";
        let cli = Cli::parse_from(&["command", "--outdir", outdir, "./testfiles", "S03"]);
        let converter = RecordingConverter::default();
        let error = cli.changes2vcf.run_with_converter(&converter).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ChangesUtilsError>(),
            Some(ChangesUtilsError::NotAFile(_))
        ));
        assert!(converter.calls.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_run_malformed() -> anyhow::Result<()> {
        let outdir = "../target/changesutils-test/run-malformed";
        clean_outdir(outdir)?;
        let cli = Cli::parse_from(&[
            "command",
            "--outdir",
            outdir,
            "--create_symlink=false",
            "./testfiles/malformed_vv_changes.txt",
            "S04",
        ]);
        let converter = RecordingConverter::default();
        let error = cli.changes2vcf.run_with_converter(&converter).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ChangesUtilsError>(),
            Some(ChangesUtilsError::MalformedRow { line: 3, .. })
        ));
        assert!(!Path::new(outdir).join("S04_MAF-Filtered.csv").exists());
        assert!(converter.calls.borrow().is_empty());
        Ok(())
    }
}
