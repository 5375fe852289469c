use changesutils::Changes2Vcf;
use clap::Parser;
use std::env;

#[derive(Debug, Parser)]
#[command(
    version,
    author,
    about = "Extract columns of a changes file and convert them into VCF"
)]
pub struct Cli {
    #[arg(short = 'v', long = "verbose", action= clap::ArgAction::Count, help="verbose level")]
    verbose: u8,
    #[command(flatten)]
    changes2vcf: Changes2Vcf,
}

fn main() -> anyhow::Result<()> {
    let matches = Cli::parse();

    match matches.verbose {
        0 => {
            if env::var("RUST_LOG").is_err() {
                env::set_var("RUST_LOG", "info")
            }
        }
        1 => env::set_var("RUST_LOG", "debug"),
        _ => env::set_var("RUST_LOG", "trace"),
    }

    pretty_env_logger::init();

    matches.changes2vcf.run()?;

    Ok(())
}
