use anyhow::anyhow;
use clap::Parser;
use macro_cli::init_tracing;
use macro_lightning::density::log_space;
use macro_lightning::export::{reference, writer_for_path};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Tabulate the density and astrophysical reference curves over a log-spaced mass grid.
#[derive(Parser, Debug)]
#[command(author, version, about = "Reference-curve CSV generator")]
struct Cli {
    /// Base-10 exponent of the smallest mass in grams
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    min_exp: f64,

    /// Base-10 exponent of the largest mass in grams
    #[arg(long, default_value_t = 25.0, allow_negative_numbers = true)]
    max_exp: f64,

    /// Number of mass samples
    #[arg(long, default_value_t = 50)]
    points: usize,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/reference_curves.csv")]
    output: PathBuf,

    /// Verbosity: -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.points == 0 {
        return Err(anyhow!("--points must be at least 1"));
    }
    if cli.max_exp < cli.min_exp {
        return Err(anyhow!("--max-exp must not be below --min-exp"));
    }

    let masses = log_space(cli.min_exp, cli.max_exp, cli.points);
    debug!(points = masses.len(), "evaluating reference curves");

    let mut writer = writer_for_path(&cli.output)?;
    reference::write_csv(writer.as_mut(), &masses)?;
    writer.flush()?;
    Ok(())
}
