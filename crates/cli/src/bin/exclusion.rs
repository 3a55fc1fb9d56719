use anyhow::Context;
use clap::Parser;
use macro_cli::init_tracing;
use macro_lightning::config::{EscapeVelocityRegistry, load_run_config};
use macro_lightning::export::exclusion::{self, Summary};
use macro_lightning::export::writer_for_path;
use macro_lightning::integrator::{Execution, VelocityGridIntegrator};
use macro_lightning::run;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Integrate the halo velocity grid and write the macro exclusion curve.
#[derive(Parser, Debug)]
#[command(author, version, about = "Macro exclusion-curve integrator")]
struct Cli {
    /// Run manifest (YAML, or TOML by extension)
    #[arg(long)]
    config: PathBuf,

    /// Extra escape-velocity parameter sets merged into the registry
    #[arg(long)]
    parameter_sets: Option<PathBuf>,

    /// Parameter set to treat as the latest one
    #[arg(long)]
    select: Option<String>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/exclusion.csv")]
    output: PathBuf,

    /// Optional JSON summary of the run
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Evaluate grid weights on the rayon pool
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Verbosity: -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_run_config(&cli.config)
        .with_context(|| format!("failed to load run manifest {}", cli.config.display()))?;

    let mut registry = EscapeVelocityRegistry::default();
    if let Some(path) = &cli.parameter_sets {
        let added = registry.extend_from_file(path)?;
        info!(added, path = %path.display(), "loaded escape-velocity parameter sets");
    }
    if let Some(name) = &cli.select {
        registry.select(name)?;
    }

    let inputs = run::resolve(&config, &registry)?;
    let execution = if cli.parallel {
        Execution::Parallel
    } else {
        Execution::Sequential
    };
    let curve = VelocityGridIntegrator::new()
        .execution(execution)
        .integrate_mass_and_cross_section(&inputs.axis, &inputs.kinematics, &inputs.interaction)?;

    let mut writer = writer_for_path(&cli.output)?;
    exclusion::write_csv(writer.as_mut(), &curve)?;
    writer.flush()?;

    if let Some(path) = &cli.summary {
        let summary = Summary::new(&inputs.axis, &inputs.kinematics, &inputs.interaction, &curve);
        exclusion::write_summary(path, &summary)?;
    }

    if cli.output.as_os_str() != "-" {
        eprintln!(
            "Wrote {} mass and {} cross-section samples to {} (vbar {}, vhold {})",
            curve.mass.samples.len(),
            curve.cross_section.samples.len(),
            cli.output.display(),
            curve.vbar(),
            curve.vhold(),
        );
    }
    Ok(())
}
