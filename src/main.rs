//! itemmem CLI - triggered item-memory binding encoder.
//!
//! Runs one encoder through the standard stimulus schedule on a simulated
//! clock and writes the observed signals to a VCD trace.

use anyhow::Context;
use clap::Parser;
use itemmem::{Harness, HarnessConfig, Representation};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "itemmem")]
#[command(version)]
#[command(about = "Item-memory binding encoder simulation", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hypervector dimensionality
    #[arg(short, long)]
    dimensions: Option<usize>,

    /// Representation: binary or bipolar
    #[arg(short, long)]
    mode: Option<Representation>,

    /// Minimum spacing between cycles, in nanoseconds
    #[arg(long)]
    cooldown_ns: Option<u64>,

    /// Simulated time to observe after raising the trigger, in nanoseconds
    #[arg(long)]
    observe_ns: Option<u64>,

    /// VCD trace output path
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Do not write a trace
    #[arg(long, conflicts_with = "trace")]
    no_trace: bool,

    /// Seed for reproducible vectors
    #[arg(short, long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn harness_config(&self) -> anyhow::Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => HarnessConfig::default(),
        };

        if let Some(dimensions) = self.dimensions {
            config.encoder.dimensions = dimensions;
        }
        if let Some(mode) = self.mode {
            config.encoder.representation = mode;
        }
        if let Some(cooldown_ns) = self.cooldown_ns {
            config.encoder.cooldown_ns = cooldown_ns;
        }
        if let Some(observe_ns) = self.observe_ns {
            config.observe_ns = observe_ns;
        }
        if let Some(seed) = self.seed {
            config.encoder.seed = Some(seed);
        }
        if let Some(trace) = &self.trace {
            config.trace_path = Some(trace.clone());
        }
        if self.no_trace {
            config.trace_path = None;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.harness_config()?;
    let harness = Harness::new(config).context("invalid configuration")?;
    let runtime = itemmem::simulation_runtime().context("building runtime")?;

    let report = runtime.block_on(harness.run())?;
    info!(
        cycles = report.cycles,
        simulated_s = report.elapsed.as_secs_f64(),
        trace = ?report.trace_path,
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
