//! This module governs the high-level implementation of the sweep
mod configuration;
mod telemetry;
pub(crate) use configuration::Configuration;

use crate::{
    model::ModelBuilder,
    sweep::{run_sweep, Pipeline, SweepSettings},
};
use clap::{ArgEnum, Parser};
use color_eyre::eyre::eyre;
use std::fmt;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    /// Number of points in the onsite-energy sweep
    mu_resolution: usize,
    /// Number of points along each momentum axis
    k_resolution: usize,
    /// Ribbon width in unit cells, ignored for the infinite sheet
    width: usize,
    #[clap(arg_enum, short, long)]
    calculation: Calculation,
    #[clap(arg_enum, short, long)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Info,
    Debug,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
pub(crate) enum Calculation {
    Bands,
    Berry,
}

/// Parse the command line, load the configuration and run the sweep
pub fn run() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = App::parse();

    let config: Configuration = Configuration::build()?;

    let settings = SweepSettings {
        mu_resolution: cli.mu_resolution,
        k_resolution: cli.k_resolution,
        width: cli.width,
        boundary: config.physical.boundary,
        t: config.physical.t,
        t2: config.physical.t2,
        phi: config.physical.phi,
        onsite_limit: config.sweep.onsite_limit,
        momentum_scale: config.sweep.momentum_scale,
        output_root: config.output.directory.clone(),
        pipeline: match cli.calculation {
            Calculation::Bands => Pipeline::Bands,
            Calculation::Berry => Pipeline::Berry,
        },
    };

    // The run directory is created up front so that the log file and every
    // worker output land in the same place
    let run_directory = settings.run_directory();
    std::fs::create_dir_all(&run_directory)?;

    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, &run_directory);
    telemetry::init_subscriber(subscriber);

    tracing::info!("calculation: {:?}", cli.calculation);
    tracing::info!(
        "boundary: {} at width {}, t = {}, t2 = {}",
        settings.boundary,
        settings.width,
        settings.t,
        settings.t2
    );

    let system = ModelBuilder::default()
        .with_width(cli.width)
        .with_boundary(settings.boundary)
        .build()?;

    let report = run_sweep(&system, &settings)?;
    for (mu, error) in report.failures() {
        tracing::error!("sweep value m = {} failed: {}", mu, error);
    }
    tracing::info!(
        "{} of {} sweep values written below {}",
        report.succeeded(),
        report.len(),
        run_directory.display()
    );
    if report.all_failed() {
        return Err(eyre!("every sweep value failed"));
    }
    Ok(())
}
