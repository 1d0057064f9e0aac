//! # Sweep
//!
//! The onsite-energy sweep: one worker task per sweep value, each writing
//! its own plain-text array below the run directory.
//!
//! The fan-out is embarrassingly parallel. Workers share nothing mutable:
//! every task receives one scalar onsite energy, builds its own result
//! arrays and writes to a file keyed by that value, so completion order
//! never matters. The run directory is created by the parent before the
//! pool starts. A failing task does not abort its siblings, the per-value
//! outcomes are collected into a [`SweepReport`] instead.

use crate::{
    berry::berry_curvature,
    constants::FALLBACK_WORKER_COUNT,
    error::{EvaluationError, SpectrumError},
    model::{Boundary, System},
    params::{Momentum, ParameterBundle},
    spectral::band_structure,
};
use miette::Diagnostic;
use ndarray::{Array1, Array2, ArrayView2, Axis, Ix2};
use rayon::prelude::*;
use std::f64::consts::PI;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Which calculation a sweep runs per onsite-energy value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pipeline {
    /// Band energies over the momentum grid, one file per band
    Bands,
    /// Berry curvature of the lowest band over the interior of the grid
    Berry,
}

impl Pipeline {
    fn subdirectories(&self) -> &'static [&'static str] {
        match self {
            Pipeline::Bands => &["pos", "neg"],
            Pipeline::Berry => &["berry"],
        }
    }
}

/// Errors raised by a sweep or one of its worker tasks
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SweepError {
    /// A Hamiltonian or curvature evaluation failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    /// A spectrum evaluation failed
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
    /// A file or directory could not be written
    #[error("IO failure: {0}")]
    Io(#[from] std::io::Error),
    /// The worker pool could not be constructed
    #[error("failed to build the worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    /// An array slice had an unexpected shape
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    /// A text array could not be parsed back
    #[error("malformed array text at line {line}: {reason}")]
    Malformed {
        /// One-based line number of the offending row
        line: usize,
        /// What went wrong on that line
        reason: String,
    },
}

/// Everything a sweep needs: resolutions, model constants and output layout
#[derive(Clone, Debug)]
pub struct SweepSettings {
    /// Number of points in the onsite-energy sweep
    pub mu_resolution: usize,
    /// Number of points along each momentum axis
    pub k_resolution: usize,
    /// Ribbon width, ignored for the infinite sheet
    pub width: usize,
    /// Boundary variant of the model
    pub boundary: Boundary,
    /// Nearest-neighbour hopping amplitude
    pub t: f64,
    /// Next-nearest-neighbour hopping amplitude
    pub t2: f64,
    /// Flux phase carried alongside the model parameters
    pub phi: f64,
    /// The onsite energy is swept over `[-onsite_limit, onsite_limit]`
    pub onsite_limit: f64,
    /// Momenta span `momentum_scale * [-π, π]` along each axis
    pub momentum_scale: f64,
    /// Directory the run directory is created beneath
    pub output_root: PathBuf,
    /// The calculation to run per sweep value
    pub pipeline: Pipeline,
}

impl SweepSettings {
    /// The run directory, named after every sweep and model constant
    pub fn run_directory(&self) -> PathBuf {
        self.output_root.join(format!(
            "muRes{}_kRes{}_width{}_boundary{}_t{:.2}_t2{:.2}",
            self.mu_resolution, self.k_resolution, self.width, self.boundary, self.t, self.t2
        ))
    }
}

/// The per-value outcomes of a sweep
#[derive(Debug)]
pub struct SweepReport {
    results: Vec<(f64, Result<(), SweepError>)>,
}

impl SweepReport {
    /// The number of sweep values that ran
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the sweep ran no values at all
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The number of sweep values that completed
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_ok())
            .count()
    }

    /// The sweep values that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (f64, &SweepError)> {
        self.results
            .iter()
            .filter_map(|(value, outcome)| outcome.as_ref().err().map(|error| (*value, error)))
    }

    /// Whether every sweep value failed
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.succeeded() == 0
    }
}

/// Run the onsite-energy sweep over a fixed-size worker pool
///
/// The pool is sized to the available cores, falling back to a default when
/// the core count cannot be determined. Output directories are created
/// before any worker starts, so the tasks only ever touch their own files.
pub fn run_sweep(system: &System, settings: &SweepSettings) -> Result<SweepReport, SweepError> {
    let onsite_values = Array1::linspace(
        -settings.onsite_limit,
        settings.onsite_limit,
        settings.mu_resolution,
    )
    .to_vec();
    let momenta = Array1::linspace(-PI, PI, settings.k_resolution)
        .mapv(|k| k * settings.momentum_scale)
        .to_vec();

    let directory = settings.run_directory();
    for subdirectory in settings.pipeline.subdirectories() {
        std::fs::create_dir_all(directory.join(subdirectory))?;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count())
        .build()?;
    tracing::info!(
        "sweeping {} onsite energies over {} workers",
        onsite_values.len(),
        pool.current_num_threads()
    );

    let results: Vec<(f64, Result<(), SweepError>)> = pool.install(|| {
        onsite_values
            .par_iter()
            .map(|&mu| (mu, run_single(system, settings, &directory, &momenta, mu)))
            .collect()
    });
    Ok(SweepReport { results })
}

fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKER_COUNT)
}

// One worker task: evaluate the pipeline at a single onsite energy and
// write the results keyed by that value.
fn run_single(
    system: &System,
    settings: &SweepSettings,
    directory: &Path,
    momenta: &[f64],
    mu: f64,
) -> Result<(), SweepError> {
    let params = ParameterBundle::default()
        .with_t(settings.t)
        .with_t2(settings.t2)
        .with_m(mu)
        .with_phi(settings.phi);

    match settings.pipeline {
        Pipeline::Bands => {
            let momentum = Momentum::default()
                .with_k_x(momenta.to_vec())
                .with_k_y(momenta.to_vec());
            let spectrum = band_structure(system, &params, &momentum, settings.k_resolution)?;
            let energies = spectrum.energies();
            let band_axis = Axis(energies.ndim() - 1);
            for (band, subdirectory) in [(0_usize, "pos"), (1, "neg")] {
                let slice = energies.index_axis(band_axis, band);
                // A ribbon dispersion has a single momentum axis, pad it to
                // a column so the text format stays two-dimensional
                let slice = if slice.ndim() == 1 {
                    slice.insert_axis(Axis(1))
                } else {
                    slice
                };
                write_array(
                    &directory.join(subdirectory).join(format!("mu{}.txt", mu)),
                    slice.into_dimensionality::<Ix2>()?,
                )?;
            }
        }
        Pipeline::Berry => {
            let curvature = berry_curvature(system, &params, momenta, momenta)?;
            write_array(
                &directory.join("berry").join(format!("mu{}.txt", mu)),
                curvature.index_axis(Axis(2), 0),
            )?;
        }
    }
    Ok(())
}

/// Write a real array as whitespace-delimited text, one row per line
pub fn write_array(path: &Path, array: ArrayView2<'_, f64>) -> Result<(), SweepError> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    for row in array.rows() {
        let line = row
            .iter()
            .map(|value| format!("{:.18e}", value))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(())
}

/// Read a whitespace-delimited text array back into memory
pub fn read_array(path: &Path) -> Result<Array2<f64>, SweepError> {
    let contents = std::fs::read_to_string(path)?;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|error| SweepError::Malformed {
                line: number + 1,
                reason: error.to_string(),
            })?;
        rows.push(row);
    }
    let columns = rows.first().map_or(0, Vec::len);
    if let Some(ragged) = rows.iter().position(|row| row.len() != columns) {
        return Err(SweepError::Malformed {
            line: ragged + 1,
            reason: format!("expected {} columns, got {}", columns, rows[ragged].len()),
        });
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((flat.len() / columns.max(1), columns), flat)?)
}
