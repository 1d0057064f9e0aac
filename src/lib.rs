// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Band structure and Berry curvature for the Haldane model.
//!
//! # Overview
//! The Haldane model decorates a honeycomb tight-binding lattice with a
//! staggered sublattice potential and a purely imaginary next-nearest
//! neighbour hopping which breaks time-reversal symmetry
//! ([Haldane 1988](https://doi.org/10.1103/PhysRevLett.61.2015)). This crate
//! builds the model on an infinite sheet or on zigzag and armchair ribbons,
//! evaluates the Bloch Hamiltonian over grids of parameters and momenta,
//! diagonalises it for the band energies and computes a gauge-invariant
//! link-variable Berry curvature for each band.
//!
//! # Usage
//! The binary sweeps the staggered onsite energy and writes one plain-text
//! array per sweep value:
//!
//! ```text
//! haldane-spectra <MU_RESOLUTION> <K_RESOLUTION> <WIDTH> -c bands -l info
//! ```
//!
//! Fixed physical constants are read from `.config/default.toml`:
//!
//! ```toml
//! [physical]
//! t = 1.0
//! t2 = 0.0
//! boundary = "infinite"
//! ```

#![warn(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::type_complexity)]

/// The command line global application, configuration and tracing
pub mod app;

/// Numerical tolerances and fallbacks
mod constants;

/// Berry curvature from wavefunction overlaps on a momentum grid
pub mod berry;

/// Error handling
pub mod error;

/// The Haldane model and its boundary variants
pub mod model;

/// Evaluation of the Bloch Hamiltonian over parameter and momentum grids
pub mod hamiltonian;

/// Scalar-or-sweep parameter bundles
pub mod params;

/// Band energies from the Hamiltonian grids
pub mod spectral;

/// The onsite-energy sweep: worker pool, output layout and text arrays
pub mod sweep;
