// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Constants
//!
//! Numerical tolerances and fallbacks used across the calculation

/// Largest residual accepted when projecting a Cartesian momentum onto the
/// retained lattice directions
pub(crate) const LATTICE_PROJECTION_TOLERANCE: f64 = 1e-7;

/// Worker count used when the number of available cores cannot be determined
pub(crate) const FALLBACK_WORKER_COUNT: usize = 4;
