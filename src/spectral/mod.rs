//! # Spectral
//!
//! Band energies from grids of Bloch Hamiltonians.
//!
//! The dense Hermitian eigensolve runs independently over the trailing
//! matrix axes of a [`HamiltonianGrid`], batched across all swept axes, with
//! eigenvalues in ascending order at every point. [`band_structure`] is the
//! plot-oriented entry point: it fills unspecified momenta with a default
//! window over every retained translational direction and only admits one or
//! two swept axes, the shapes a dispersion plot can actually show. The raw
//! [`eigenvalues`] path carries no such restriction.

use crate::{
    error::{EvaluationError, SpectrumError},
    hamiltonian::{hamiltonian_array, HamiltonianGrid, SweepAxis},
    model::System,
    params::{AxisValue, Momentum, ParameterBundle},
};
use ndarray::{Array1, ArrayD, ArrayViewD, IxDyn};
use ndarray_linalg::{Eigh, UPLO};
use std::f64::consts::PI;

/// Band energies over a grid of swept axes
///
/// The leading axes mirror the Hamiltonian grid the spectrum came from; the
/// trailing axis indexes the bands in ascending energy order.
#[derive(Clone, Debug)]
pub struct SpectrumGrid {
    pub(crate) energies: ArrayD<f64>,
    pub(crate) axes: Vec<SweepAxis>,
}

impl SpectrumGrid {
    /// A view of the band energies
    pub fn energies(&self) -> ArrayViewD<'_, f64> {
        self.energies.view()
    }

    /// The swept axes, alphabetically ordered
    pub fn axes(&self) -> &[SweepAxis] {
        &self.axes
    }

    /// The number of bands at each grid point
    pub fn num_bands(&self) -> usize {
        self.energies.shape()[self.energies.ndim() - 1]
    }
}

/// Diagonalise every matrix of a Hamiltonian grid
///
/// The eigensolve is applied over the trailing two axes; the band axis
/// replaces them in the output.
pub fn eigenvalues(grid: &HamiltonianGrid) -> Result<SpectrumGrid, EvaluationError> {
    let n = grid.matrix_dim();
    let shape = grid.data().shape().to_vec();
    let leading = &shape[..shape.len() - 2];
    let points: usize = leading.iter().product();

    let stacked = grid.data().into_shape((points, n, n))?;
    let mut energies = Vec::with_capacity(points * n);
    for matrix in stacked.outer_iter() {
        let (values, _) = matrix.eigh(UPLO::Lower)?;
        energies.extend(values.iter().copied());
    }

    let mut output_shape = leading.to_vec();
    output_shape.push(n);
    Ok(SpectrumGrid {
        energies: ArrayD::from_shape_vec(IxDyn(&output_shape), energies)?,
        axes: grid.axes().to_vec(),
    })
}

/// The spectrum of a system over one or two swept axes
///
/// Momentum components left unset default to `resolution` points over
/// `[-π, π]` for every retained translational direction; components beyond
/// the system's dimensionality are forced to zero and ignored. Requesting
/// zero swept axes, or more than two, is an error: this entry point serves
/// dispersion visualisation, use [`hamiltonian_array`] and [`eigenvalues`]
/// directly for higher-dimensional grids.
pub fn band_structure(
    system: &System,
    params: &ParameterBundle,
    momentum: &Momentum,
    resolution: usize,
) -> Result<SpectrumGrid, SpectrumError> {
    let momentum = with_default_momenta(system, momentum, resolution);
    let grid = hamiltonian_array(system, params, &momentum)?;
    match grid.axes().len() {
        0 => Err(SpectrumError::ZeroAxes),
        1 | 2 => Ok(eigenvalues(&grid)?),
        axes => Err(SpectrumError::TooManyAxes(axes)),
    }
}

// Fill unspecified momenta with the default window and zero the components
// beyond the system's dimensionality.
fn with_default_momenta(system: &System, momentum: &Momentum, resolution: usize) -> Momentum {
    let directions = system.symmetry().num_directions();
    let mut filled = Momentum::default();
    for index in 0..3 {
        let component = if index < directions {
            match momentum.component(index) {
                Some(value) => value.clone(),
                None => AxisValue::Sweep(Array1::linspace(-PI, PI, resolution).to_vec()),
            }
        } else {
            AxisValue::Scalar(0.0)
        };
        filled = match index {
            0 => filled.with_k_x(component),
            1 => filled.with_k_y(component),
            _ => filled.with_k_z(component),
        };
    }
    filled
}

#[cfg(test)]
mod test {
    use super::{band_structure, eigenvalues};
    use crate::{
        error::SpectrumError,
        hamiltonian::hamiltonian_array,
        model::{Boundary, ModelBuilder, System},
        params::{Momentum, ParameterBundle},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;
    use std::f64::consts::PI;

    fn bulk() -> System {
        ModelBuilder::default()
            .with_boundary(Boundary::Infinite)
            .build()
            .unwrap()
    }

    fn window(points: usize) -> Vec<f64> {
        Array1::linspace(-PI, PI, points)
            .mapv(|k| 4.0 / 3.0 * k)
            .to_vec()
    }

    #[test]
    fn bands_come_out_ascending_on_a_two_axis_grid() {
        let system = bulk();
        let params = ParameterBundle::default().with_t(1.0).with_m(0.1);
        let momentum = Momentum::default()
            .with_k_x(window(7))
            .with_k_y(window(5));
        let spectrum = band_structure(&system, &params, &momentum, 7).unwrap();
        let energies = spectrum.energies();
        assert_eq!(energies.shape(), &[7, 5, 2]);
        for i in 0..7 {
            for j in 0..5 {
                assert!(energies[[i, j, 0]] <= energies[[i, j, 1]]);
            }
        }
    }

    #[test]
    fn bare_honeycomb_bands_are_particle_hole_symmetric() {
        let system = bulk();
        let params = ParameterBundle::default().with_t(1.0);
        let momentum = Momentum::default().with_k_x(window(9)).with_k_y(0.7);
        let grid = hamiltonian_array(&system, &params, &momentum).unwrap();
        let spectrum = eigenvalues(&grid).unwrap();
        let energies = spectrum.energies();
        for i in 0..9 {
            assert_abs_diff_eq!(energies[[i, 0]], -energies[[i, 1]], epsilon = 1e-12);
        }
    }

    #[test]
    fn zigzag_ribbon_spectrum_is_symmetric_about_zero() {
        let system = ModelBuilder::default()
            .with_width(4)
            .with_boundary(Boundary::Zigzag)
            .build()
            .unwrap();
        assert_eq!(system.num_sites(), 10);
        let params = ParameterBundle::default().with_t(1.0);
        let grid =
            hamiltonian_array(&system, &params, &Momentum::default().with_k_x(0.0)).unwrap();
        // Without flux the matrix at k = 0 is real
        let matrix = grid.data();
        assert!(matrix.iter().all(|entry| entry.im.abs() < 1e-12));
        let spectrum = eigenvalues(&grid).unwrap();
        let energies = spectrum.energies();
        let bands = spectrum.num_bands();
        for band in 0..bands {
            assert_abs_diff_eq!(
                energies[[0, band]],
                -energies[[0, bands - 1 - band]],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn unset_momenta_default_to_a_window_over_each_retained_direction() {
        let system = ModelBuilder::default()
            .with_width(3)
            .with_boundary(Boundary::Zigzag)
            .build()
            .unwrap();
        let params = ParameterBundle::default().with_t(1.0);
        let spectrum = band_structure(&system, &params, &Momentum::default(), 11).unwrap();
        assert_eq!(spectrum.axes().len(), 1);
        assert_eq!(spectrum.axes()[0].name, "k_x");
        assert_eq!(spectrum.energies().shape(), &[11, 8]);
    }

    #[test]
    fn three_swept_axes_are_rejected() {
        let system = bulk();
        let params = ParameterBundle::default()
            .with_t(1.0)
            .with_m(vec![-0.25, 0.0, 0.25]);
        let momentum = Momentum::default()
            .with_k_x(window(5))
            .with_k_y(window(5));
        let result = band_structure(&system, &params, &momentum, 5);
        assert!(matches!(result, Err(SpectrumError::TooManyAxes(3))));
    }

    #[test]
    fn a_fully_fixed_point_is_rejected() {
        let system = bulk();
        let params = ParameterBundle::default().with_t(1.0);
        let momentum = Momentum::default().with_k_x(0.0).with_k_y(0.0);
        let result = band_structure(&system, &params, &momentum, 5);
        assert!(matches!(result, Err(SpectrumError::ZeroAxes)));
    }
}
