//! # Hamiltonian
//!
//! Evaluates the Bloch Hamiltonian of a finalised [`System`] over a grid of
//! parameters and momenta.
//!
//! Momenta arrive in Cartesian coordinates and are mapped onto the retained
//! lattice directions first: a closed system needs no momentum, a ribbon
//! takes `k_x` directly as its lattice momentum, and the infinite sheet
//! projects the momentum vector onto the primitive vectors through a
//! least-squares pseudo-inverse. Every sequence-valued parameter or momentum
//! component opens a sweep axis; axes are ordered alphabetically by name and
//! the Hamiltonian is evaluated over their Cartesian product:
//!
//! ```ignore
//! let grid = hamiltonian_array(
//!     &system,
//!     &ParameterBundle::default().with_t(1.0).with_m(vec![-0.25, 0.0, 0.25]),
//!     &Momentum::default().with_k_x(k.clone()).with_k_y(k),
//! )?;
//! ```

use crate::{
    constants::LATTICE_PROJECTION_TOLERANCE,
    error::EvaluationError,
    model::System,
    params::{AxisValue, Momentum, ParameterBundle, ParameterValues},
};
use haldane_lattice::TranslationalSymmetry;
use itertools::Itertools;
use nalgebra::{Matrix2, Vector2};
use ndarray::{Array2, ArrayD, ArrayViewD, Axis, Ix2, IxDyn};
use num_complex::Complex64;
use std::collections::BTreeMap;

/// One swept axis of a grid: its name and the values it takes
#[derive(Clone, Debug)]
pub struct SweepAxis {
    /// The axis name, a parameter field or reserved momentum name
    pub name: &'static str,
    /// The values the axis runs over
    pub values: Vec<f64>,
}

/// A grid of dense Bloch Hamiltonians
///
/// The leading axes correspond to the swept axes in alphabetical order of
/// their names, the trailing two axes are the matrix itself. When nothing is
/// swept the grid holds a single entry so downstream shapes stay uniform.
#[derive(Clone, Debug)]
pub struct HamiltonianGrid {
    pub(crate) data: ArrayD<Complex64>,
    pub(crate) axes: Vec<SweepAxis>,
}

impl HamiltonianGrid {
    /// A view of the Hamiltonian data
    pub fn data(&self) -> ArrayViewD<'_, Complex64> {
        self.data.view()
    }

    /// The swept axes, alphabetically ordered
    pub fn axes(&self) -> &[SweepAxis] {
        &self.axes
    }

    /// The dimension of each Bloch matrix
    pub fn matrix_dim(&self) -> usize {
        self.data.shape()[self.data.ndim() - 1]
    }
}

// How Cartesian momenta turn into phases on the retained lattice directions
enum MomentumMap {
    // No translations retained, no momentum needed
    Closed,
    // One translation: k_x passes through as the lattice momentum
    Direct,
    // Two translations: least-squares projection onto the period basis
    Projected { operator: Matrix2<f64> },
}

impl MomentumMap {
    fn new(symmetry: &TranslationalSymmetry) -> Result<Self, EvaluationError> {
        match symmetry.num_directions() {
            0 => Ok(MomentumMap::Closed),
            1 => Ok(MomentumMap::Direct),
            _ => {
                let periods = symmetry.periods();
                let basis =
                    Matrix2::from_columns(&[*periods[0].vector(), *periods[1].vector()]);
                let gram_inverse = (basis.transpose() * basis)
                    .try_inverse()
                    .ok_or(EvaluationError::DegenerateLattice)?;
                Ok(MomentumMap::Projected {
                    operator: basis * gram_inverse,
                })
            }
        }
    }

    fn lattice_momenta(&self, k: [f64; 3]) -> Result<Vec<f64>, EvaluationError> {
        match self {
            MomentumMap::Closed => Ok(Vec::new()),
            MomentumMap::Direct => {
                if k[1] != 0.0 || k[2] != 0.0 {
                    return Err(EvaluationError::TransverseMomentum);
                }
                Ok(vec![k[0]])
            }
            MomentumMap::Projected { operator } => {
                // The ambient space is two-dimensional, k_z does not enter
                let rhs = Vector2::new(k[0], k[1]);
                let decomposition = operator.svd(true, true);
                let solution = decomposition
                    .solve(&rhs, f64::EPSILON)
                    .map_err(|_| EvaluationError::DegenerateLattice)?;
                let residual = (operator * solution - rhs).norm();
                if residual > LATTICE_PROJECTION_TOLERANCE {
                    return Err(EvaluationError::OffLattice { residual });
                }
                Ok(vec![solution.x, solution.y])
            }
        }
    }
}

/// Evaluate the Hamiltonian of a system over a grid of parameters
///
/// Sequence-valued fields of `params` and sequence-valued momentum
/// components are swept; the remaining components are held fixed. The
/// returned grid carries the swept axes in alphabetical order.
pub fn hamiltonian_array(
    system: &System,
    params: &ParameterBundle,
    momentum: &Momentum,
) -> Result<HamiltonianGrid, EvaluationError> {
    let map = MomentumMap::new(system.symmetry())?;

    let mut axes: Vec<SweepAxis> = params
        .swept()
        .into_iter()
        .map(|(name, values)| SweepAxis {
            name,
            values: values.to_vec(),
        })
        .collect();
    for (name, component) in momentum.fields() {
        if let Some(values) = component.and_then(AxisValue::sweep_values) {
            axes.push(SweepAxis {
                name,
                values: values.to_vec(),
            });
        }
    }
    axes.sort_by(|left, right| left.name.cmp(right.name));

    let n = system.num_sites();
    let fixed_momentum = |index: usize| {
        momentum
            .component(index)
            .map(AxisValue::fixed_value)
            .unwrap_or(0.0)
    };

    if axes.is_empty() {
        let k = [fixed_momentum(0), fixed_momentum(1), fixed_momentum(2)];
        let matrix = evaluate_single(
            system,
            &params.resolve(&BTreeMap::new()),
            &map.lattice_momenta(k)?,
        );
        let data = ArrayD::from_shape_vec(IxDyn(&[1, n, n]), matrix.into_raw_vec())?;
        return Ok(HamiltonianGrid { data, axes });
    }

    let mut matrices: Vec<Array2<Complex64>> = Vec::new();
    for combination in axes
        .iter()
        .map(|axis| axis.values.iter().copied())
        .multi_cartesian_product()
    {
        let assignment: BTreeMap<&str, f64> = axes
            .iter()
            .map(|axis| axis.name)
            .zip(combination)
            .collect();
        let k = [
            assignment
                .get("k_x")
                .copied()
                .unwrap_or_else(|| fixed_momentum(0)),
            assignment
                .get("k_y")
                .copied()
                .unwrap_or_else(|| fixed_momentum(1)),
            assignment
                .get("k_z")
                .copied()
                .unwrap_or_else(|| fixed_momentum(2)),
        ];
        matrices.push(evaluate_single(
            system,
            &params.resolve(&assignment),
            &map.lattice_momenta(k)?,
        ));
    }

    let mut shape: Vec<usize> = axes.iter().map(|axis| axis.values.len()).collect();
    shape.push(n);
    shape.push(n);
    let flat: Vec<Complex64> = matrices
        .into_iter()
        .flat_map(Array2::into_raw_vec)
        .collect();
    let data = ArrayD::from_shape_vec(IxDyn(&shape), flat)?;
    Ok(HamiltonianGrid { data, axes })
}

/// The Hamiltonian of a one-dimensional system at a single lattice momentum
pub fn h_k(
    system: &System,
    params: &ParameterBundle,
    momentum: f64,
) -> Result<Array2<Complex64>, EvaluationError> {
    let grid = hamiltonian_array(system, params, &Momentum::default().with_k_x(momentum))?;
    Ok(grid
        .data
        .index_axis(Axis(0), 0)
        .to_owned()
        .into_dimensionality::<Ix2>()?)
}

// Assemble the dense Bloch matrix at one point of the grid. Every stored
// bond contributes together with its Hermitian conjugate, so the matrix is
// Hermitian for any real momentum.
fn evaluate_single(
    system: &System,
    values: &ParameterValues,
    lattice_momenta: &[f64],
) -> Array2<Complex64> {
    let n = system.num_sites();
    let mut matrix = Array2::<Complex64>::zeros((n, n));
    for index in 0..n {
        matrix[[index, index]] = Complex64::new(system.onsite_energy(index, values), 0.0);
    }
    for bond in system.bonds() {
        let phase: f64 = bond
            .hops
            .iter()
            .zip(lattice_momenta)
            .map(|(&hops, &k)| f64::from(hops) * k)
            .sum();
        let value = system.bond_amplitude(bond.kind, values) * Complex64::from_polar(1.0, phase);
        matrix[[bond.from, bond.to]] += value;
        matrix[[bond.to, bond.from]] += value.conj();
    }
    matrix
}

#[cfg(test)]
mod test {
    use super::hamiltonian_array;
    use crate::{
        error::EvaluationError,
        model::{Boundary, ModelBuilder, System},
        params::{Momentum, ParameterBundle},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;
    use num_complex::Complex64;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn bulk() -> System {
        ModelBuilder::default()
            .with_boundary(Boundary::Infinite)
            .build()
            .unwrap()
    }

    fn single_matrix(system: &System, params: &ParameterBundle, kx: f64, ky: f64) -> Array2<Complex64> {
        let grid = hamiltonian_array(
            system,
            params,
            &Momentum::default().with_k_x(kx).with_k_y(ky),
        )
        .unwrap();
        grid.data()
            .index_axis(ndarray::Axis(0), 0)
            .to_owned()
            .into_dimensionality::<ndarray::Ix2>()
            .unwrap()
    }

    #[test]
    fn bloch_matrix_is_hermitian_at_random_momenta() {
        let system = bulk();
        let params = ParameterBundle::default()
            .with_t(1.0)
            .with_t2(0.2)
            .with_m(0.3);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..24 {
            let kx = rng.gen_range(-5.0..5.0);
            let ky = rng.gen_range(-5.0..5.0);
            let matrix = single_matrix(&system, &params, kx, ky);
            for i in 0..2 {
                for j in 0..2 {
                    let conjugated = matrix[[j, i]].conj();
                    assert_abs_diff_eq!(matrix[[i, j]].re, conjugated.re, epsilon = 1e-12);
                    assert_abs_diff_eq!(matrix[[i, j]].im, conjugated.im, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn without_flux_negating_momentum_conjugates_the_matrix() {
        let system = bulk();
        let params = ParameterBundle::default().with_t(1.0).with_m(0.1);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..12 {
            let kx = rng.gen_range(-4.0..4.0);
            let ky = rng.gen_range(-4.0..4.0);
            let forward = single_matrix(&system, &params, kx, ky);
            let backward = single_matrix(&system, &params, -kx, -ky);
            for i in 0..2 {
                for j in 0..2 {
                    let conjugated = forward[[i, j]].conj();
                    assert_abs_diff_eq!(backward[[i, j]].re, conjugated.re, epsilon = 1e-12);
                    assert_abs_diff_eq!(backward[[i, j]].im, conjugated.im, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn without_flux_and_mass_the_diagonal_vanishes() {
        let system = bulk();
        let params = ParameterBundle::default().with_t(1.0);
        let matrix = single_matrix(&system, &params, 0.7, -1.3);
        assert_abs_diff_eq!(matrix[[0, 0]].norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(matrix[[1, 1]].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn a_single_swept_parameter_opens_one_leading_axis() {
        let system = bulk();
        let params = ParameterBundle::default()
            .with_t(1.0)
            .with_m(vec![-0.2, -0.1, 0.0, 0.1]);
        let grid = hamiltonian_array(&system, &params, &Momentum::default()).unwrap();
        assert_eq!(grid.data().shape(), &[4, 2, 2]);
        assert_eq!(grid.axes().len(), 1);
        assert_eq!(grid.axes()[0].name, "m");
    }

    #[test]
    fn swept_axes_are_ordered_alphabetically() {
        let system = bulk();
        let params = ParameterBundle::default()
            .with_t(1.0)
            .with_m(vec![-0.25, 0.0, 0.25]);
        let momentum = Momentum::default().with_k_x(vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        let grid = hamiltonian_array(&system, &params, &momentum).unwrap();
        assert_eq!(grid.data().shape(), &[5, 3, 2, 2]);
        assert_eq!(grid.axes()[0].name, "k_x");
        assert_eq!(grid.axes()[1].name, "m");
    }

    #[test]
    fn a_fixed_point_still_returns_a_single_entry_grid() {
        let system = bulk();
        let params = ParameterBundle::default().with_t(1.0).with_m(0.2);
        let grid = hamiltonian_array(
            &system,
            &params,
            &Momentum::default().with_k_x(0.3).with_k_y(-0.4),
        )
        .unwrap();
        assert_eq!(grid.data().shape(), &[1, 2, 2]);
        assert!(grid.axes().is_empty());
    }

    #[test]
    fn transverse_momentum_on_a_ribbon_is_rejected() {
        let system = ModelBuilder::default()
            .with_width(2)
            .with_boundary(Boundary::Zigzag)
            .build()
            .unwrap();
        let params = ParameterBundle::default().with_t(1.0);
        let result = hamiltonian_array(
            &system,
            &params,
            &Momentum::default().with_k_x(0.5).with_k_y(1.0),
        );
        assert!(matches!(
            result,
            Err(EvaluationError::TransverseMomentum)
        ));
    }
}
