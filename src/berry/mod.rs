//! # Berry
//!
//! Discretised Berry curvature from wavefunction overlaps on a momentum
//! grid.
//!
//! The curvature is evaluated with link variables in the manner of
//! [Fukui, Hatsugai and Suzuki](https://doi.org/10.1143/JPSJ.74.1674): at
//! every interior grid point the four neighbouring eigenvectors span a
//! diamond plaquette, each edge carries the normalised overlap
//! `⟨ψ(k)|ψ(k+δ)⟩` and the curvature is the phase of the loop product
//! divided by the plaquette area. Arbitrary per-point eigenvector phases
//! cancel around the closed loop, so the result is gauge invariant by
//! construction.
//!
//! Near a band touching the individual-band curvature is ill-defined: the
//! eigensolver assigns the degenerate subspace arbitrarily and the link
//! variables lose their meaning. Values computed across a degeneracy are
//! finite but carry no physical content, which is a limitation of any
//! per-band discretisation.

use crate::{
    error::EvaluationError,
    hamiltonian::hamiltonian_array,
    model::System,
    params::{Momentum, ParameterBundle},
};
use ndarray::{s, Array3, Array4, ArrayView1};
use ndarray_linalg::{Eigh, UPLO};
use num_complex::Complex64;

/// The Berry curvature of every band over the interior of a momentum grid
///
/// Returns an array of shape `(len(k_x) - 2, len(k_y) - 2, bands)`: the
/// boundary points are excluded because the stencil needs neighbours on all
/// four sides. The parameter bundle must be fully fixed, the momentum grid
/// is the only thing swept here.
pub fn berry_curvature(
    system: &System,
    params: &ParameterBundle,
    k_x: &[f64],
    k_y: &[f64],
) -> Result<Array3<f64>, EvaluationError> {
    if let Some((name, _)) = params.swept().into_iter().next() {
        return Err(EvaluationError::SweptParameter(name));
    }
    if k_x.len() < 3 || k_y.len() < 3 {
        return Err(EvaluationError::GridTooCoarse);
    }

    let momentum = Momentum::default()
        .with_k_x(k_x.to_vec())
        .with_k_y(k_y.to_vec());
    let grid = hamiltonian_array(system, params, &momentum)?;
    let n = grid.matrix_dim();
    let (nx, ny) = (k_x.len(), k_y.len());

    // Eigenvectors at every grid point, bands in the columns
    let stacked = grid.data().into_shape((nx * ny, n, n))?;
    let mut vectors = Array4::<Complex64>::zeros((nx, ny, n, n));
    for (index, matrix) in stacked.outer_iter().enumerate() {
        let (_, eigenvectors) = matrix.eigh(UPLO::Lower)?;
        vectors
            .slice_mut(s![index / ny, index % ny, .., ..])
            .assign(&eigenvectors);
    }

    let mut curvature = Array3::<f64>::zeros((nx - 2, ny - 2, n));
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            // The diamond through the four neighbours has half the area of
            // the rectangle spanned by its diagonals
            let area = 0.5 * (k_x[i + 1] - k_x[i - 1]) * (k_y[j + 1] - k_y[j - 1]);
            for band in 0..n {
                let left = vectors.slice(s![i - 1, j, .., band]);
                let bottom = vectors.slice(s![i, j - 1, .., band]);
                let right = vectors.slice(s![i + 1, j, .., band]);
                let top = vectors.slice(s![i, j + 1, .., band]);
                let holonomy = link(&left, &bottom)
                    * link(&bottom, &right)
                    * link(&right, &top)
                    * link(&top, &left);
                curvature[[i - 1, j - 1, band]] = -holonomy.arg() / area;
            }
        }
    }
    Ok(curvature)
}

// The normalised link variable between two eigenvectors. Only the phase
// matters for the loop product, the modulus is stripped to keep the
// logarithm on the unit circle.
fn link(from: &ArrayView1<Complex64>, to: &ArrayView1<Complex64>) -> Complex64 {
    let overlap: Complex64 = from
        .iter()
        .zip(to.iter())
        .map(|(a, b)| a.conj() * b)
        .sum();
    let modulus = overlap.norm();
    if modulus > 0.0 {
        overlap / modulus
    } else {
        overlap
    }
}
