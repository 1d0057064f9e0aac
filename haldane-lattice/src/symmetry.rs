use crate::{Bravais, LatticeError, Site};
use nalgebra::{Matrix2, Vector2};

const INTEGER_TOLERANCE: f64 = 1e-9;

/// A single retained translation: its Cartesian vector and the equivalent
/// integer translation of the cell coordinates
#[derive(Clone, Copy, Debug)]
pub struct Period {
    vector: Vector2<f64>,
    cell_shift: Vector2<i32>,
}

impl Period {
    /// The Cartesian translation vector
    pub fn vector(&self) -> &Vector2<f64> {
        &self.vector
    }

    /// The translation expressed in cell coordinates
    pub fn cell_shift(&self) -> &Vector2<i32> {
        &self.cell_shift
    }
}

/// The translational symmetry retained by a system
///
/// Zero, one or two directions may survive: a finite flake keeps none, a
/// ribbon keeps one and the infinite bulk keeps both primitive vectors.
#[derive(Clone, Debug)]
pub struct TranslationalSymmetry {
    periods: Vec<Period>,
}

impl TranslationalSymmetry {
    /// No translations retained
    pub fn none() -> Self {
        Self {
            periods: Vec::new(),
        }
    }

    /// Both primitive vectors retained: the infinite bulk
    pub fn full(lattice: &Bravais) -> Self {
        let primitive = lattice.primitive_vectors();
        Self {
            periods: vec![
                Period {
                    vector: primitive[0],
                    cell_shift: Vector2::new(1, 0),
                },
                Period {
                    vector: primitive[1],
                    cell_shift: Vector2::new(0, 1),
                },
            ],
        }
    }

    /// A single retained translation along `direction`
    ///
    /// The direction must itself be a lattice vector, otherwise cells could
    /// not be identified under the translation.
    pub fn along(lattice: &Bravais, direction: [f64; 2]) -> Result<Self, LatticeError> {
        let primitive = lattice.primitive_vectors();
        let cell_basis = Matrix2::from_columns(&[primitive[0], primitive[1]]);
        let target = Vector2::new(direction[0], direction[1]);
        let coefficients = cell_basis
            .try_inverse()
            .ok_or(LatticeError::DegeneratePrimitiveVectors)?
            * target;
        let rounded = Vector2::new(coefficients.x.round(), coefficients.y.round());
        if (coefficients - rounded).norm() > INTEGER_TOLERANCE {
            return Err(LatticeError::NotALatticeTranslation {
                x: direction[0],
                y: direction[1],
            });
        }
        Ok(Self {
            periods: vec![Period {
                vector: target,
                cell_shift: Vector2::new(rounded.x as i32, rounded.y as i32),
            }],
        })
    }

    /// The number of retained translational directions
    pub fn num_directions(&self) -> usize {
        self.periods.len()
    }

    /// The retained periods
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Reduce a site into the fundamental domain of the symmetry
    ///
    /// Returns the representative site together with the integer number of
    /// period translations removed along each retained direction. For one
    /// retained direction the representative has its position component
    /// along the period in `[0, |period|)`; for two the representative cell
    /// is reduced in cell coordinates.
    pub fn to_fundamental_domain(&self, lattice: &Bravais, site: Site) -> (Site, Vec<i32>) {
        match self.periods.len() {
            0 => (site, Vec::new()),
            1 => {
                let period = &self.periods[0];
                let position = lattice.position(&site);
                let along = position.dot(&period.vector) / period.vector.norm_squared();
                let hops = along.floor() as i32;
                (
                    Site::new(site.sublattice, site.cell - period.cell_shift * hops),
                    vec![hops],
                )
            }
            _ => {
                // Solve cell = m0 s0 + m1 s1 in the integer cell-shift basis
                let s0 = &self.periods[0].cell_shift;
                let s1 = &self.periods[1].cell_shift;
                let det = f64::from(s0.x * s1.y - s0.y * s1.x);
                let m0 = (f64::from(site.cell.x * s1.y - site.cell.y * s1.x) / det).floor() as i32;
                let m1 = (f64::from(s0.x * site.cell.y - s0.y * site.cell.x) / det).floor() as i32;
                (
                    Site::new(site.sublattice, site.cell - s0 * m0 - s1 * m1),
                    vec![m0, m1],
                )
            }
        }
    }
}
