use crate::{HoppingKind, LatticeError, Site};
use nalgebra::Vector2;

// Bonds longer than this window never compete for the nearest-neighbour
// distance on a sensible lattice
const NEIGHBOUR_SEARCH_WINDOW: i32 = 2;
const DISTANCE_TOLERANCE: f64 = 1e-9;

/// A two-dimensional Bravais lattice with a sublattice basis
///
/// Input vectors are taken as runtime-sized slices so that malformed
/// geometry is caught at construction rather than by the type system.
#[derive(Clone, Debug)]
pub struct Bravais {
    primitive: [Vector2<f64>; 2],
    basis: Vec<Vector2<f64>>,
}

impl Bravais {
    /// Build a lattice from raw primitive vectors and sublattice offsets
    ///
    /// Fails if there are not exactly two primitive vectors, if any vector
    /// or offset does not have exactly two components, or if the primitive
    /// vectors are linearly dependent.
    pub fn try_new(primitive: &[Vec<f64>], basis: &[Vec<f64>]) -> Result<Self, LatticeError> {
        if primitive.len() != 2 {
            return Err(LatticeError::NotTwoDimensional {
                what: "the primitive vector set",
                len: primitive.len(),
            });
        }
        for vector in primitive {
            if vector.len() != 2 {
                return Err(LatticeError::NotTwoDimensional {
                    what: "a primitive vector",
                    len: vector.len(),
                });
            }
        }
        for offset in basis {
            if offset.len() != 2 {
                return Err(LatticeError::NotTwoDimensional {
                    what: "a basis offset",
                    len: offset.len(),
                });
            }
        }
        let primitive = [
            Vector2::new(primitive[0][0], primitive[0][1]),
            Vector2::new(primitive[1][0], primitive[1][1]),
        ];
        let det = primitive[0].x * primitive[1].y - primitive[0].y * primitive[1].x;
        if det.abs() < DISTANCE_TOLERANCE {
            return Err(LatticeError::DegeneratePrimitiveVectors);
        }
        let basis = basis.iter().map(|v| Vector2::new(v[0], v[1])).collect();
        Ok(Self { primitive, basis })
    }

    /// The two primitive vectors
    pub fn primitive_vectors(&self) -> &[Vector2<f64>; 2] {
        &self.primitive
    }

    /// The number of sublattices in the basis
    pub fn num_sublattices(&self) -> usize {
        self.basis.len()
    }

    /// The Cartesian offset of sublattice `sublattice` inside the unit cell
    pub fn sublattice_offset(&self, sublattice: usize) -> &Vector2<f64> {
        &self.basis[sublattice]
    }

    /// The Cartesian displacement of a cell offset
    pub fn cell_vector(&self, cell: &Vector2<i32>) -> Vector2<f64> {
        self.primitive[0] * f64::from(cell.x) + self.primitive[1] * f64::from(cell.y)
    }

    /// The Cartesian position of a site
    pub fn position(&self, site: &Site) -> Vector2<f64> {
        self.cell_vector(&site.cell) + self.basis[site.sublattice]
    }

    /// Derive the nearest-neighbour hopping kinds geometrically
    ///
    /// Scans cell offsets in a small window around the origin, finds the
    /// minimal inter-site distance over all sublattice pairs, and returns
    /// one canonical kind per bond family at that distance.
    pub fn nearest_neighbour_kinds(&self) -> Vec<HoppingKind> {
        let mut shortest = f64::INFINITY;
        let mut kinds: Vec<HoppingKind> = Vec::new();
        for from in 0..self.basis.len() {
            for to in 0..self.basis.len() {
                for n1 in -NEIGHBOUR_SEARCH_WINDOW..=NEIGHBOUR_SEARCH_WINDOW {
                    for n2 in -NEIGHBOUR_SEARCH_WINDOW..=NEIGHBOUR_SEARCH_WINDOW {
                        if from == to && n1 == 0 && n2 == 0 {
                            continue;
                        }
                        let offset = Vector2::new(n1, n2);
                        let displacement =
                            self.cell_vector(&offset) + self.basis[to] - self.basis[from];
                        let distance = displacement.norm();
                        if distance < shortest - DISTANCE_TOLERANCE {
                            shortest = distance;
                            kinds.clear();
                        }
                        if (distance - shortest).abs() < DISTANCE_TOLERANCE {
                            kinds.push(HoppingKind::new(from, to, offset));
                        }
                    }
                }
            }
        }
        kinds.retain(HoppingKind::is_canonical);
        kinds
    }
}

#[cfg(test)]
mod test {
    use super::Bravais;

    fn honeycomb() -> Bravais {
        let primitive = vec![vec![1.0, 0.0], vec![0.5, 3_f64.sqrt() / 2.0]];
        let basis = vec![vec![0.0, 0.0], vec![0.0, 1.0 / 3_f64.sqrt()]];
        Bravais::try_new(&primitive, &basis).unwrap()
    }

    #[test]
    fn honeycomb_has_three_nearest_neighbour_bond_families() {
        let lattice = honeycomb();
        let kinds = lattice.nearest_neighbour_kinds();
        assert_eq!(kinds.len(), 3);
        // All bonds connect the two different sublattices
        assert!(kinds.iter().all(|kind| kind.from != kind.to));
    }

    #[test]
    fn three_component_primitive_vector_is_rejected() {
        let primitive = vec![vec![1.0, 0.0, 0.0], vec![0.5, 3_f64.sqrt() / 2.0]];
        let basis = vec![vec![0.0, 0.0]];
        assert!(Bravais::try_new(&primitive, &basis).is_err());
    }

    #[test]
    fn one_component_basis_offset_is_rejected() {
        let primitive = vec![vec![1.0, 0.0], vec![0.5, 3_f64.sqrt() / 2.0]];
        let basis = vec![vec![0.0, 0.0], vec![0.5]];
        assert!(Bravais::try_new(&primitive, &basis).is_err());
    }

    #[test]
    fn parallel_primitive_vectors_are_rejected() {
        let primitive = vec![vec![1.0, 0.0], vec![2.0, 0.0]];
        let basis = vec![vec![0.0, 0.0]];
        assert!(Bravais::try_new(&primitive, &basis).is_err());
    }
}
