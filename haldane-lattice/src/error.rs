/// Errors raised when constructing lattice geometry
#[derive(thiserror::Error, Debug)]
pub enum LatticeError {
    /// A primitive vector or basis offset had the wrong number of components
    #[error("{what} must have exactly two components, got {len}")]
    NotTwoDimensional {
        /// Which input was malformed
        what: &'static str,
        /// The number of components that were provided
        len: usize,
    },
    /// The primitive vectors do not span the plane
    #[error("primitive vectors are linearly dependent")]
    DegeneratePrimitiveVectors,
    /// A requested translation direction is not a lattice vector
    #[error("({x}, {y}) is not a lattice translation")]
    NotALatticeTranslation {
        /// First Cartesian component of the requested direction
        x: f64,
        /// Second Cartesian component of the requested direction
        y: f64,
    },
}
