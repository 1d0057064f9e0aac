use nalgebra::Vector2;

/// A lattice site, addressed by its sublattice index and integer cell
/// coordinates in the primitive-vector basis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Site {
    /// Index into the sublattice basis of the owning [`Bravais`](crate::Bravais)
    pub sublattice: usize,
    /// Cell coordinates in units of the primitive vectors
    pub cell: Vector2<i32>,
}

impl Site {
    /// Construct a site from a sublattice index and cell coordinates
    pub fn new(sublattice: usize, cell: Vector2<i32>) -> Self {
        Self { sublattice, cell }
    }

    /// The same site displaced by `offset` cells
    pub fn translated(&self, offset: &Vector2<i32>) -> Self {
        Self {
            sublattice: self.sublattice,
            cell: self.cell + offset,
        }
    }

    /// A hashable key identifying the site
    pub fn key(&self) -> (usize, i32, i32) {
        (self.sublattice, self.cell.x, self.cell.y)
    }
}

/// A directed hopping between two sublattices at a fixed relative cell offset
///
/// A kind describes a whole family of bonds: one for every cell of the
/// lattice. The Hermitian partner (reversed sublattices, negated offset) is
/// not stored, callers add the conjugate contribution themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoppingKind {
    /// Sublattice the hopping leaves from
    pub from: usize,
    /// Sublattice the hopping arrives at
    pub to: usize,
    /// Cell offset of the target relative to the source
    pub offset: Vector2<i32>,
}

impl HoppingKind {
    /// Construct a hopping kind
    pub fn new(from: usize, to: usize, offset: Vector2<i32>) -> Self {
        Self { from, to, offset }
    }

    /// The Hermitian partner of this kind
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            offset: -self.offset,
        }
    }

    /// Whether this kind is the canonical member of its Hermitian pair
    ///
    /// Exactly one of a kind and its reverse is canonical, so a list of
    /// canonical kinds contains each physical bond family once.
    pub fn is_canonical(&self) -> bool {
        (self.from, self.to, self.offset.x, self.offset.y)
            < (self.to, self.from, -self.offset.x, -self.offset.y)
    }
}
