//! # Model
//!
//! The Haldane model on a honeycomb lattice: a staggered onsite energy ±m, a
//! real nearest-neighbour hopping t and a purely imaginary next-nearest
//! neighbour hopping i·t2 threading opposite flux through the two
//! sublattices. A [`ModelBuilder`] assembles the model for one of three
//! boundary variants and finalises it into a [`System`] holding the site
//! basis and the directed bond list the evaluator walks:
//!
//! ```ignore
//! let system = ModelBuilder::default()
//!     .with_width(4)
//!     .with_boundary(Boundary::Zigzag)
//!     .build()?;
//! ```

use crate::{
    error::BuildError,
    params::ParameterValues,
};
use haldane_lattice::{fill, Bravais, HoppingKind, Site, TranslationalSymmetry};
use nalgebra::Vector2;
use num_complex::Complex64;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// The boundary variants of the model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// A ribbon cut along the zigzag edge, periodic along (1, 0)
    Zigzag,
    /// A ribbon cut along the armchair edge, periodic along (0, √3)
    Armchair,
    /// The infinite sheet, periodic along both primitive vectors
    Infinite,
}

impl From<&str> for Boundary {
    // Any string other than the two ribbon cuts means the infinite sheet
    fn from(name: &str) -> Self {
        match name {
            "zigzag" => Boundary::Zigzag,
            "armchair" => Boundary::Armchair,
            _ => Boundary::Infinite,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Zigzag => write!(f, "zigzag"),
            Boundary::Armchair => write!(f, "armchair"),
            Boundary::Infinite => write!(f, "infinite"),
        }
    }
}

impl<'de> Deserialize<'de> for Boundary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Boundary::from(name.as_str()))
    }
}

/// The default primitive vectors of the honeycomb lattice
pub fn default_primitive_vectors() -> Vec<Vec<f64>> {
    vec![vec![1.0, 0.0], vec![0.5, 3_f64.sqrt() / 2.0]]
}

/// The default sublattice offsets of the honeycomb lattice
pub fn default_basis_offsets() -> Vec<Vec<f64>> {
    vec![vec![0.0, 0.0], vec![0.0, 1.0 / 3_f64.sqrt()]]
}

// The six next-nearest-neighbour bond families of the Haldane model. The
// offsets are oriented so the flux threads the two sublattices in opposite
// senses.
fn next_nearest_neighbour_kinds() -> [HoppingKind; 6] {
    [
        HoppingKind::new(0, 0, Vector2::new(-1, 0)),
        HoppingKind::new(0, 0, Vector2::new(0, 1)),
        HoppingKind::new(0, 0, Vector2::new(1, -1)),
        HoppingKind::new(1, 1, Vector2::new(1, 0)),
        HoppingKind::new(1, 1, Vector2::new(0, -1)),
        HoppingKind::new(1, 1, Vector2::new(-1, 1)),
    ]
}

/// Which term of the model a bond carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BondKind {
    /// A nearest-neighbour bond between the two sublattices
    NearestNeighbour,
    /// A next-nearest-neighbour bond within one sublattice
    NextNearestNeighbour,
}

/// A directed bond between two basis sites of the finalised system
///
/// `hops` counts the period translations crossed along each retained
/// direction; the evaluator turns them into Bloch phases. Every bond also
/// contributes its Hermitian conjugate.
#[derive(Clone, Debug)]
pub struct Bond {
    /// Index of the source site in the basis
    pub from: usize,
    /// Index of the target site in the basis
    pub to: usize,
    /// Period translations crossed along each retained direction
    pub hops: Vec<i32>,
    /// The term this bond carries
    pub kind: BondKind,
}

/// A finalised model: lattice, retained symmetry, site basis and bond list
#[derive(Clone, Debug)]
pub struct System {
    lattice: Bravais,
    symmetry: TranslationalSymmetry,
    sites: Vec<Site>,
    bonds: Vec<Bond>,
}

impl System {
    /// The underlying Bravais lattice
    pub fn lattice(&self) -> &Bravais {
        &self.lattice
    }

    /// The retained translational symmetry
    pub fn symmetry(&self) -> &TranslationalSymmetry {
        &self.symmetry
    }

    /// The basis sites of the finalised system
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// The directed bonds between basis sites
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// The dimension of the Bloch Hamiltonian
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// The staggered sublattice potential at basis site `index`
    pub(crate) fn onsite_energy(&self, index: usize, p: &ParameterValues) -> f64 {
        if self.sites[index].sublattice == 0 {
            p.m
        } else {
            -p.m
        }
    }

    /// The hopping amplitude carried by a bond of the given kind
    pub(crate) fn bond_amplitude(&self, kind: BondKind, p: &ParameterValues) -> Complex64 {
        match kind {
            BondKind::NearestNeighbour => Complex64::new(p.t, 0.0),
            BondKind::NextNearestNeighbour => Complex64::new(0.0, p.t2),
        }
    }
}

/// Builder for a [`System`] from a width, boundary kind and lattice geometry
pub struct ModelBuilder {
    width: usize,
    boundary: Boundary,
    primitive_vectors: Vec<Vec<f64>>,
    basis_offsets: Vec<Vec<f64>>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            width: 20,
            boundary: Boundary::Zigzag,
            primitive_vectors: default_primitive_vectors(),
            basis_offsets: default_basis_offsets(),
        }
    }
}

impl ModelBuilder {
    /// Set the ribbon width in unit cells, ignored for the infinite sheet
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set the boundary variant
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Override the primitive vectors of the lattice
    pub fn with_primitive_vectors(mut self, primitive_vectors: Vec<Vec<f64>>) -> Self {
        self.primitive_vectors = primitive_vectors;
        self
    }

    /// Override the sublattice offsets of the lattice
    pub fn with_basis_offsets(mut self, basis_offsets: Vec<Vec<f64>>) -> Self {
        self.basis_offsets = basis_offsets;
        self
    }

    /// Finalise the model into a [`System`]
    #[tracing::instrument(name = "Model builder", level = "info", skip(self))]
    pub fn build(self) -> Result<System, BuildError> {
        let lattice = Bravais::try_new(&self.primitive_vectors, &self.basis_offsets)?;
        if self.width == 0 && self.boundary != Boundary::Infinite {
            return Err(BuildError::ZeroWidth);
        }

        let symmetry = match self.boundary {
            Boundary::Zigzag => TranslationalSymmetry::along(&lattice, [1.0, 0.0])?,
            Boundary::Armchair => TranslationalSymmetry::along(&lattice, [0.0, 3_f64.sqrt()])?,
            Boundary::Infinite => TranslationalSymmetry::full(&lattice),
        };

        let width = self.width as f64;
        let seed = Vector2::zeros();
        let sites = match self.boundary {
            Boundary::Zigzag => {
                let window = move |position: &Vector2<f64>| {
                    (-0.5 / 3_f64.sqrt() - 0.1..3_f64.sqrt() * width / 2.0 + 0.01)
                        .contains(&position.y)
                };
                fill(&lattice, &symmetry, &window, seed)
            }
            Boundary::Armchair => {
                let window =
                    move |position: &Vector2<f64>| position.x >= -1.0 && position.x < width;
                fill(&lattice, &symmetry, &window, seed)
            }
            Boundary::Infinite => fill(&lattice, &symmetry, &|_: &Vector2<f64>| true, seed),
        };

        tracing::trace!("Assembling the bond list over {} basis sites", sites.len());
        let index: HashMap<(usize, i32, i32), usize> = sites
            .iter()
            .enumerate()
            .map(|(position, site)| (site.key(), position))
            .collect();

        let kinds: Vec<(HoppingKind, BondKind)> = lattice
            .nearest_neighbour_kinds()
            .into_iter()
            .map(|kind| (kind, BondKind::NearestNeighbour))
            .chain(
                next_nearest_neighbour_kinds()
                    .into_iter()
                    .map(|kind| (kind, BondKind::NextNearestNeighbour)),
            )
            .collect();

        let mut bonds = Vec::new();
        for (from, site) in sites.iter().enumerate() {
            for (kind, class) in kinds.iter().filter(|(kind, _)| kind.from == site.sublattice) {
                let target = Site::new(kind.to, site.cell + kind.offset);
                let (reduced, hops) = symmetry.to_fundamental_domain(&lattice, target);
                // Bonds leaving the cross-section are dropped with their site
                if let Some(&to) = index.get(&reduced.key()) {
                    bonds.push(Bond {
                        from,
                        to,
                        hops,
                        kind: *class,
                    });
                }
            }
        }

        Ok(System {
            lattice,
            symmetry,
            sites,
            bonds,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Boundary, BondKind, ModelBuilder};
    use crate::error::BuildError;
    use proptest::prelude::*;

    #[test]
    fn the_infinite_sheet_has_two_basis_sites() {
        let system = ModelBuilder::default()
            .with_boundary(Boundary::Infinite)
            .build()
            .unwrap();
        assert_eq!(system.num_sites(), 2);
    }

    #[test]
    fn the_infinite_sheet_has_nine_directed_bonds() {
        let system = ModelBuilder::default()
            .with_boundary(Boundary::Infinite)
            .build()
            .unwrap();
        let nearest = system
            .bonds()
            .iter()
            .filter(|bond| bond.kind == BondKind::NearestNeighbour)
            .count();
        let next_nearest = system
            .bonds()
            .iter()
            .filter(|bond| bond.kind == BondKind::NextNearestNeighbour)
            .count();
        assert_eq!(nearest, 3);
        assert_eq!(next_nearest, 6);
    }

    #[test]
    fn zigzag_ribbon_width_sets_the_basis_size() {
        for width in [1_usize, 4, 6] {
            let system = ModelBuilder::default()
                .with_width(width)
                .with_boundary(Boundary::Zigzag)
                .build()
                .unwrap();
            assert_eq!(system.num_sites(), 2 * (width + 1));
        }
    }

    #[test]
    fn zero_width_ribbon_is_rejected() {
        let result = ModelBuilder::default()
            .with_width(0)
            .with_boundary(Boundary::Armchair)
            .build();
        assert!(matches!(result, Err(BuildError::ZeroWidth)));
    }

    #[test]
    fn boundary_strings_fall_back_to_the_infinite_sheet() {
        assert_eq!(Boundary::from("zigzag"), Boundary::Zigzag);
        assert_eq!(Boundary::from("armchair"), Boundary::Armchair);
        assert_eq!(Boundary::from("infinite"), Boundary::Infinite);
        assert_eq!(Boundary::from("periodic"), Boundary::Infinite);
    }

    proptest! {
        #[test]
        fn valid_two_dimensional_geometry_always_builds(
            a in -2.0..2.0f64,
            b in -2.0..2.0f64,
            c in -2.0..2.0f64,
            d in -2.0..2.0f64,
            bx in -0.9..0.9f64,
            by in -0.9..0.9f64,
        ) {
            prop_assume!((a * d - b * c).abs() > 0.1);
            let system = ModelBuilder::default()
                .with_boundary(Boundary::Infinite)
                .with_primitive_vectors(vec![vec![a, b], vec![c, d]])
                .with_basis_offsets(vec![vec![0.0, 0.0], vec![bx, by]])
                .build();
            prop_assert!(system.is_ok());
        }

        #[test]
        fn wrong_dimensionality_is_always_rejected(
            components in proptest::collection::vec(-2.0..2.0f64, 0..5),
        ) {
            prop_assume!(components.len() != 2);
            let result = ModelBuilder::default()
                .with_boundary(Boundary::Infinite)
                .with_primitive_vectors(vec![components, vec![0.0, 1.0]])
                .build();
            prop_assert!(matches!(result, Err(BuildError::Lattice(_))));
        }
    }
}
