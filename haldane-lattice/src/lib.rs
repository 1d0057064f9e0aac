#![allow(dead_code)]

//! Planar Bravais lattices with a sublattice basis, for tight-binding models.
//!
//! The crate provides the geometric half of a tight-binding calculation: a
//! validated two-dimensional lattice, directed hopping kinds between
//! sublattices, translational symmetries with fundamental-domain reduction
//! and a flood-fill enumeration of the sites inside a boundary window. The
//! physics (term amplitudes, Bloch phases) lives with the caller.

mod bravais;
mod error;
mod hopping;
mod shape;
mod symmetry;

pub use bravais::*;
pub use error::*;
pub use hopping::*;
pub use shape::*;
pub use symmetry::*;
