use crate::{Bravais, Site, TranslationalSymmetry};
use nalgebra::Vector2;
use std::collections::{HashSet, VecDeque};

/// A predicate selecting the sites that belong to a system
///
/// Implemented for any closure over the Cartesian position, which is how
/// boundary windows are usually written.
pub trait ShapePredicate {
    /// Whether a site at `position` belongs to the system
    fn contains(&self, position: &Vector2<f64>) -> bool;
}

impl<F> ShapePredicate for F
where
    F: Fn(&Vector2<f64>) -> bool,
{
    fn contains(&self, position: &Vector2<f64>) -> bool {
        self(position)
    }
}

/// Enumerate the sites inside `shape`, reduced to the fundamental domain of
/// `symmetry`
///
/// Starting from the sublattice sites of `seed_cell`, the fill walks
/// nearest-neighbour bonds outwards, reducing every candidate under the
/// retained translations and keeping those whose representative position
/// satisfies the shape predicate. The shape must describe a region that is
/// connected through nearest-neighbour bonds and contains the seed.
///
/// The returned sites are sorted bottom-to-top so that ribbon cross-sections
/// come out in a stable order.
pub fn fill(
    lattice: &Bravais,
    symmetry: &TranslationalSymmetry,
    shape: &impl ShapePredicate,
    seed_cell: Vector2<i32>,
) -> Vec<Site> {
    let kinds = lattice.nearest_neighbour_kinds();
    let moves: Vec<_> = kinds
        .iter()
        .map(|kind| kind.reversed())
        .chain(kinds.iter().copied())
        .collect();

    let mut seen: HashSet<(usize, i32, i32)> = HashSet::new();
    let mut queue: VecDeque<Site> = VecDeque::new();
    let mut sites: Vec<Site> = Vec::new();

    for sublattice in 0..lattice.num_sublattices() {
        let (candidate, _) =
            symmetry.to_fundamental_domain(lattice, Site::new(sublattice, seed_cell));
        if shape.contains(&lattice.position(&candidate)) && seen.insert(candidate.key()) {
            queue.push_back(candidate);
            sites.push(candidate);
        }
    }

    while let Some(site) = queue.pop_front() {
        for hop in moves.iter().filter(|hop| hop.from == site.sublattice) {
            let target = Site::new(hop.to, site.cell + hop.offset);
            let (candidate, _) = symmetry.to_fundamental_domain(lattice, target);
            if shape.contains(&lattice.position(&candidate)) && seen.insert(candidate.key()) {
                queue.push_back(candidate);
                sites.push(candidate);
            }
        }
    }

    sites.sort_by(|a, b| {
        (a.cell.y, a.cell.x, a.sublattice).cmp(&(b.cell.y, b.cell.x, b.sublattice))
    });
    sites
}

#[cfg(test)]
mod test {
    use super::fill;
    use crate::{Bravais, TranslationalSymmetry};
    use nalgebra::Vector2;

    fn honeycomb() -> Bravais {
        let primitive = vec![vec![1.0, 0.0], vec![0.5, 3_f64.sqrt() / 2.0]];
        let basis = vec![vec![0.0, 0.0], vec![0.0, 1.0 / 3_f64.sqrt()]];
        Bravais::try_new(&primitive, &basis).unwrap()
    }

    #[test]
    fn bulk_fill_returns_the_sublattice_basis() {
        let lattice = honeycomb();
        let symmetry = TranslationalSymmetry::full(&lattice);
        let sites = fill(&lattice, &symmetry, &|_: &Vector2<f64>| true, Vector2::zeros());
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn zigzag_window_yields_two_sites_per_row() {
        let lattice = honeycomb();
        let symmetry = TranslationalSymmetry::along(&lattice, [1.0, 0.0]).unwrap();
        for width in [1_usize, 2, 4, 7] {
            let w = width as f64;
            let window = move |position: &Vector2<f64>| {
                (-0.5 / 3_f64.sqrt() - 0.1..3_f64.sqrt() * w / 2.0 + 0.01).contains(&position.y)
            };
            let sites = fill(&lattice, &symmetry, &window, Vector2::zeros());
            assert_eq!(sites.len(), 2 * (width + 1));
        }
    }

    #[test]
    fn armchair_window_yields_four_sites_per_column() {
        let lattice = honeycomb();
        let symmetry = TranslationalSymmetry::along(&lattice, [0.0, 3_f64.sqrt()]).unwrap();
        let width = 4.0_f64;
        let window =
            move |position: &Vector2<f64>| position.x >= -1.0 && position.x < width;
        let sites = fill(&lattice, &symmetry, &window, Vector2::zeros());
        assert_eq!(sites.len(), 20);
    }
}
