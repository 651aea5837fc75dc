//! The recursive driver: sorts and deduplicates the input sites, then
//! builds the hull and Voronoi diagram together in one divide-and-conquer
//! pass, merging a constant number of sites at a time at the base case and
//! folding merges upward exactly as [`crate::hull::merge`] and
//! [`crate::voronoi::merge_voronoi`] are shared between every level.

use crate::dcel::Dcel;
use crate::error::{self, BuildError};
use crate::geometry::{fuzzy_compare, Coord};
use crate::hull::{self, HullLinks, SiteId};
use crate::voronoi::{self, Cell};

/// The hull and Voronoi diagram produced by [`build`].
///
/// `sites` is the deduplicated, sorted input; every other field indexes
/// into it by [`SiteId`]. `hull` lists the convex hull vertices in cyclic
/// (counter-clockwise) order. `dcel`/`cells` hold the full Voronoi diagram:
/// `cells[site].head` is an entry half-edge into that site's cell boundary,
/// or `None` only when there is just one site in the whole input.
pub struct BuildOutput {
    pub sites: Vec<Coord>,
    pub hull: Vec<SiteId>,
    pub dcel: Dcel,
    pub cells: Vec<Cell>,
}

fn sort_sites(sites: &mut [Coord]) {
    let cmp = |a: &Coord, b: &Coord| {
        let cx = fuzzy_compare(a.x, b.x);
        if cx != 0 {
            cx.cmp(&0)
        } else {
            fuzzy_compare(a.y, b.y).cmp(&0)
        }
    };

    #[cfg(feature = "rayon")]
    {
        use rayon::slice::ParallelSliceMut;
        sites.par_sort_unstable_by(cmp);
    }
    #[cfg(not(feature = "rayon"))]
    {
        sites.sort_unstable_by(cmp);
    }
}

fn dedup_sites(sites: &mut Vec<Coord>) {
    sites.dedup_by(|a, b| a.fuzzy_eq(b));
}

fn build_range(
    sites: &[Coord],
    links: &mut HullLinks,
    dcel: &mut Dcel,
    cells: &mut [Cell],
    begin: usize,
    end: usize,
) -> Result<SiteId, BuildError> {
    if end - begin == 1 {
        return Ok(begin);
    }
    let mid = (begin + end) / 2;
    let left = build_range(sites, links, dcel, cells, begin, mid)?;
    let right = build_range(sites, links, dcel, cells, mid, end)?;

    let (head, bridge) = hull::merge(sites, links, left, right);
    log::debug!(
        "merged sites [{begin}, {end}) into bridge {{first: {}, second: {}}}",
        bridge.first,
        bridge.second
    );
    voronoi::merge_voronoi(dcel, cells, sites, bridge)?;
    error::debug_validate(dcel, cells);

    Ok(head)
}

/// Builds the convex hull and planar Voronoi diagram of `points` in one
/// pass.
///
/// Non-finite coordinates (`NaN`, `+-inf`) are dropped before processing;
/// coincident sites (within the crate's fuzzy-equality tolerance) collapse
/// to a single site, keeping whichever survives sorting first. An input
/// with fewer than two surviving sites produces a degenerate but valid
/// output: an empty diagram, or a single site with an empty cell boundary.
pub fn build(points: &[(f64, f64)]) -> Result<BuildOutput, BuildError> {
    let mut sites: Vec<Coord> = points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|&(x, y)| Coord::new(x, y))
        .collect();

    sort_sites(&mut sites);
    dedup_sites(&mut sites);

    let n = sites.len();
    let mut links = HullLinks::with_capacity(n);
    for _ in 0..n {
        links.push_singleton();
    }
    let mut dcel = Dcel::new();
    let mut cells = vec![Cell::default(); n];

    let hull_head = match n {
        0 => None,
        1 => Some(0),
        _ => Some(build_range(&sites, &mut links, &mut dcel, &mut cells, 0, n)?),
    };

    let hull = hull_head.map(|h| links.cycle(h)).unwrap_or_default();

    Ok(BuildOutput {
        sites,
        hull,
        dcel,
        cells,
    })
}
