//! Property tests over randomly generated site sets, covering the scalar
//! primitives directly and the full [`build`] pipeline's structural
//! invariants.

use planar_voronoi::geometry::{orient, Coord, Line};
use planar_voronoi::hull;
use planar_voronoi::{build, Coord as PubCoord};
use proptest::prelude::*;

fn coord_strategy() -> impl Strategy<Value = Coord> {
    (-50i32..50, -50i32..50).prop_map(|(x, y)| Coord::new(x as f64, y as f64))
}

proptest! {
    /// P1: orientation is antisymmetric in its first two arguments.
    #[test]
    fn orientation_antisymmetry(a in coord_strategy(), b in coord_strategy(), c in coord_strategy()) {
        prop_assert_eq!(orient(a, b, c), -orient(b, a, c));
    }

    /// P2: line intersection is commutative up to fuzzy equality, whenever
    /// the two lines actually cross.
    #[test]
    fn intersection_is_commutative(
        a1 in coord_strategy(), a2 in coord_strategy(),
        b1 in coord_strategy(), b2 in coord_strategy(),
    ) {
        prop_assume!(!a1.fuzzy_eq(&a2) && !b1.fuzzy_eq(&b2));
        let l1 = Line::through_points(a1, a2);
        let l2 = Line::through_points(b1, b2);
        if let (Some(p1), Some(p2)) = (l1.intersection(&l2), l2.intersection(&l1)) {
            prop_assert!(p1.fuzzy_eq(&p2));
        }
    }

    /// P3/P4: the hull returned by `build` is convex (every consecutive
    /// triple turns counter-clockwise or is collinear) and every site not on
    /// the hull lies on its non-negative side.
    #[test]
    fn hull_is_convex_and_contains_every_other_site(
        pts in prop::collection::vec((-30i32..30, -30i32..30), 3..20)
    ) {
        let points: Vec<(f64, f64)> = pts.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
        let out = build(&points).unwrap();
        if out.hull.len() < 3 {
            return Ok(());
        }

        let n = out.hull.len();
        for i in 0..n {
            let a = out.sites[out.hull[i]];
            let b = out.sites[out.hull[(i + 1) % n]];
            let c = out.sites[out.hull[(i + 2) % n]];
            prop_assert!(orient(a, b, c) >= 0, "hull triple ({a:?},{b:?},{c:?}) is not convex");
        }

        let on_hull: std::collections::HashSet<usize> = out.hull.iter().copied().collect();
        for (idx, site) in out.sites.iter().enumerate() {
            if on_hull.contains(&idx) {
                continue;
            }
            for i in 0..n {
                let a = out.sites[out.hull[i]];
                let b = out.sites[out.hull[(i + 1) % n]];
                prop_assert!(orient(a, b, *site) >= 0);
            }
        }
    }

    /// P5: the half-edge graph is structurally sound for any input size.
    #[test]
    fn dcel_structural_integrity(
        pts in prop::collection::vec((-30i32..30, -30i32..30), 1..16)
    ) {
        let points: Vec<(f64, f64)> = pts.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
        let out = build(&points).unwrap();

        for (site, cell) in out.cells.iter().enumerate() {
            let Some(head) = cell.head else { continue };
            let mut curr = head;
            let mut steps = 0usize;
            loop {
                prop_assert_eq!(out.dcel.twin(out.dcel.twin(curr)), curr);
                prop_assert_eq!(out.dcel.next(out.dcel.prev(curr)), curr);
                prop_assert_ne!(out.dcel.cell(curr), out.dcel.cell(out.dcel.twin(curr)));
                prop_assert_eq!(out.dcel.cell(curr), site);
                curr = out.dcel.next(curr);
                steps += 1;
                prop_assert!(steps <= out.sites.len() * 8 + 8, "cell {site} boundary never closes");
                if curr == head {
                    break;
                }
            }
        }
    }

    /// P6: for a handful of random query points, the Euclidean nearest site
    /// matches the site whose cell contains the point (checked by the
    /// point lying on the non-negative side of every one of that cell's
    /// bounding half-edge lines — the cell membership test available
    /// without a point-location structure).
    #[test]
    fn nearest_site_lies_within_its_own_cell(
        pts in prop::collection::vec((-20i32..20, -20i32..20), 3..12),
        qx in -20i32..20, qy in -20i32..20,
    ) {
        let points: Vec<(f64, f64)> = pts.iter().map(|&(x, y)| (x as f64, y as f64)).collect();
        let out = build(&points).unwrap();
        prop_assume!(out.sites.len() >= 3);

        let q = PubCoord::new(qx as f64, qy as f64);
        let nearest = out
            .sites
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.dist_sqr(&q).partial_cmp(&b.dist_sqr(&q)).unwrap()
            })
            .map(|(i, _)| i)
            .unwrap();

        // the nearest site's cell boundary must not separate q from it: for
        // every edge, q is on the same (or boundary) side as the site itself
        for he in {
            let mut v = Vec::new();
            if let Some(head) = out.cells[nearest].head {
                let mut curr = head;
                loop {
                    v.push(curr);
                    curr = out.dcel.next(curr);
                    if curr == head {
                        break;
                    }
                }
            }
            v
        } {
            if let (Some(s), Some(e)) = (out.dcel.get_start(he), out.dcel.get_end(he)) {
                let site_side = orient(s, e, out.sites[nearest]);
                let q_side = orient(s, e, q);
                prop_assert!(site_side == 0 || q_side == 0 || site_side.signum() == q_side.signum());
            }
        }
    }
}

/// P7: bridging two already-merged hull halves is deterministic — running
/// the same merge sequence over the same sites twice, starting from fresh
/// per-site links each time, produces the same head, bridge, and cycle both
/// times. `hull::merge` takes no input beyond `sites`/`links`/`left`/`right`
/// and carries no hidden state, so this holds for any valid input; the
/// triangle-pair construction below just gives it something non-trivial to
/// chew on (each "half" is itself already the result of two prior merges).
#[test]
fn bridge_merge_is_deterministic_given_identical_inputs() {
    let sites = vec![
        Coord::new(0.0, 0.0),
        Coord::new(1.0, 0.0),
        Coord::new(2.0, 1.0),
        Coord::new(10.0, 0.0),
        Coord::new(11.0, 0.0),
        Coord::new(12.0, 1.0),
    ];

    let run = || {
        let mut links = hull::HullLinks::with_capacity(6);
        for _ in 0..6 {
            links.push_singleton();
        }
        let (left_pair, _) = hull::merge(&sites, &mut links, 1, 2);
        let (left_entry, _) = hull::merge(&sites, &mut links, 0, left_pair);
        let (right_pair, _) = hull::merge(&sites, &mut links, 4, 5);
        let (right_entry, _) = hull::merge(&sites, &mut links, 3, right_pair);
        let (head, bridge) = hull::merge(&sites, &mut links, left_entry, right_entry);
        (head, bridge, links.cycle(head))
    };

    let (head1, bridge1, cycle1) = run();
    let (head2, bridge2, cycle2) = run();

    assert_eq!(head1, head2);
    assert_eq!(bridge1, bridge2);
    assert_eq!(cycle1, cycle2);
}
