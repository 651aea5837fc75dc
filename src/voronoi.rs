//! The Voronoi half: seeds a downward seam walk from a hull bridge and
//! splices the resulting chain of new half-edges into both cells' existing
//! boundaries.
//!
//! This mirrors the hull merge's divide-and-conquer shape exactly — each
//! call handles one bridge, produced once per [`crate::hull::merge`] call —
//! but the "seam" here is a walked perpendicular bisector rather than a
//! single tangent line, since it must cross however many existing cell
//! edges lie between the two sites.

use crate::dcel::{Dcel, HalfEdgeId};
use crate::error::BuildError;
use crate::geometry::{fuzzy_compare, Coord, Line};
use crate::hull::{Bridge, SiteId};
use crate::point::{self, PointRef};

/// One Voronoi cell: its boundary is a cyclic chain of half-edges reachable
/// from `head`, or `None` before the cell has taken part in any merge yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cell {
    pub head: Option<HalfEdgeId>,
}

/// A walking cursor along one cell's boundary, searching for where the
/// current seam crosses it. `clockwise` fixes which direction `step`
/// advances in; the two cursors in a merge always run opposite directions
/// so they together scan strictly downward.
struct Cursor {
    cell: SiteId,
    clockwise: bool,
    edge: Option<HalfEdgeId>,
    /// The edge this cursor was seeded at — the boundary of the
    /// not-yet-spliced-in remainder that `connect_chain` reattaches to.
    top: Option<HalfEdgeId>,
    head_skipped: bool,
    cp: Option<PointRef>,
}

impl Cursor {
    fn new(cells: &[Cell], cell: SiteId, clockwise: bool) -> Self {
        Cursor {
            cell,
            clockwise,
            edge: cells[cell].head,
            top: None,
            head_skipped: false,
            cp: None,
        }
    }

    fn set(&mut self, dcel: &Dcel, new_edge: HalfEdgeId) {
        self.cell = dcel.cell(new_edge);
        self.edge = Some(new_edge);
        self.top = Some(new_edge);
        self.cp = None;
        self.head_skipped = false;
    }

    fn step(&mut self, dcel: &Dcel, cells: &[Cell]) {
        let head = cells[self.cell].head;
        if self.clockwise {
            self.head_skipped = self.head_skipped || self.edge == head;
            self.edge = self.edge.map(|e| dcel.prev(e));
        } else {
            self.edge = self.edge.map(|e| dcel.next(e));
            self.head_skipped = self.head_skipped || self.edge == head;
        }
    }

    /// Scans the cell boundary starting at the cursor's current edge for
    /// the first crossing of `seam` that is strictly below `last` (or,
    /// tied in `y`, to its right) — the next candidate seam vertex. Writes
    /// the winning point (reusing a shared endpoint where the crossing
    /// lands exactly on one) into `self.cp`, or clears it if the whole
    /// boundary was scanned without a qualifying crossing.
    fn intersection(&mut self, dcel: &Dcel, cells: &[Cell], seam: &Line, last: Option<&PointRef>) {
        let Some(start) = self.edge else {
            self.cp = None;
            return;
        };
        loop {
            let edge = self.edge.unwrap();
            if let Some(p) = dcel.line(edge).intersection(seam) {
                let cmp_y = match last {
                    None => -1,
                    Some(l) => fuzzy_compare(p.y, l.borrow().y),
                };
                let beats_last = cmp_y < 0
                    || (cmp_y == 0 && last.map_or(true, |l| fuzzy_compare(p.x, l.borrow().x) > 0));
                if beats_last && dcel.on_edge(edge, p) {
                    let start_ref = dcel.start_ref(edge);
                    let end_ref = dcel.end_ref(edge);
                    let eq = if start_ref.as_ref().map_or(false, |s| s.borrow().coord().fuzzy_eq(&p)) {
                        -1
                    } else if end_ref.as_ref().map_or(false, |e| e.borrow().coord().fuzzy_eq(&p)) {
                        1
                    } else {
                        0
                    };
                    if eq == 0 {
                        self.cp = Some(point::finite(p.x, p.y));
                    } else if eq == -1 {
                        self.cp = start_ref;
                        if self.clockwise {
                            self.step(dcel, cells);
                        }
                    } else {
                        self.cp = end_ref;
                        if !self.clockwise {
                            self.step(dcel, cells);
                        }
                    }
                    return;
                }
            }
            self.step(dcel, cells);
            if self.edge == Some(start) {
                break;
            }
        }
        self.cp = None;
    }
}

fn add_chain_link(dcel: &mut Dcel, edge: HalfEdgeId, head: Option<HalfEdgeId>, in_head: bool) -> HalfEdgeId {
    match head {
        None => {
            dcel.set_next(edge, edge);
            dcel.set_prev(edge, edge);
            edge
        }
        Some(head) => {
            let head_prev = dcel.prev(head);
            dcel.set_next(edge, head);
            dcel.set_prev(edge, head_prev);
            dcel.set_next(head_prev, edge);
            dcel.set_prev(head, edge);
            if in_head {
                edge
            } else {
                head
            }
        }
    }
}

fn mark_for_deletion(dcel: &Dcel, mut curr: HalfEdgeId, finish: HalfEdgeId, deletion: &mut Vec<HalfEdgeId>) {
    while curr != finish {
        deletion.push(curr);
        curr = dcel.next(curr);
    }
}

/// Splices the new chain `chain_start..=chain_end` (the half-edges just
/// built while walking `cell`'s side of the seam) into `cell`'s existing
/// boundary, deferring removal of whatever old edges the new chain
/// supersedes.
///
/// `first`/`second` are the still-live edges bordering the chain on either
/// side, or `None` when that side hasn't intersected anything yet — which
/// of the four combinations applies determines whether a piece of the old
/// boundary is cut out, prepended, appended, or (on the very first call for
/// a brand new cell) simply installed as the whole boundary.
fn connect_chain(
    dcel: &mut Dcel,
    cells: &mut [Cell],
    first: Option<HalfEdgeId>,
    chain_start: HalfEdgeId,
    second: Option<HalfEdgeId>,
    mut head_skipped: bool,
    deletion: &mut Vec<HalfEdgeId>,
) {
    let site = dcel.cell(chain_start);
    let chain_end = dcel.prev(chain_start);

    match (first, second) {
        (Some(first), Some(second)) => {
            let head = cells[site]
                .head
                .expect("cell already has a boundary once both ends have intersected");
            let head_next = dcel.next(head);
            let two_parallel_edges = head != head_next
                && head_next == dcel.prev(head)
                && dcel.line(head).is_parallel(&dcel.line(head_next));

            if two_parallel_edges {
                if dcel.start_ref(head).is_some() {
                    cells[site].head = Some(head_next);
                }
                head_skipped = false;
            } else {
                mark_for_deletion(dcel, dcel.next(first), second, deletion);
            }
            dcel.set_next(first, chain_start);
            dcel.set_prev(chain_start, first);
            dcel.set_prev(second, chain_end);
            dcel.set_next(chain_end, second);
            if head_skipped {
                cells[site].head = Some(chain_start);
            }
        }
        (None, None) => {
            if let Some(head) = cells[site].head {
                dcel.set_prev(head, chain_start);
                dcel.set_next(head, chain_start);
                dcel.set_prev(chain_start, head);
                dcel.set_next(chain_start, head);
            }
            cells[site].head = Some(chain_start);
        }
        (None, Some(second)) => {
            let head = cells[site]
                .head
                .expect("a chain bounded only on its second end requires an existing boundary");
            let head_prev = dcel.prev(head);
            mark_for_deletion(dcel, dcel.next(head_prev), second, deletion);
            dcel.set_next(head_prev, chain_start);
            dcel.set_prev(chain_start, head_prev);
            dcel.set_prev(second, chain_end);
            dcel.set_next(chain_end, second);
            cells[site].head = Some(chain_start);
        }
        (Some(first), None) => {
            let head = cells[site]
                .head
                .expect("a chain bounded only on its first end requires an existing boundary");
            mark_for_deletion(dcel, dcel.next(first), head, deletion);
            dcel.set_next(first, chain_start);
            dcel.set_prev(chain_start, first);
            dcel.set_prev(head, chain_end);
            dcel.set_next(chain_end, head);
        }
    }
}

/// Walks the perpendicular-bisector seam between the two sites joined by
/// `bridge` downward, building the chain of half-edges that separates their
/// (and their neighbors') cells, and splices that chain into both sides'
/// existing boundaries.
///
/// The seam walk is a fixed point of the merged diagram's geometry and, for
/// non-degenerate input, always reaches the point where both cursors run
/// out of intersections. A loop guard bounds it anyway: co-circular or
/// near-coincident input can, in principle, defeat the fuzzy-comparison
/// ordering the walk relies on to make progress, and a hang there should
/// surface as a typed error rather than never return.
pub fn merge_voronoi(
    dcel: &mut Dcel,
    cells: &mut [Cell],
    sites: &[Coord],
    bridge: Bridge,
) -> Result<(), BuildError> {
    let mut left = Cursor::new(cells, bridge.second, true);
    let mut right = Cursor::new(cells, bridge.first, false);
    let mut deletion = Vec::new();
    let mut last_p: Option<PointRef> = None;
    let mut left_chain: Option<HalfEdgeId> = None;
    let mut right_chain: Option<HalfEdgeId> = None;

    let iteration_cap = cells.len().saturating_mul(8).max(64);
    let warn_threshold = iteration_cap * 3 / 4;
    let mut iterations = 0usize;
    let mut warned = false;

    loop {
        iterations += 1;
        if iterations > iteration_cap {
            return Err(BuildError::DegenerateInput(format!(
                "voronoi seam walk between sites {} and {} failed to terminate within {} iterations",
                bridge.first, bridge.second, iteration_cap
            )));
        }
        if !warned && iterations > warn_threshold {
            log::warn!(
                "voronoi seam walk between sites {} and {} at {iterations}/{iteration_cap} iterations",
                bridge.first,
                bridge.second
            );
            warned = true;
        }

        let mid = Coord::new(
            (sites[left.cell].x + sites[right.cell].x) / 2.0,
            (sites[left.cell].y + sites[right.cell].y) / 2.0,
        );
        let seam = Line::perpendicular_bisector(sites[left.cell], sites[right.cell], mid);

        left.intersection(dcel, cells, &seam, last_p.as_ref());
        right.intersection(dcel, cells, &seam, last_p.as_ref());
        log::trace!(
            "seam iteration {iterations}: left.cell={} right.cell={} left.cp={:?} right.cp={:?}",
            left.cell,
            right.cell,
            left.cp.as_ref().map(|p| p.borrow().coord()),
            right.cp.as_ref().map(|p| p.borrow().coord()),
        );

        if left.cp.is_none() && right.cp.is_none() {
            let edge = dcel.create_edge(None, last_p.clone(), seam, left.cell, right.cell);
            let twin = dcel.twin(edge);
            let lc = add_chain_link(dcel, edge, left_chain, true);
            let rc = add_chain_link(dcel, twin, right_chain, false);
            connect_chain(dcel, cells, None, lc, left.top, left.head_skipped, &mut deletion);
            connect_chain(dcel, cells, right.top, rc, None, right.head_skipped, &mut deletion);
            break;
        }

        let cmp = if left.cp.is_none() {
            1
        } else if right.cp.is_none() {
            -1
        } else {
            fuzzy_compare(
                right.cp.as_ref().unwrap().borrow().y,
                left.cp.as_ref().unwrap().borrow().y,
            )
        };
        let point = if cmp <= 0 {
            left.cp.clone().unwrap()
        } else {
            right.cp.clone().unwrap()
        };

        let edge = dcel.create_edge(Some(point.clone()), last_p.clone(), seam, left.cell, right.cell);
        let twin = dcel.twin(edge);
        left_chain = Some(add_chain_link(dcel, edge, left_chain, true));
        right_chain = Some(add_chain_link(dcel, twin, right_chain, false));
        last_p = Some(point.clone());

        if cmp <= 0 {
            let left_edge = left.edge.unwrap();
            let end_matches = dcel
                .end_ref(left_edge)
                .map_or(false, |e| e.borrow().coord().fuzzy_eq(&point.borrow().coord()));
            let intersect_twin = if end_matches {
                dcel.next(dcel.twin(dcel.next(left_edge)))
            } else {
                dcel.twin(left_edge)
            };
            dcel.set_end(left_edge, point.clone());
            dcel.set_start(intersect_twin, point.clone());
            connect_chain(
                dcel,
                cells,
                Some(left_edge),
                left_chain.unwrap(),
                left.top,
                left.head_skipped,
                &mut deletion,
            );
            left.set(dcel, intersect_twin);
            left_chain = None;
        }

        if cmp >= 0 {
            let right_edge = right.edge.unwrap();
            let mut intersect_twin = dcel.twin(right_edge);
            let start_matches = dcel
                .start_ref(right_edge)
                .map_or(false, |s| s.borrow().coord().fuzzy_eq(&point.borrow().coord()));
            if start_matches {
                while dcel.prev(dcel.twin(dcel.prev(right_edge))) != intersect_twin {
                    dcel.set_end(intersect_twin, point.clone());
                    intersect_twin = dcel.twin(dcel.next(intersect_twin));
                }
            }
            dcel.set_start(right_edge, point.clone());
            dcel.set_end(intersect_twin, point.clone());
            connect_chain(
                dcel,
                cells,
                right.top,
                right_chain.unwrap(),
                Some(right_edge),
                right.head_skipped,
                &mut deletion,
            );
            right.set(dcel, intersect_twin);
            right_chain = None;
        }
    }

    for he in deletion {
        dcel.remove(he);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sites_produce_a_single_shared_bisector_edge() {
        let sites = vec![Coord::new(0.0, 0.0), Coord::new(2.0, 0.0)];
        let mut dcel = Dcel::new();
        let mut cells = vec![Cell::default(), Cell::default()];
        let bridge = Bridge { first: 0, second: 1 };

        merge_voronoi(&mut dcel, &mut cells, &sites, bridge).unwrap();

        let head0 = cells[0].head.expect("cell 0 must have a boundary");
        let head1 = cells[1].head.expect("cell 1 must have a boundary");
        assert_eq!(dcel.twin(head0), head1);

        // the bisector of (0,0)-(2,0) is the vertical line x = 1
        let line = dcel.line(head0);
        let at_one = line.a * 1.0 + line.b * 0.0 + line.c;
        assert!(at_one.abs() < 1e-6);
        let at_origin = line.a * 0.0 + line.b * 0.0 + line.c;
        assert!(at_origin.abs() > 1e-6);
    }

    /// P8: once `connect_chain` splices a new chain into a cell's boundary,
    /// whatever old edge it cuts out lands in `deletion` and is no longer
    /// reachable by walking the cell's (possibly updated) head.
    #[test]
    fn spliced_out_edges_are_unreachable_from_the_cells_head() {
        let mut dcel = Dcel::new();
        let mut cells = vec![Cell::default(), Cell::default()];
        let line = Line::through_points(Coord::new(0.0, 0.0), Coord::new(1.0, 0.0));

        let old_a = dcel.create_edge(
            Some(point::finite(0.0, 0.0)),
            Some(point::finite(1.0, 0.0)),
            line,
            0,
            1,
        );
        let old_b = dcel.create_edge(
            Some(point::finite(1.0, 0.0)),
            Some(point::finite(1.0, 1.0)),
            line,
            0,
            1,
        );
        let old_c = dcel.create_edge(
            Some(point::finite(1.0, 1.0)),
            Some(point::finite(0.0, 0.0)),
            line,
            0,
            1,
        );
        dcel.set_next(old_a, old_b);
        dcel.set_prev(old_b, old_a);
        dcel.set_next(old_b, old_c);
        dcel.set_prev(old_c, old_b);
        dcel.set_next(old_c, old_a);
        dcel.set_prev(old_a, old_c);
        cells[0].head = Some(old_a);

        let chain_start = dcel.create_edge(
            Some(point::finite(1.0, 0.0)),
            Some(point::finite(1.0, 0.5)),
            line,
            0,
            2,
        );
        let chain_mid = dcel.create_edge(
            Some(point::finite(1.0, 0.5)),
            Some(point::finite(1.0, 1.0)),
            line,
            0,
            2,
        );
        dcel.set_next(chain_start, chain_mid);
        dcel.set_prev(chain_mid, chain_start);
        dcel.set_prev(chain_start, chain_mid);

        let mut deletion = Vec::new();
        connect_chain(&mut dcel, &mut cells, Some(old_a), chain_start, Some(old_c), false, &mut deletion);

        assert_eq!(deletion, vec![old_b], "only the edge between first and second should be cut out");

        let head = cells[0].head.expect("head survives this splice");
        let mut curr = head;
        let mut visited = Vec::new();
        loop {
            visited.push(curr);
            curr = dcel.next(curr);
            if curr == head {
                break;
            }
        }
        assert!(
            !visited.contains(&old_b),
            "an edge on the deletion list must not be reachable by walking from the cell's head"
        );
    }
}
