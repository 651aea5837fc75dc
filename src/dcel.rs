//! The half-edge arena: a doubly-connected edge list whose endpoints may be
//! directional (unbounded) rather than finite coordinates.
//!
//! Half-edges live in a [`slab::Slab`] rather than behind `Rc`, since the
//! `next`/`prev`/`twin` mesh is mutually cyclic and would leak under
//! reference counting. Endpoints (`PointRef`) are the one part of the graph
//! that *is* shared via `Rc<RefCell<_>>`, matching their lifecycle: a point
//! can be adjacent to several half-edges but never points back into the
//! half-edge graph itself.

use slab::Slab;

use crate::geometry::{fuzzy_compare, Coord, Line};
use crate::point::{self, PointKind, PointRef, Quadrant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HalfEdgeId(pub usize);

#[derive(Clone, Debug)]
struct HalfEdgeData {
    source: PointRef,
    cell: usize,
    twin: HalfEdgeId,
    next: HalfEdgeId,
    prev: HalfEdgeId,
}

#[derive(Default)]
pub struct Dcel {
    edges: Slab<HalfEdgeData>,
}

impl Dcel {
    pub fn new() -> Self {
        Dcel { edges: Slab::new() }
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.edges[he.0].next
    }

    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.edges[he.0].prev
    }

    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.edges[he.0].twin
    }

    pub fn cell(&self, he: HalfEdgeId) -> usize {
        self.edges[he.0].cell
    }

    pub fn set_next(&mut self, he: HalfEdgeId, next: HalfEdgeId) {
        self.edges[he.0].next = next;
    }

    pub fn set_prev(&mut self, he: HalfEdgeId, prev: HalfEdgeId) {
        self.edges[he.0].prev = prev;
    }

    pub fn remove(&mut self, he: HalfEdgeId) {
        self.edges.remove(he.0);
    }

    /// The shared start point, or `None` if this end is directional.
    pub fn start_ref(&self, he: HalfEdgeId) -> Option<PointRef> {
        let src = self.edges[he.0].source.clone();
        let is_finite = src.borrow().kind.is_finite();
        is_finite.then_some(src)
    }

    /// The shared end point (the twin's start), or `None` if directional.
    pub fn end_ref(&self, he: HalfEdgeId) -> Option<PointRef> {
        let twin = self.edges[he.0].twin;
        self.start_ref(twin)
    }

    pub fn get_start(&self, he: HalfEdgeId) -> Option<Coord> {
        self.start_ref(he).map(|p| p.borrow().coord())
    }

    pub fn get_end(&self, he: HalfEdgeId) -> Option<Coord> {
        self.end_ref(he).map(|p| p.borrow().coord())
    }

    /// Pins this half-edge's start to `p`.
    ///
    /// If the twin's current endpoint is an `Origin` placeholder, it is
    /// promoted in place to a `Dir` point of the same quadrant and adopted
    /// as the twin's source — folding the placeholder into a proper
    /// directional endpoint now that the other side of the line is bound.
    pub fn set_start(&mut self, he: HalfEdgeId, p: PointRef) {
        let twin = self.edges[he.0].twin;
        let twin_src = self.edges[twin.0].source.clone();
        let origin_quadrant = match twin_src.borrow().kind {
            PointKind::Origin(q) => Some(q),
            _ => None,
        };
        if let Some(q) = origin_quadrant {
            let this_src = self.edges[he.0].source.clone();
            this_src.borrow_mut().kind = PointKind::Dir(q);
            self.edges[twin.0].source = this_src;
        }
        self.edges[he.0].source = p;
    }

    /// Pins this half-edge's end to `p`; symmetric to [`Dcel::set_start`].
    pub fn set_end(&mut self, he: HalfEdgeId, p: PointRef) {
        let twin = self.edges[he.0].twin;
        self.set_start(twin, p);
    }

    /// Directional quadrant this half-edge runs through. Defined for every
    /// half-edge, though callers only rely on it once at least one endpoint
    /// is unbounded.
    pub fn quadrant(&self, he: HalfEdgeId) -> Quadrant {
        let twin = self.edges[he.0].twin;
        let source = self.edges[he.0].source.borrow();
        let twin_source = self.edges[twin.0].source.borrow();
        if source.kind.is_finite() && twin_source.kind.is_finite() {
            let dx = fuzzy_compare(twin_source.x, source.x);
            let dy = fuzzy_compare(twin_source.y, source.y);
            return if dx >= 0 && dy > 0 {
                Quadrant::Q1
            } else if dx < 0 && dy >= 0 {
                Quadrant::Q2
            } else if dx <= 0 && dy < 0 {
                Quadrant::Q3
            } else {
                Quadrant::Q4
            };
        }
        if let Some(q) = source.kind.quadrant() {
            return q;
        }
        twin_source.kind.quadrant().unwrap().opposite()
    }

    /// The supporting line of this half-edge, reconstructed from whichever
    /// mix of finite/directional endpoints it has.
    pub fn line(&self, he: HalfEdgeId) -> Line {
        let twin = self.edges[he.0].twin;
        let s = self.edges[he.0].source.borrow();
        let t = self.edges[twin.0].source.borrow();
        if s.kind.is_finite() && t.kind.is_finite() {
            return Line::through_points(s.coord(), t.coord());
        }
        if !s.kind.is_finite() && !t.kind.is_finite() {
            return if matches!(s.kind, PointKind::Dir(_)) {
                Line::raw(s.x, s.y, t.x)
            } else {
                Line::raw(t.x, t.y, s.x)
            };
        }
        let dot = -(s.x * t.x + s.y * t.y);
        if !s.kind.is_finite() {
            Line::raw(s.x, s.y, dot)
        } else {
            Line::raw(t.x, t.y, dot)
        }
    }

    /// Whether `p` (already known to lie on this half-edge's supporting
    /// line) falls within the bounded portion of it.
    pub fn on_edge(&self, he: HalfEdgeId, p: Coord) -> bool {
        let s = self.get_start(he);
        let e = self.get_end(he);
        match (s, e) {
            (Some(s), Some(e)) => {
                fuzzy_compare(p.x, s.x.min(e.x)) >= 0
                    && fuzzy_compare(p.x, s.x.max(e.x)) <= 0
                    && fuzzy_compare(p.y, s.y.min(e.y)) >= 0
                    && fuzzy_compare(p.y, s.y.max(e.y)) <= 0
            }
            (None, None) => true,
            _ => {
                let q = self.quadrant(he);
                match (q, s, e) {
                    (Quadrant::Q1, None, Some(e)) => {
                        fuzzy_compare(p.x, e.x) <= 0 && fuzzy_compare(p.y, e.y) <= 0
                    }
                    (Quadrant::Q1, Some(s), None) => {
                        fuzzy_compare(p.x, s.x) >= 0 && fuzzy_compare(p.y, s.y) >= 0
                    }
                    (Quadrant::Q2, None, Some(e)) => {
                        fuzzy_compare(p.x, e.x) >= 0 && fuzzy_compare(p.y, e.y) <= 0
                    }
                    (Quadrant::Q2, Some(s), None) => {
                        fuzzy_compare(p.x, s.x) <= 0 && fuzzy_compare(p.y, s.y) >= 0
                    }
                    (Quadrant::Q3, None, Some(e)) => {
                        fuzzy_compare(p.x, e.x) >= 0 && fuzzy_compare(p.y, e.y) >= 0
                    }
                    (Quadrant::Q3, Some(s), None) => {
                        fuzzy_compare(p.x, s.x) <= 0 && fuzzy_compare(p.y, s.y) <= 0
                    }
                    (Quadrant::Q4, None, Some(e)) => {
                        fuzzy_compare(p.x, e.x) <= 0 && fuzzy_compare(p.y, e.y) >= 0
                    }
                    (Quadrant::Q4, Some(s), None) => {
                        fuzzy_compare(p.x, s.x) >= 0 && fuzzy_compare(p.y, s.y) <= 0
                    }
                    _ => unreachable!("exactly one of start/end is None here"),
                }
            }
        }
    }

    /// Creates a twin pair of half-edges supporting line `l`, with `left`
    /// bordering `p1`'s side and `right` bordering `p2`'s side. Missing
    /// endpoints are fabricated as directional points: the edge's quadrant
    /// is picked from the sign of `l.a * l.b`, matching the tie-break that
    /// `createEdge` in the original engine used to decide which diagonal
    /// quadrant pair a seam's unbounded tail belongs to.
    pub fn create_edge(
        &mut self,
        p1: Option<PointRef>,
        p2: Option<PointRef>,
        l: Line,
        left: usize,
        right: usize,
    ) -> HalfEdgeId {
        let q: i32 = if (l.a > 0.0 && l.b > 0.0) || (l.a < 0.0 && l.b < 0.0) || l.a == 0.0 {
            4
        } else {
            3
        };
        let (p1, p2) = match (p1, p2) {
            (None, None) => (
                point::tagged(l.a, l.b, PointKind::Dir(Quadrant::from_index(q - 2))),
                point::tagged(l.c, 0.0, PointKind::Origin(Quadrant::from_index(q))),
            ),
            (None, Some(p2)) => (
                point::tagged(l.a, l.b, PointKind::Dir(Quadrant::from_index(q - 2))),
                p2,
            ),
            (Some(p1), None) => (
                p1,
                point::tagged(l.a, l.b, PointKind::Dir(Quadrant::from_index(q))),
            ),
            (Some(p1), Some(p2)) => (p1, p2),
        };

        let left_id = HalfEdgeId(self.edges.insert(HalfEdgeData {
            source: p1,
            cell: left,
            twin: HalfEdgeId(0),
            next: HalfEdgeId(0),
            prev: HalfEdgeId(0),
        }));
        let right_id = HalfEdgeId(self.edges.insert(HalfEdgeData {
            source: p2,
            cell: right,
            twin: left_id,
            next: HalfEdgeId(0),
            prev: HalfEdgeId(0),
        }));
        self.edges[left_id.0].twin = right_id;
        self.edges[left_id.0].next = left_id;
        self.edges[left_id.0].prev = left_id;
        self.edges[right_id.0].next = right_id;
        self.edges[right_id.0].prev = right_id;
        left_id
    }
}
