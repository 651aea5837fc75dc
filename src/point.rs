//! The DCEL's endpoint representation.
//!
//! A half-edge endpoint is either a FINITE coordinate, or a tag describing a
//! ray/line running off to infinity in one of the four quadrants. Unbounded
//! endpoints come in two flavors: `Dir` (this half-edge's own point is the
//! direction vector) and `Origin` (this half-edge's point is a placeholder
//! that will be folded into a `Dir` point of the opposite quadrant once the
//! other end of the line is pinned down — see [`crate::dcel::Dcel::set_start`]).
//!
//! Endpoints are shared (ref-counted) between the half-edges that describe
//! the same physical point, so that splicing one edge's endpoint is visible
//! to every other edge referencing it. There is no cycle risk: a `PointData`
//! never holds a reference back into the half-edge graph.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Coord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    pub fn from_index(i: i32) -> Quadrant {
        match i {
            1 => Quadrant::Q1,
            2 => Quadrant::Q2,
            3 => Quadrant::Q3,
            4 => Quadrant::Q4,
            _ => unreachable!("quadrant index out of range: {i}"),
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Quadrant::Q1 => 1,
            Quadrant::Q2 => 2,
            Quadrant::Q3 => 3,
            Quadrant::Q4 => 4,
        }
    }

    /// The diagonally-opposite quadrant: Q1<->Q3, Q2<->Q4.
    pub fn opposite(self) -> Quadrant {
        let i = self.index();
        Quadrant::from_index(if i < 3 { i + 2 } else { i - 2 })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    Finite,
    Dir(Quadrant),
    Origin(Quadrant),
}

impl PointKind {
    pub fn is_finite(self) -> bool {
        matches!(self, PointKind::Finite)
    }

    /// The quadrant carried by a `Dir`/`Origin` tag; `None` for `Finite`.
    pub fn quadrant(self) -> Option<Quadrant> {
        match self {
            PointKind::Dir(q) | PointKind::Origin(q) => Some(q),
            PointKind::Finite => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointData {
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
}

impl PointData {
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

pub type PointRef = Rc<RefCell<PointData>>;

pub fn finite(x: f64, y: f64) -> PointRef {
    Rc::new(RefCell::new(PointData {
        x,
        y,
        kind: PointKind::Finite,
    }))
}

pub fn tagged(x: f64, y: f64, kind: PointKind) -> PointRef {
    Rc::new(RefCell::new(PointData { x, y, kind }))
}
