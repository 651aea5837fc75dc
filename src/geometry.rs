//! Scalar primitives shared by the hull and Voronoi mergers: fuzzy comparison,
//! orientation, and the `ax + by + c = 0` line representation used for seams
//! and cell boundaries alike.

/// Base tolerance for the relative fuzzy-comparison family.
///
/// Fixed rather than configurable: the whole crate commits to a single
/// epsilon policy so that orientation, intersection and containment checks
/// agree on what "equal" means. See [`fuzzy_compare`].
pub const EPS_BASE: f64 = 1e-9;

/// Relative tolerance around `reference`, used by [`fuzzy_compare`].
#[inline]
pub fn epsilon(reference: f64) -> f64 {
    (reference.abs() + 1.0) * EPS_BASE
}

/// Three-valued comparison of `a` against `b` under a tolerance scaled by `b`.
///
/// Returns `-1`, `0` or `1` the way `Ordering` would, but never panics on
/// non-comparable values the way a naive `partial_cmp().unwrap()` chain
/// would; callers are expected to have already filtered non-finite inputs.
#[inline]
pub fn fuzzy_compare(a: f64, b: f64) -> i32 {
    let eps = epsilon(b);
    let diff = a - b;
    if diff < -eps {
        -1
    } else if diff > eps {
        1
    } else {
        0
    }
}

#[inline]
pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    fuzzy_compare(a, b) == 0
}

/// A finite Cartesian point. Distinct from the DCEL's tagged endpoint type:
/// `Coord` never carries directional metadata, it is a plain coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Coord { x, y }
    }

    pub fn dist_sqr(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn fuzzy_eq(&self, other: &Coord) -> bool {
        fuzzy_eq(self.x, other.x) && fuzzy_eq(self.y, other.y)
    }
}

/// Sign of the cross product `(b - a) x (c - a)`, under a fixed (non-relative)
/// epsilon: `-1` clockwise, `0` collinear, `1` counter-clockwise.
///
/// `orient(a, b, c) == -orient(b, a, c)` for all finite, non-degenerate
/// triples (antisymmetry); this is relied on by the hull merge's tangent
/// search and is exercised directly in property tests.
#[inline]
pub fn orient(a: Coord, b: Coord, c: Coord) -> i32 {
    let s = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if s < -EPS_BASE {
        -1
    } else if s > EPS_BASE {
        1
    } else {
        0
    }
}

/// A line in general form `a*x + b*y + c = 0`.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    pub const fn raw(a: f64, b: f64, c: f64) -> Self {
        Line { a, b, c }
    }

    pub fn through_points(p1: Coord, p2: Coord) -> Self {
        let a = p2.y - p1.y;
        let b = p1.x - p2.x;
        let c = -a * p1.x - b * p1.y;
        Line { a, b, c }
    }

    /// The perpendicular bisector of segment `p1`-`p2`, anchored through `p`
    /// (`p` is normally the segment's own midpoint).
    pub fn perpendicular_bisector(p1: Coord, p2: Coord, p: Coord) -> Self {
        let a = p2.y - p1.y;
        let b = p1.x - p2.x;
        Line {
            a: b,
            b: -a,
            c: -b * p.x + a * p.y,
        }
    }

    pub fn is_parallel(&self, other: &Line) -> bool {
        fuzzy_eq(self.a * other.b, other.a * self.b)
    }

    pub fn is_equal(&self, other: &Line) -> bool {
        fuzzy_eq(self.a * other.b, other.a * self.b)
            && fuzzy_eq(self.a * other.c, other.a * self.c)
            && fuzzy_eq(self.b * other.c, other.b * self.c)
    }

    /// Intersection point of two lines, or `None` if parallel or coincident.
    ///
    /// Picks whichever of the two lines has a numerically safer divisor for
    /// recovering `y`, mirroring the branch the merge routines rely on to
    /// avoid dividing by a near-zero coefficient.
    pub fn intersection(&self, other: &Line) -> Option<Coord> {
        if self.is_parallel(other) || self.is_equal(other) {
            return None;
        }
        let denom = other.a * self.b - self.a * other.b;
        let px = (other.b * self.c - self.b * other.c) / denom;
        let py = if !fuzzy_eq(self.b, 0.0) {
            (-self.c - self.a * px) / self.b
        } else {
            (-other.c - other.a * px) / other.b
        };
        Some(Coord::new(px, py))
    }
}
