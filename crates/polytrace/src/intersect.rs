//! Line/line intersection.
//!
//! Two kinds of line show up in the sketches:
//! - a moving edge point plus the edge normal (`Line::along_normal`)
//! - a chord through two moving points (`Line::through`)
//!
//! Both are "origin + t * vector", so one 2x2 solve handles them.

use crate::edge::EdgeSample;
use crate::geometry::Point;

/// Determinant threshold below which two lines count as parallel.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Half-width of the square acceptance window around the center.
pub const DEFAULT_MAX_OFFSET: f64 = 600.0;

/// An infinite line `origin + t * vector`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub origin: Point,
    pub vector: Point,
}

impl Line {
    #[inline]
    pub fn new(origin: Point, vector: Point) -> Self {
        Self { origin, vector }
    }

    /// Line through an edge sample, running along the edge normal.
    #[inline]
    pub fn along_normal(sample: &EdgeSample) -> Self {
        Self::new(sample.point, sample.normal)
    }

    /// Chord from `from` towards `to` with a unit direction vector.
    ///
    /// Returns `None` when both points coincide: there is no direction.
    #[inline]
    pub fn through(from: Point, to: Point) -> Option<Self> {
        to.sub(from)
            .normalized()
            .map(|direction| Self::new(from, direction))
    }

    /// Segment of this line from `origin - extent * vector` to
    /// `origin + extent * vector`, for drawing.
    pub fn span(&self, extent: f64) -> (Point, Point) {
        (
            self.origin.sub(self.vector.scale(extent)),
            self.origin.add(self.vector.scale(extent)),
        )
    }
}

/// Intersect two lines.
///
/// Returns `None` when `|det| < epsilon`: the lines are parallel or
/// coincident. That is a normal outcome (it happens around bounce reversals),
/// not an error.
pub fn intersect(a: &Line, b: &Line, epsilon: f64) -> Option<Point> {
    let det = a.vector.cross(b.vector);
    // NaN compares false, so it falls through to the rejection too
    if !(det.abs() >= epsilon) {
        return None;
    }

    let d = b.origin.sub(a.origin);
    let t = d.cross(b.vector) / det;

    Some(a.origin.add(a.vector.scale(t)))
}

/// Square window around the polygon center that accepted intersections
/// must fall inside.
///
/// Near-parallel lines produce points far off screen; dropping them keeps
/// trails from shooting out to infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceptance {
    pub center: Point,
    pub max_offset: f64,
}

impl Acceptance {
    #[inline]
    pub fn new(center: Point, max_offset: f64) -> Self {
        Self { center, max_offset }
    }

    /// Strictly inside the window on both axes.
    #[inline]
    pub fn accepts(&self, p: Point) -> bool {
        (p.x - self.center.x).abs() < self.max_offset
            && (p.y - self.center.y).abs() < self.max_offset
    }
}
