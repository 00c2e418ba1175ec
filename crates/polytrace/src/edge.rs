//! Edge parametrization: scalar position on an edge -> 2D point and normal.

use crate::geometry::Point;

/// A polygon edge from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

/// Where a moving point currently sits on its edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSample {
    /// Position on the edge
    pub point: Point,
    /// Unit normal of the edge, `(dy, -dx) / len`
    pub normal: Point,
}

impl Edge {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// `end - start`.
    #[inline]
    pub fn direction(&self) -> Point {
        self.end.sub(self.start)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.length() > 0.0)
    }

    /// `start + t * (end - start)`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    /// Unit normal `(dy/len, -dx/len)`.
    ///
    /// This is the "inward" convention of the sketches. For a polygon wound
    /// clockwise on screen it actually points outward, but the lines built
    /// from it are the same either way. Callers guarantee `len > 0`.
    #[inline]
    pub fn normal(&self) -> Point {
        let d = self.direction();
        let len = d.length();
        Point::new(d.y / len, -d.x / len)
    }

    #[inline]
    pub fn sample(&self, t: f64) -> EdgeSample {
        EdgeSample {
            point: self.point_at(t),
            normal: self.normal(),
        }
    }

    /// The edge reflected through `center` (the opposite side of a
    /// centrally symmetric polygon).
    #[inline]
    pub fn reflect_through(&self, center: Point) -> Edge {
        Edge::new(
            self.start.reflect_through(center),
            self.end.reflect_through(center),
        )
    }
}

impl EdgeSample {
    /// Point on the normal line at the same distance from `center`, but on
    /// the other side of it.
    pub fn mirror_across(&self, center: Point) -> Point {
        let dist = center.sub(self.point).dot(self.normal);
        self.point.add(self.normal.scale(2.0 * dist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_at_endpoints_and_middle() {
        let edge = Edge::new(Point::new(150.0, 150.0), Point::new(650.0, 150.0));
        assert_eq!(edge.point_at(0.0), edge.start);
        assert_eq!(edge.point_at(1.0), edge.end);
        assert_eq!(edge.point_at(0.5), Point::new(400.0, 150.0));
    }

    #[test]
    fn normal_follows_convention() {
        // Top edge of a screen-space square, left to right
        let top = Edge::new(Point::new(150.0, 150.0), Point::new(650.0, 150.0));
        assert_eq!(top.normal(), Point::new(0.0, -1.0));

        // Right edge, top to bottom
        let right = Edge::new(Point::new(650.0, 150.0), Point::new(650.0, 650.0));
        assert_eq!(right.normal(), Point::new(1.0, 0.0));
    }

    #[test]
    fn normal_is_unit_and_perpendicular() {
        let edge = Edge::new(Point::new(10.0, 20.0), Point::new(40.0, 60.0));
        let n = edge.normal();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.dot(edge.direction()).abs() < 1e-9);
    }

    #[test]
    fn degenerate_edge_detected() {
        let p = Point::new(1.0, 1.0);
        assert!(Edge::new(p, p).is_degenerate());
        assert!(!Edge::new(p, Point::new(2.0, 1.0)).is_degenerate());
    }

    #[test]
    fn mirror_sample_across_center() {
        let center = Point::new(400.0, 400.0);
        let top = Edge::new(Point::new(150.0, 150.0), Point::new(650.0, 150.0));
        let mirror = top.sample(0.25).mirror_across(center);
        assert!((mirror.x - 275.0).abs() < 1e-9);
        assert!((mirror.y - 650.0).abs() < 1e-9);
    }
}
