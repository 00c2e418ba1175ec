//! Core geometry types for polytrace.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! In JS you'd write: `const point = { x: 1.0, y: 2.0 }`
//! In Rust, we define a `struct` with explicit types.
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = like console.log, lets you print with `{:?}`
//! - `Clone` = can duplicate the value (like spread: `{...obj}`)
//! - `Copy` = can copy implicitly (small stack values only)
//! - `PartialEq` = can compare with `==`

use std::f64::consts::PI;

use crate::edge::Edge;

/// A 2D point with x,y coordinates.
///
/// Also doubles as a 2D vector (directions, normals). Keeping one type
/// avoids conversions in the hot per-frame math.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A closed polygon with immutable vertices in winding order.
///
/// ## Rust Lesson #4: Ownership & Vec
///
/// `Vec<Point>` is like a JS array `Point[]` - a growable list.
/// This struct OWNS its vertices and only hands out `&[Point]` slices,
/// so nobody can move a corner after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

// ============================================================================
// IMPLEMENTATIONS (methods)
// ============================================================================

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        self.sub(other).length()
    }

    #[inline]
    pub fn add(&self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    #[inline]
    pub fn sub(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    #[inline]
    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product (the 2x2 determinant).
    #[inline]
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    ///
    /// ## Rust Lesson #6: Option<T>
    ///
    /// Rust has no `null` or `undefined`. A zero-length vector has no
    /// direction, so we say so in the type instead of returning NaNs.
    #[inline]
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self.scale(1.0 / len))
        } else {
            None
        }
    }

    /// Linear interpolation: `self + t * (other - self)`.
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Point reflection through `center` (`2c - p`).
    #[inline]
    pub fn reflect_through(&self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }
}

impl Polygon {
    /// Regular N-gon inscribed in a circle.
    ///
    /// Vertex `i` sits at angle `i * 2π/N - π/2 + rotation`, so with no
    /// rotation the first vertex points straight up (screen coordinates,
    /// y grows downward).
    pub fn regular(center: Point, radius: f64, sides: usize, rotation: f64) -> Self {
        let step = 2.0 * PI / sides as f64;
        let vertices = (0..sides)
            .map(|i| {
                let angle = step * i as f64 - PI / 2.0 + rotation;
                Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            })
            .collect();
        Self { vertices }
    }

    /// Axis-aligned square: top-left, top-right, bottom-right, bottom-left.
    pub fn square(center: Point, half_size: f64) -> Self {
        Self {
            vertices: vec![
                Point::new(center.x - half_size, center.y - half_size),
                Point::new(center.x + half_size, center.y - half_size),
                Point::new(center.x + half_size, center.y + half_size),
                Point::new(center.x - half_size, center.y + half_size),
            ],
        }
    }

    /// Polygon from an explicit vertex list (e.g. a custom quadrilateral).
    pub fn from_vertices(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edge `i` runs from vertex `i` to vertex `i + 1` (wrapping).
    pub fn edge(&self, index: usize) -> Option<Edge> {
        let n = self.vertices.len();
        if index >= n || n < 2 {
            return None;
        }
        Some(Edge::new(self.vertices[index], self.vertices[(index + 1) % n]))
    }

    /// All edges in winding order.
    pub fn edges(&self) -> Vec<Edge> {
        (0..self.vertices.len())
            .filter_map(|i| self.edge(i))
            .collect()
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        if self.vertices.is_empty() {
            return None;
        }

        let min_x = self.vertices.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = self.vertices.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = self.vertices.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = self.vertices.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Some((min_x, min_y, max_x, max_y))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn normalized_zero_is_none() {
        assert_eq!(Point::new(0.0, 0.0).normalized(), None);
        let n = Point::new(3.0, 4.0).normalized().unwrap();
        assert!(close(n.x, 0.6) && close(n.y, 0.8));
    }

    #[test]
    fn reflect_through_center() {
        let p = Point::new(100.0, 50.0).reflect_through(Point::new(400.0, 400.0));
        assert_eq!(p, Point::new(700.0, 750.0));
    }

    #[test]
    fn regular_first_vertex_is_top() {
        let center = Point::new(400.0, 400.0);
        let hex = Polygon::regular(center, 280.0, 6, 0.0);
        assert_eq!(hex.len(), 6);
        let top = hex.vertices()[0];
        assert!(close(top.x, 400.0), "x = {}", top.x);
        assert!(close(top.y, 120.0), "y = {}", top.y);
    }

    #[test]
    fn regular_vertices_on_circle() {
        let center = Point::new(400.0, 400.0);
        for sides in [3, 4, 5, 6, 8] {
            let poly = Polygon::regular(center, 280.0, sides, 0.0);
            for v in poly.vertices() {
                assert!(close(v.distance(center), 280.0));
            }
        }
    }

    #[test]
    fn edges_wrap_around() {
        let square = Polygon::square(Point::new(400.0, 400.0), 250.0);
        let edges = square.edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].end, square.vertices()[0]);
        assert_eq!(edges[0].start, Point::new(150.0, 150.0));
        assert_eq!(edges[0].end, Point::new(650.0, 150.0));
        assert!(square.edge(4).is_none());
    }

    #[test]
    fn polygon_bbox() {
        let poly = Polygon::square(Point::new(5.0, 5.0), 5.0);
        assert_eq!(poly.bounding_box(), Some((0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn empty_polygon_bbox() {
        let poly = Polygon::from_vertices(vec![]);
        assert_eq!(poly.bounding_box(), None);
        assert!(poly.edges().is_empty());
    }
}
