//! SVG in and out.
//!
//! Out: `SvgSurface` renders frames as an SVG document string, which the
//! CLI writes to disk or rasterizes with resvg.
//!
//! In: `extract_outline_from_svg` reads a polygon outline from an SVG file
//! so a sketch can bounce points along any hand-drawn shape. usvg resolves
//! CSS, transforms and basic shapes; we walk its tree for the first path.
//!
//! ## Curve Flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). These must be
//! "flattened" into line segments before they can be polygon edges. We use
//! lyon_geom for accurate curve approximation with a fixed tolerance.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use lyon_geom::{point, CubicBezierSegment, QuadraticBezierSegment};

use crate::geometry::Point;
use crate::render::{Fill, Stroke, Surface};

/// Error type for SVG parsing.
///
/// ## Rust Lesson #20: Error Handling
///
/// Rust uses `Result<T, E>` instead of exceptions:
/// - `Ok(value)` = success
/// - `Err(error)` = failure
///
/// You MUST handle errors - the compiler won't let you ignore them!
#[derive(Debug)]
pub enum SvgError {
    ParseError(String),
    NoOutline,
    TooFewVertices(usize),
}

impl std::fmt::Display for SvgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SvgError::ParseError(msg) => write!(f, "SVG parse error: {}", msg),
            SvgError::NoOutline => write!(f, "No path found in SVG"),
            SvgError::TooFewVertices(n) => {
                write!(f, "SVG outline has {} vertices, need at least 3", n)
            }
        }
    }
}

impl std::error::Error for SvgError {}

// ============================================================================
// OUTPUT
// ============================================================================

/// A `Surface` that accumulates SVG elements.
///
/// Glows become `feGaussianBlur` filters, one per distinct radius, emitted
/// in `<defs>` when the document is finished.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
    glows: BTreeSet<u32>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            glows: BTreeSet::new(),
        }
    }

    /// Close the document and return it.
    pub fn finish(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push('\n');

        if !self.glows.is_empty() {
            svg.push_str("<defs>\n");
            for glow in &self.glows {
                // Canvas shadowBlur is roughly twice the Gaussian deviation
                let _ = writeln!(
                    svg,
                    r#"<filter id="glow-{g}" x="-100%" y="-100%" width="300%" height="300%"><feGaussianBlur stdDeviation="{d}" result="blur"/><feMerge><feMergeNode in="blur"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#,
                    g = glow,
                    d = *glow as f64 / 2.0
                );
            }
            svg.push_str("</defs>\n");
        }

        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn filter_attr(&mut self, glow: f64) -> String {
        if glow > 0.0 {
            let key = glow.round().max(1.0) as u32;
            self.glows.insert(key);
            format!(r#" filter="url(#glow-{})""#, key)
        } else {
            String::new()
        }
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, background: &str) {
        self.body.clear();
        self.glows.clear();
        let _ = writeln!(
            self.body,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape_attr(background)
        );
    }

    fn stroke_path(&mut self, points: &[Point], closed: bool, stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        let filter = self.filter_attr(stroke.glow);

        let mut d = String::new();
        for (i, p) in points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{}{:.2},{:.2} ", cmd, p.x, p.y);
        }
        if closed {
            d.push('Z');
        }

        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.2}" stroke-opacity="{:.3}" stroke-linecap="round" stroke-linejoin="round"{}/>"#,
            d.trim_end(),
            escape_attr(stroke.color),
            stroke.width,
            stroke.alpha,
            filter
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
        let filter = self.filter_attr(fill.glow);
        let _ = writeln!(
            self.body,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="{:.3}"{}/>"#,
            center.x,
            center.y,
            radius,
            escape_attr(fill.color),
            fill.alpha,
            filter
        );
    }
}

/// Escape text for a double-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// INPUT
// ============================================================================

/// Tolerance for curve flattening.
/// Lower = more points, smoother curves, slower.
const CURVE_TOLERANCE: f32 = 0.1;

/// Extract the vertices of the first path in an SVG document.
///
/// ## Rust Lesson #21: The ? Operator
///
/// `expression?` is sugar for:
/// ```text
/// match expression {
///     Ok(v) => v,
///     Err(e) => return Err(e.into()),
/// }
/// ```
pub fn extract_outline_from_svg(svg_content: &str) -> Result<Vec<Point>, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::ParseError(e.to_string()))?;

    let path = first_path(tree.root()).ok_or(SvgError::NoOutline)?;
    let points = path_to_outline(path);

    if points.len() < 3 {
        Err(SvgError::TooFewVertices(points.len()))
    } else {
        Ok(points)
    }
}

/// Depth-first search for the first path (root is a Group in usvg 0.45).
fn first_path(group: &usvg::Group) -> Option<&usvg::Path> {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => {
                if let Some(path) = first_path(group) {
                    return Some(path);
                }
            }
            usvg::Node::Path(path) => return Some(&**path),
            // Ignore text, images, etc.
            _ => {}
        }
    }
    None
}

/// Flatten the first subpath of a usvg path into vertices.
fn path_to_outline(path: &usvg::Path) -> Vec<Point> {
    use usvg::tiny_skia_path::PathSegment;

    let mut points = Vec::new();
    let mut last_point: Option<(f32, f32)> = None;

    for cmd in path.data().segments() {
        match cmd {
            PathSegment::MoveTo(p) => {
                // Only the outer subpath counts
                if !points.is_empty() {
                    break;
                }
                points.push(Point::new(p.x as f64, p.y as f64));
                last_point = Some((p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                points.push(Point::new(p.x as f64, p.y as f64));
                last_point = Some((p.x, p.y));
            }
            PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                        points.push(Point::new(segment.to.x as f64, segment.to.y as f64));
                    });
                } else {
                    points.push(Point::new(p.x as f64, p.y as f64));
                }
                last_point = Some((p.x, p.y));
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                        points.push(Point::new(segment.to.x as f64, segment.to.y as f64));
                    });
                } else {
                    points.push(Point::new(p.x as f64, p.y as f64));
                }
                last_point = Some((p.x, p.y));
            }
            PathSegment::Close => break,
        }
    }

    // Flattening and explicit closing both leave repeated points, which
    // would become zero-length edges
    points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
    if points.len() > 1 && points[0].distance(points[points.len() - 1]) < 1e-6 {
        points.pop();
    }

    points
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_rect() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect x="10" y="10" width="80" height="80"/>
            </svg>
        "#;

        let outline = extract_outline_from_svg(svg).unwrap();
        assert_eq!(outline.len(), 4); // rect = 4 points
    }

    #[test]
    fn explicitly_closed_polygon_drops_repeat() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <path d="M 10,10 L 90,10 L 50,90 L 10,10 Z"/>
            </svg>
        "#;

        let outline = extract_outline_from_svg(svg).unwrap();
        assert_eq!(outline.len(), 3);
    }

    #[test]
    fn no_outline_error() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
            </svg>
        "#;

        let result = extract_outline_from_svg(svg);
        assert!(matches!(result, Err(SvgError::NoOutline)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            extract_outline_from_svg("not svg at all"),
            Err(SvgError::ParseError(_))
        ));
    }

    #[test]
    fn curve_flattening_circle() {
        // Without flattening a circle is only its 4 Bézier endpoints
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <circle cx="50" cy="50" r="40"/>
            </svg>
        "#;

        let outline = extract_outline_from_svg(svg).unwrap();
        assert!(outline.len() > 20,
            "Circle should have many points from curve flattening, got {}",
            outline.len());
    }

    #[test]
    fn surface_emits_elements_and_filters() {
        let mut surface = SvgSurface::new(800.0, 800.0);
        surface.clear("#000000");
        surface.stroke_path(
            &[Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0)],
            true,
            &Stroke { color: "#ff0000", width: 2.0, alpha: 0.5, glow: 10.0 },
        );
        surface.fill_circle(
            Point::new(5.0, 5.0),
            3.0,
            &Fill { color: "#00ff00", alpha: 1.0, glow: 0.0 },
        );
        let svg = surface.finish();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"<filter id="glow-10""#));
        assert!(svg.contains(r#"d="M0.00,0.00 L10.00,10.00 L20.00,0.00 Z""#));
        assert!(svg.contains(r#"filter="url(#glow-10)""#));
        assert!(svg.contains(r##"<circle cx="5.00" cy="5.00" r="3.00" fill="#00ff00""##));
    }

    #[test]
    fn rendered_frame_parses_back() {
        let mut sim = crate::sim::Simulation::from_variant(crate::variant::Variant::SquareNormals)
            .unwrap();
        sim.set_guide_visible(true);
        sim.advance(20);

        let mut surface = SvgSurface::new(800.0, 800.0);
        sim.render(&mut surface);
        let svg = surface.finish();

        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default());
        assert!(tree.is_ok());
    }

    #[test]
    fn colors_are_escaped() {
        assert_eq!(escape_attr("#ff6b6b"), "#ff6b6b");
        assert_eq!(escape_attr(r#"a"<&>'"#), "a&quot;&lt;&amp;&gt;&apos;");
    }

    #[test]
    fn hostile_palette_still_parses() {
        use crate::config::{EngineConfig, OscillatorConfig, Palette, Shape, Strategy};

        let hostile = r#"#f00" x="<"#;
        let config = EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 250.0 },
            Strategy::EdgeNormals,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.0, 0.008),
            OscillatorConfig::new(1, 0.3, 0.011),
        ])
        .with_pairs(vec![(0, 1)])
        .with_palette(Palette::new(&[hostile], &[hostile], &[hostile]));

        let mut sim = crate::sim::Simulation::new(config).unwrap();
        sim.set_guide_visible(true);
        sim.advance(20);

        let mut surface = SvgSurface::new(800.0, 800.0);
        sim.render(&mut surface);
        let svg = surface.finish();

        assert!(!svg.contains(hostile));
        assert!(usvg::Tree::from_str(&svg, &usvg::Options::default()).is_ok());
    }
}
