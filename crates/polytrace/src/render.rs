//! Drawing simulation state onto a surface.
//!
//! ## Rust Lesson #15: Traits as Seams
//!
//! A trait is like a TypeScript interface. `render_frame` only knows about
//! the three drawing calls in `Surface`; whether they end up in an SVG
//! string, a pixel buffer or a test recorder is up to the implementor.
//!
//! Rendering never mutates the simulation: it takes `&Simulation`.

use crate::config::Strategy;
use crate::geometry::Point;
use crate::intersect::Line;
use crate::sim::Simulation;
use crate::trail::Trail;

/// Glow used on the active polygon edges.
const EDGE_GLOW: f64 = 10.0;
const EDGE_WIDTH: f64 = 4.0;
const GUIDE_WIDTH: f64 = 2.0;
const GUIDE_ALPHA: f64 = 0.5;
const MARKER_GLOW: f64 = 20.0;
const OUTLINE_COLOR: &str = "#ffffff";
const MARKER_CORE_COLOR: &str = "#ffffff";

/// Stroke parameters for one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub alpha: f64,
    /// Blur radius, 0 = none
    pub glow: f64,
}

/// Fill parameters for one disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill<'a> {
    pub color: &'a str,
    pub alpha: f64,
    pub glow: f64,
}

/// Something frames can be drawn on.
pub trait Surface {
    /// Paint the whole surface with `background`.
    fn clear(&mut self, background: &str);

    /// Polyline through `points`, closed back to the first point if `closed`.
    fn stroke_path(&mut self, points: &[Point], closed: bool, stroke: &Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill);
}

/// How a trail fades from oldest to newest point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailStyle {
    /// One segment per point pair, growing wider and more opaque
    Tapered { width_gain: f64, alpha_gain: f64 },
    /// Thin polyline plus a dot per point
    Dotted,
}

/// Visual parameters of one sketch.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub outline_alpha: f64,
    pub trail: TrailStyle,
    /// Outer radius of a moving point marker
    pub marker_radius: f64,
    /// Radius of the white core inside a marker
    pub marker_core_radius: f64,
    /// Radius of the disc on each trail's newest point
    pub head_radius: f64,
    pub head_glow: f64,
    /// Half-length of drawn normal lines, or chord overshoot
    pub guide_extent: f64,
    /// Also draw edges reflected through the center
    pub mirror_edges: bool,
    /// Also draw each marker mirrored across the center along its normal
    pub mirror_markers: bool,
}

impl RenderStyle {
    /// Defaults of the normal-line sketches.
    pub fn normals() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            background: "#0a0a0a".to_string(),
            outline_alpha: 0.2,
            trail: TrailStyle::Tapered { width_gain: 5.0, alpha_gain: 0.6 },
            marker_radius: 14.0,
            marker_core_radius: 7.0,
            head_radius: 6.0,
            head_glow: 15.0,
            guide_extent: 800.0,
            mirror_edges: false,
            mirror_markers: true,
        }
    }

    /// Defaults of the chord sketches.
    pub fn chords() -> Self {
        Self {
            outline_alpha: 0.3,
            trail: TrailStyle::Tapered { width_gain: 5.0, alpha_gain: 0.8 },
            marker_radius: 12.0,
            marker_core_radius: 5.0,
            guide_extent: 300.0,
            mirror_markers: false,
            ..Self::normals()
        }
    }

    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::EdgeNormals => Self::normals(),
            Strategy::Chords => Self::chords(),
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::normals()
    }
}

/// Draw one frame of `sim` onto `surface`.
///
/// Back to front: background, guide geometry (outline and active edges),
/// trails, guide lines and markers, then the newest point of every trail.
pub fn render_frame<S: Surface>(sim: &Simulation, style: &RenderStyle, surface: &mut S) {
    let config = sim.config();
    let palette = &config.palette;
    let center = config.center;
    let samples = sim.samples();

    surface.clear(&style.background);

    if sim.guide_visible() {
        surface.stroke_path(
            sim.polygon().vertices(),
            true,
            &Stroke {
                color: OUTLINE_COLOR,
                width: GUIDE_WIDTH,
                alpha: style.outline_alpha,
                glow: 0.0,
            },
        );

        for (i, osc) in sim.oscillators().iter().enumerate() {
            let edge = sim.edges()[osc.edge];
            let stroke = Stroke {
                color: palette.edge_color(i),
                width: EDGE_WIDTH,
                alpha: 1.0,
                glow: EDGE_GLOW,
            };
            surface.stroke_path(&[edge.start, edge.end], false, &stroke);

            if style.mirror_edges {
                let mirror = edge.reflect_through(center);
                surface.stroke_path(&[mirror.start, mirror.end], false, &stroke);
            }
        }
    }

    for (i, trail) in sim.trails().iter().enumerate() {
        draw_trail(surface, trail, palette.trail_color(i), style.trail);
    }

    if sim.guide_visible() {
        match config.strategy {
            Strategy::EdgeNormals => {
                for (i, sample) in samples.iter().enumerate() {
                    let (from, to) = Line::along_normal(sample).span(style.guide_extent);
                    surface.stroke_path(
                        &[from, to],
                        false,
                        &Stroke {
                            color: palette.edge_color(i),
                            width: GUIDE_WIDTH,
                            alpha: GUIDE_ALPHA,
                            glow: 0.0,
                        },
                    );
                }
            }
            Strategy::Chords => {
                for (j, chord) in config.chords.iter().enumerate() {
                    let a = samples[chord.from].point;
                    let b = samples[chord.to].point;
                    // Coincident endpoints have no direction to extend along
                    let Some(dir) = b.sub(a).normalized() else {
                        continue;
                    };
                    let from = a.sub(dir.scale(style.guide_extent));
                    let to = b.add(dir.scale(style.guide_extent));
                    surface.stroke_path(
                        &[from, to],
                        false,
                        &Stroke {
                            color: palette.line_color(j),
                            width: GUIDE_WIDTH,
                            alpha: GUIDE_ALPHA,
                            glow: 0.0,
                        },
                    );
                }
            }
        }

        for (i, sample) in samples.iter().enumerate() {
            let color = palette.edge_color(i);
            draw_marker(surface, sample.point, color, style);
            if style.mirror_markers {
                draw_marker(surface, sample.mirror_across(center), color, style);
            }
        }
    }

    for (i, trail) in sim.trails().iter().enumerate() {
        if let Some(head) = trail.latest() {
            surface.fill_circle(
                head,
                style.head_radius,
                &Fill {
                    color: palette.trail_color(i),
                    alpha: 1.0,
                    glow: style.head_glow,
                },
            );
        }
    }
}

fn draw_trail<S: Surface>(surface: &mut S, trail: &Trail, color: &str, style: TrailStyle) {
    match style {
        TrailStyle::Tapered { width_gain, alpha_gain } => {
            for segment in trail.segments() {
                surface.stroke_path(
                    &[segment.from, segment.to],
                    false,
                    &Stroke {
                        color,
                        width: 0.5 + segment.progress * width_gain,
                        alpha: 0.1 + segment.progress * alpha_gain,
                        glow: 0.0,
                    },
                );
            }
        }
        TrailStyle::Dotted => {
            if trail.len() < 2 {
                return;
            }
            surface.stroke_path(
                &trail.points(),
                false,
                &Stroke { color, width: 2.0, alpha: 0.7, glow: 0.0 },
            );
            let len = trail.len() as f64;
            for (i, point) in trail.iter().enumerate() {
                let progress = i as f64 / len;
                surface.fill_circle(
                    *point,
                    1.0 + progress * 2.0,
                    &Fill { color, alpha: 0.3 + progress * 0.7, glow: 0.0 },
                );
            }
        }
    }
}

fn draw_marker<S: Surface>(surface: &mut S, at: Point, color: &str, style: &RenderStyle) {
    surface.fill_circle(
        at,
        style.marker_radius,
        &Fill { color, alpha: 1.0, glow: MARKER_GLOW },
    );
    surface.fill_circle(
        at,
        style.marker_core_radius,
        &Fill { color: MARKER_CORE_COLOR, alpha: 1.0, glow: 0.0 },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Chord, EngineConfig, OscillatorConfig, Shape};

    /// Records drawing calls instead of drawing.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear(String),
        Path { points: Vec<Point>, closed: bool, color: String, width: f64, alpha: f64 },
        Circle { center: Point, radius: f64, color: String },
    }

    impl Surface for Recorder {
        fn clear(&mut self, background: &str) {
            self.calls.push(Call::Clear(background.to_string()));
        }

        fn stroke_path(&mut self, points: &[Point], closed: bool, stroke: &Stroke) {
            self.calls.push(Call::Path {
                points: points.to_vec(),
                closed,
                color: stroke.color.to_string(),
                width: stroke.width,
                alpha: stroke.alpha,
            });
        }

        fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) {
            self.calls.push(Call::Circle {
                center,
                radius,
                color: fill.color.to_string(),
            });
        }
    }

    fn square_sim() -> Simulation {
        let config = EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 250.0 },
            Strategy::EdgeNormals,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.0, 0.008),
            OscillatorConfig::new(1, 0.3, 0.011),
        ])
        .with_pairs(vec![(0, 1)]);
        Simulation::new(config).unwrap()
    }

    #[test]
    fn empty_frame_is_just_background() {
        let sim = square_sim();
        let mut rec = Recorder::default();
        sim.render(&mut rec);
        assert_eq!(rec.calls, vec![Call::Clear("#0a0a0a".to_string())]);
    }

    #[test]
    fn tapered_trail_draws_one_segment_per_pair() {
        let mut sim = square_sim();
        sim.advance(4);
        let mut rec = Recorder::default();
        sim.render(&mut rec);

        let paths: Vec<_> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Path { width, alpha, .. } => Some((*width, *alpha)),
                _ => None,
            })
            .collect();
        assert_eq!(paths.len(), 3);
        // Newest segment: progress 3/4
        assert!((paths[2].0 - (0.5 + 0.75 * 5.0)).abs() < 1e-12);
        assert!((paths[2].1 - (0.1 + 0.75 * 0.6)).abs() < 1e-12);

        // Head marker last, on the newest point
        let head = sim.trails()[0].latest().unwrap();
        assert!(matches!(rec.calls.last(), Some(Call::Circle { center, .. }) if *center == head));
    }

    #[test]
    fn guide_adds_outline_edges_lines_and_markers() {
        let mut sim = square_sim();
        sim.set_guide_visible(true);
        let mut rec = Recorder::default();
        sim.render(&mut rec);

        // clear, outline, 2 edges, 2 normal lines, 2 x (marker + core) x (point + mirror)
        assert_eq!(rec.calls.len(), 1 + 1 + 2 + 2 + 8);
        assert!(matches!(&rec.calls[1], Call::Path { closed: true, points, .. } if points.len() == 4));
        match &rec.calls[4] {
            Call::Path { points, .. } => {
                // Normal line of the top edge at t = 0 is vertical through x = 150
                assert!((points[0].x - 150.0).abs() < 1e-9);
                assert!((points[1].x - 150.0).abs() < 1e-9);
                assert!((points[1].y - points[0].y).abs() > 1599.0);
            }
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[test]
    fn chord_guides_use_line_colors() {
        let config = EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 280.0 },
            Strategy::Chords,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.5, 0.01),
            OscillatorConfig::new(1, 0.5, 0.01),
            OscillatorConfig::new(2, 0.5, 0.01),
            OscillatorConfig::new(3, 0.5, 0.01),
        ])
        .with_chords(vec![Chord::new(0, 2), Chord::new(1, 3)])
        .with_pairs(vec![(0, 1)])
        .with_palette(crate::config::Palette::new(&[], &["#aaaaaa", "#bbbbbb"], &[]));

        let mut sim = Simulation::new(config).unwrap();
        sim.set_guide_visible(true);
        let mut rec = Recorder::default();
        sim.render(&mut rec);

        let chord_colors: Vec<_> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Path { color, .. } if color.starts_with("#aa") || color.starts_with("#bb") => {
                    Some(color.clone())
                }
                _ => None,
            })
            .collect();
        assert_eq!(chord_colors, vec!["#aaaaaa", "#bbbbbb"]);
    }

    #[test]
    fn dotted_trail_draws_polyline_and_dots() {
        let mut sim = square_sim().with_style(RenderStyle {
            trail: TrailStyle::Dotted,
            ..RenderStyle::normals()
        });
        sim.advance(3);
        let mut rec = Recorder::default();
        sim.render(&mut rec);

        // clear, polyline, 3 dots, head
        assert_eq!(rec.calls.len(), 6);
        assert!(matches!(&rec.calls[1], Call::Path { points, .. } if points.len() == 3));
        assert!(matches!(&rec.calls[2], Call::Circle { radius, .. } if *radius == 1.0));
    }

    #[test]
    fn dotted_trail_needs_two_points() {
        let mut sim = square_sim().with_style(RenderStyle {
            trail: TrailStyle::Dotted,
            ..RenderStyle::normals()
        });
        sim.advance(1);
        let mut rec = Recorder::default();
        sim.render(&mut rec);

        // clear and the head disc only
        assert_eq!(rec.calls.len(), 2);
        assert!(matches!(&rec.calls[1], Call::Circle { .. }));
    }

    #[test]
    fn mirrored_edges_match_primary_stroke() {
        let mut sim = square_sim().with_style(RenderStyle {
            mirror_edges: true,
            ..RenderStyle::normals()
        });
        sim.set_guide_visible(true);
        let mut rec = Recorder::default();
        sim.render(&mut rec);

        // After clear and outline: edge, mirror, edge, mirror
        let edges: Vec<_> = rec.calls[2..6]
            .iter()
            .map(|c| match c {
                Call::Path { color, width, alpha, .. } => (color.clone(), *width, *alpha),
                other => panic!("expected a path, got {:?}", other),
            })
            .collect();
        assert_eq!(edges[0], edges[1]);
        assert_eq!(edges[2], edges[3]);
        assert_eq!(edges[1].1, EDGE_WIDTH);
        assert_eq!(edges[1].2, 1.0);
    }
}
