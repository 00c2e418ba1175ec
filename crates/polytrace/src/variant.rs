//! Built-in sketch presets.
//!
//! Each variant is nothing more than an `EngineConfig` plus a `RenderStyle`;
//! the engine itself is the same for all of them.

use crate::config::{Chord, EngineConfig, OscillatorConfig, Palette, Shape, Strategy};
use crate::geometry::Point;
use crate::render::{RenderStyle, TrailStyle};

/// Center of every preset (800 x 800 surface).
pub const CENTER: Point = Point::new(400.0, 400.0);

/// Circumradius of the regular presets.
const RADIUS: f64 = 280.0;

/// Metadata for UI display.
#[derive(Debug, Clone, Copy)]
pub struct VariantMetadata {
    /// Polygon label ("hexagon", ...)
    pub shape_label: &'static str,
    /// Brief description of the sketch
    pub description: &'static str,
}

impl VariantMetadata {
    pub const fn new(shape_label: &'static str, description: &'static str) -> Self {
        Self { shape_label, description }
    }
}

/// Available presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    HexagonNormals,
    SquareNormals,
    PentagonNormals,
    OctagonNormals,
    SquareChords,
    HexagonChords,
    OctagonChords,
}

impl Variant {
    /// Get all presets, in menu order.
    pub fn all() -> &'static [Variant] {
        &[
            Variant::HexagonNormals,
            Variant::SquareNormals,
            Variant::PentagonNormals,
            Variant::OctagonNormals,
            Variant::SquareChords,
            Variant::HexagonChords,
            Variant::OctagonChords,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::HexagonNormals => "hexagon-normals",
            Variant::SquareNormals => "square-normals",
            Variant::PentagonNormals => "pentagon-normals",
            Variant::OctagonNormals => "octagon-normals",
            Variant::SquareChords => "square-chords",
            Variant::HexagonChords => "hexagon-chords",
            Variant::OctagonChords => "octagon-chords",
        }
    }

    /// Parse a preset name (case-insensitive, with a few aliases).
    pub fn from_name(name: &str) -> Option<Variant> {
        match name.to_lowercase().as_str() {
            "hexagon-normals" | "hexagon" | "hexagon-v1" | "default" => Some(Variant::HexagonNormals),
            "square-normals" | "square" | "square-v1" => Some(Variant::SquareNormals),
            "pentagon-normals" | "pentagon" | "pentagon-v1" => Some(Variant::PentagonNormals),
            "octagon-normals" | "octagon" | "octagon-v1" => Some(Variant::OctagonNormals),
            "square-chords" | "square-v2" => Some(Variant::SquareChords),
            "hexagon-chords" | "hexagon-v2" => Some(Variant::HexagonChords),
            "octagon-chords" | "octagon-v2" => Some(Variant::OctagonChords),
            _ => None,
        }
    }

    pub fn metadata(&self) -> VariantMetadata {
        match self {
            Variant::HexagonNormals => VariantMetadata::new(
                "hexagon",
                "Normals from 3 adjacent edges, dotted trails for each pair",
            ),
            Variant::SquareNormals => {
                VariantMetadata::new("square", "Normals from the top and right edges")
            }
            Variant::PentagonNormals => {
                VariantMetadata::new("pentagon", "Normals from all 5 edges, all 10 pairs traced")
            }
            Variant::OctagonNormals => {
                VariantMetadata::new("octagon", "Normals from 4 edges with their mirrored twins")
            }
            Variant::SquareChords => VariantMetadata::new(
                "square",
                "Chords between opposite edges of a square, one crossing traced",
            ),
            Variant::HexagonChords => {
                VariantMetadata::new("hexagon", "Three chords between opposite hexagon edges")
            }
            Variant::OctagonChords => {
                VariantMetadata::new("octagon", "Four chords between opposite octagon edges")
            }
        }
    }

    /// Next preset in menu order (wraps).
    pub fn next(&self) -> Variant {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Previous preset in menu order (wraps).
    pub fn prev(&self) -> Variant {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    /// Engine configuration of this preset.
    pub fn config(&self) -> EngineConfig {
        match self {
            Variant::HexagonNormals => EngineConfig::new(CENTER, regular(6), Strategy::EdgeNormals)
                .with_oscillators(vec![
                    OscillatorConfig::new(0, 0.0, 0.008),
                    OscillatorConfig::new(1, 0.3, 0.011),
                    OscillatorConfig::new(2, 0.6, 0.015),
                ])
                .with_pairs(vec![(0, 1), (1, 2), (0, 2)])
                .with_trail_length(40)
                .with_palette(Palette::new(
                    &["#ff6b6b", "#4ecdc4", "#ffd93d"],
                    &[],
                    &["#ff69b4", "#7fff00", "#ff8c00"],
                )),

            Variant::SquareNormals => EngineConfig::new(
                CENTER,
                Shape::Square { half_size: 250.0 },
                Strategy::EdgeNormals,
            )
            .with_oscillators(vec![
                OscillatorConfig::new(0, 0.0, 0.008),
                OscillatorConfig::new(1, 0.3, 0.011),
            ])
            .with_pairs(vec![(0, 1)])
            .with_trail_length(50)
            .with_palette(Palette::new(&["#ff6b6b", "#4ecdc4"], &[], &["#ff69b4"])),

            Variant::PentagonNormals => {
                EngineConfig::new(CENTER, regular(5), Strategy::EdgeNormals)
                    .with_oscillators(spread(5, |i| i as f64 * 0.2, |i| 0.005 + 0.002 * i as f64))
                    .with_all_pairs()
                    .with_trail_length(50)
                    .with_palette(Palette::new(
                        &["#ff6b6b", "#4ecdc4", "#ffd93d", "#a855f7", "#22c55e"],
                        &[],
                        &[
                            "#ff69b4", "#ff8c00", "#ffd700", "#adff2f", "#00ffff", "#00fa9a",
                            "#87ceeb", "#da70d6", "#f0e68c", "#dda0dd",
                        ],
                    ))
            }

            Variant::OctagonNormals => EngineConfig::new(CENTER, regular(8), Strategy::EdgeNormals)
                .with_oscillators(spread(4, |i| i as f64 * 0.25, |i| 0.006 + 0.003 * i as f64))
                .with_all_pairs()
                .with_trail_length(50)
                .with_palette(Palette::new(
                    &["#ff6b6b", "#4ecdc4", "#ffd93d", "#a855f7"],
                    &[],
                    &["#ff69b4", "#ff8c00", "#adff2f", "#7fff00", "#00ffff", "#da70d6"],
                )),

            Variant::SquareChords => EngineConfig::new(
                CENTER,
                Shape::Square { half_size: RADIUS },
                Strategy::Chords,
            )
            .with_oscillators(spread(4, |i| i as f64 * 0.25, |i| 0.005 + 0.002 * i as f64))
            .with_chords(vec![Chord::new(0, 2), Chord::new(1, 3)])
            .with_pairs(vec![(0, 1)])
            .with_trail_length(100)
            .with_palette(Palette::new(
                &["#ff6b6b", "#4ecdc4", "#ffd93d", "#a855f7"],
                &["#ff69b4", "#7fff00"],
                &["#00ffff"],
            )),

            Variant::HexagonChords => {
                let starts = [0.0, 0.17, 0.33, 0.5, 0.67, 0.83];
                EngineConfig::new(CENTER, regular(6), Strategy::Chords)
                    .with_oscillators(spread(6, |i| starts[i], |i| 0.005 + 0.002 * i as f64))
                    .with_chords(vec![Chord::new(0, 3), Chord::new(1, 4), Chord::new(2, 5)])
                    .with_pairs(vec![(0, 1), (1, 2), (0, 2)])
                    .with_trail_length(60)
                    .with_palette(Palette::new(
                        &["#ff6b6b", "#4ecdc4", "#ffd93d", "#a855f7", "#22c55e", "#f97316"],
                        &["#ff69b4", "#7fff00", "#00ffff"],
                        &["#ff1493", "#ffd700", "#00fa9a"],
                    ))
            }

            Variant::OctagonChords => EngineConfig::new(CENTER, regular(8), Strategy::Chords)
                .with_oscillators(spread(8, |i| i as f64 * 0.125, |i| 0.004 + 0.002 * i as f64))
                .with_chords((0..4).map(|i| Chord::new(i, i + 4)).collect())
                .with_all_pairs()
                .with_trail_length(60)
                .with_palette(Palette::new(
                    &[
                        "#ff6b6b", "#4ecdc4", "#ffd93d", "#a855f7", "#22c55e", "#f97316",
                        "#3b82f6", "#ec4899",
                    ],
                    &["#ff69b4", "#7fff00", "#00ffff", "#ffa500"],
                    &["#ff1493", "#adff2f", "#ffd700", "#00fa9a", "#87ceeb", "#da70d6"],
                )),
        }
    }

    /// Render style of this preset.
    pub fn style(&self) -> RenderStyle {
        match self {
            Variant::HexagonNormals => RenderStyle {
                trail: TrailStyle::Dotted,
                mirror_edges: true,
                ..RenderStyle::normals()
            },
            Variant::SquareNormals => RenderStyle::normals(),
            Variant::PentagonNormals => RenderStyle {
                trail: TrailStyle::Tapered { width_gain: 4.0, alpha_gain: 0.7 },
                marker_radius: 12.0,
                marker_core_radius: 5.0,
                head_radius: 5.0,
                head_glow: 12.0,
                mirror_markers: false,
                ..RenderStyle::normals()
            },
            Variant::OctagonNormals => RenderStyle {
                mirror_edges: true,
                ..RenderStyle::normals()
            },
            Variant::SquareChords => RenderStyle {
                head_radius: 8.0,
                head_glow: 20.0,
                ..RenderStyle::chords()
            },
            Variant::HexagonChords => RenderStyle::chords(),
            Variant::OctagonChords => RenderStyle {
                guide_extent: 400.0,
                ..RenderStyle::chords()
            },
        }
    }
}

fn regular(sides: usize) -> Shape {
    Shape::Regular { sides, radius: RADIUS, rotation: 0.0 }
}

/// One oscillator per edge `0..count`.
fn spread(
    count: usize,
    start: impl Fn(usize) -> f64,
    speed: impl Fn(usize) -> f64,
) -> Vec<OscillatorConfig> {
    (0..count)
        .map(|i| OscillatorConfig::new(i, start(i), speed(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Simulation;

    #[test]
    fn names_round_trip() {
        for variant in Variant::all() {
            assert_eq!(Variant::from_name(variant.name()), Some(*variant));
        }
        assert_eq!(Variant::from_name("HEXAGON-V2"), Some(Variant::HexagonChords));
        assert_eq!(Variant::from_name("square"), Some(Variant::SquareNormals));
        assert_eq!(Variant::from_name("nonagon"), None);
    }

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(Variant::OctagonChords.next(), Variant::HexagonNormals);
        assert_eq!(Variant::HexagonNormals.prev(), Variant::OctagonChords);
        for variant in Variant::all() {
            assert_eq!(variant.next().prev(), *variant);
        }
    }

    #[test]
    fn pair_counts() {
        assert_eq!(Variant::PentagonNormals.config().pairs.len(), 10);
        assert_eq!(Variant::OctagonNormals.config().pairs.len(), 6);
        assert_eq!(Variant::OctagonChords.config().pairs.len(), 6);
        assert_eq!(Variant::HexagonChords.config().chords.len(), 3);
    }

    #[test]
    fn every_variant_runs() {
        for variant in Variant::all() {
            let config = variant.config();
            let capacity = config.trail_length;
            let mut sim = Simulation::new(config)
                .unwrap_or_else(|e| panic!("{} is invalid: {}", variant.name(), e))
                .with_style(variant.style());

            let report = sim.advance(1000);
            assert!(report.accepted > 0, "{} never accepted a point", variant.name());

            for trail in sim.trails() {
                assert!(trail.len() <= capacity);
                for p in trail.iter() {
                    assert!((p.x - CENTER.x).abs() < 600.0);
                    assert!((p.y - CENTER.y).abs() < 600.0);
                }
            }
        }
    }

    #[test]
    fn every_variant_has_a_description() {
        for variant in Variant::all() {
            assert!(!variant.metadata().description.is_empty());
        }
    }
}
