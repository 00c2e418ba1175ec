//! Engine configuration.
//!
//! Every sketch variant is one `EngineConfig`: a shape, the edges that carry
//! moving points, how lines are built from them, and which line pairs get a
//! trail.

use crate::edge::Edge;
use crate::error::EngineError;
use crate::geometry::{Point, Polygon};
use crate::intersect::{DEFAULT_EPSILON, DEFAULT_MAX_OFFSET};
use crate::oscillator::Direction;

/// Fallback colors when a palette runs short.
const FALLBACK_COLORS: &[&str] = &[
    "#ff6b6b", "#4ecdc4", "#ffd93d", "#a855f7", "#22c55e", "#f97316", "#3b82f6", "#ec4899",
];

/// Upper bound on polygon vertices. Keeps per-step work and allocations
/// bounded for shapes that come from sketch files.
pub const MAX_VERTICES: usize = 4096;

/// Polygon shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Regular N-gon inscribed in a circle of `radius`
    Regular { sides: usize, radius: f64, rotation: f64 },
    /// Axis-aligned square
    Square { half_size: f64 },
    /// Explicit vertex list in winding order
    Vertices(Vec<Point>),
}

impl Shape {
    /// Build the polygon around `center`. Explicit vertices ignore `center`.
    pub fn build(&self, center: Point) -> Polygon {
        match self {
            Shape::Regular { sides, radius, rotation } => {
                Polygon::regular(center, *radius, *sides, *rotation)
            }
            Shape::Square { half_size } => Polygon::square(center, *half_size),
            Shape::Vertices(points) => Polygon::from_vertices(points.clone()),
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        match self {
            Shape::Regular { sides, radius, .. } => {
                if *sides < 3 {
                    return Err(EngineError::TooFewVertices(*sides));
                }
                if *sides > MAX_VERTICES {
                    return Err(EngineError::TooManyVertices(*sides));
                }
                if !(*radius > 0.0 && radius.is_finite()) {
                    return Err(EngineError::InvalidSize(*radius));
                }
            }
            Shape::Square { half_size } => {
                if !(*half_size > 0.0 && half_size.is_finite()) {
                    return Err(EngineError::InvalidSize(*half_size));
                }
            }
            Shape::Vertices(points) => {
                if points.len() < 3 {
                    return Err(EngineError::TooFewVertices(points.len()));
                }
                if points.len() > MAX_VERTICES {
                    return Err(EngineError::TooManyVertices(points.len()));
                }
                let non_finite = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite()));
                if let Some(i) = non_finite {
                    return Err(EngineError::NonFiniteVertex(i));
                }
                // All points on one horizontal or vertical line
                let outline = Polygon::from_vertices(points.clone());
                if let Some((min_x, min_y, max_x, max_y)) = outline.bounding_box() {
                    if !(max_x > min_x && max_y > min_y) {
                        return Err(EngineError::FlatOutline);
                    }
                }
            }
        }
        Ok(())
    }
}

/// How lines are built from the moving points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One line per moving point, along its edge normal
    EdgeNormals,
    /// One line per chord joining two moving points
    Chords,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::EdgeNormals => "normals",
            Strategy::Chords => "chords",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "normals" | "normal" | "edge-normals" => Some(Strategy::EdgeNormals),
            "chords" | "chord" | "diagonals" => Some(Strategy::Chords),
            _ => None,
        }
    }
}

/// Initial state of one moving point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorConfig {
    pub edge: usize,
    pub start: f64,
    pub speed: f64,
    pub direction: Direction,
}

impl OscillatorConfig {
    pub const fn new(edge: usize, start: f64, speed: f64) -> Self {
        Self {
            edge,
            start,
            speed,
            direction: Direction::Forward,
        }
    }
}

/// A chord joins the moving points of two oscillators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub from: usize,
    pub to: usize,
}

impl Chord {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Display colors. Indexes wrap around, empty lists fall back to a default
/// set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    pub edges: Vec<String>,
    pub lines: Vec<String>,
    pub trails: Vec<String>,
}

impl Palette {
    pub fn new(edges: &[&str], lines: &[&str], trails: &[&str]) -> Self {
        let owned = |list: &[&str]| list.iter().map(|c| c.to_string()).collect();
        Self {
            edges: owned(edges),
            lines: owned(lines),
            trails: owned(trails),
        }
    }

    pub fn edge_color(&self, index: usize) -> &str {
        pick(&self.edges, index)
    }

    pub fn line_color(&self, index: usize) -> &str {
        pick(&self.lines, index)
    }

    pub fn trail_color(&self, index: usize) -> &str {
        pick(&self.trails, index)
    }
}

fn pick(colors: &[String], index: usize) -> &str {
    if colors.is_empty() {
        FALLBACK_COLORS[index % FALLBACK_COLORS.len()]
    } else {
        &colors[index % colors.len()]
    }
}

/// Every `(i, j)` with `i < j < count`, in lexicographic order.
///
/// For 4 lines: `(0,1) (0,2) (0,3) (1,2) (1,3) (2,3)`.
pub fn all_pairs(count: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(count * count.saturating_sub(1) / 2);
    for i in 0..count {
        for j in (i + 1)..count {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Complete description of one sketch.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub center: Point,
    pub shape: Shape,
    pub strategy: Strategy,
    pub oscillators: Vec<OscillatorConfig>,
    /// Only used by `Strategy::Chords`
    pub chords: Vec<Chord>,
    /// Indices into the oscillators (normals) or the chords (chords)
    pub pairs: Vec<(usize, usize)>,
    pub trail_length: usize,
    pub epsilon: f64,
    pub max_offset: f64,
    pub palette: Palette,
}

impl EngineConfig {
    /// A config with default tolerances and an empty palette.
    pub fn new(center: Point, shape: Shape, strategy: Strategy) -> Self {
        Self {
            center,
            shape,
            strategy,
            oscillators: Vec::new(),
            chords: Vec::new(),
            pairs: Vec::new(),
            trail_length: 50,
            epsilon: DEFAULT_EPSILON,
            max_offset: DEFAULT_MAX_OFFSET,
            palette: Palette::default(),
        }
    }

    pub fn with_oscillators(mut self, oscillators: Vec<OscillatorConfig>) -> Self {
        self.oscillators = oscillators;
        self
    }

    pub fn with_chords(mut self, chords: Vec<Chord>) -> Self {
        self.chords = chords;
        self
    }

    pub fn with_pairs(mut self, pairs: Vec<(usize, usize)>) -> Self {
        self.pairs = pairs;
        self
    }

    /// Track every pair of lines.
    pub fn with_all_pairs(mut self) -> Self {
        self.pairs = all_pairs(self.line_count());
        self
    }

    pub fn with_trail_length(mut self, trail_length: usize) -> Self {
        self.trail_length = trail_length;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Number of lines built per step.
    pub fn line_count(&self) -> usize {
        match self.strategy {
            Strategy::EdgeNormals => self.oscillators.len(),
            Strategy::Chords => self.chords.len(),
        }
    }

    /// Check the config and build its polygon.
    pub fn validate(&self) -> Result<Polygon, EngineError> {
        self.shape.validate()?;
        let polygon = self.shape.build(self.center);
        let edges: Vec<Edge> = polygon.edges();

        for (i, edge) in edges.iter().enumerate() {
            if edge.is_degenerate() {
                return Err(EngineError::DegenerateEdge(i));
            }
        }

        for (i, osc) in self.oscillators.iter().enumerate() {
            if osc.edge >= edges.len() {
                return Err(EngineError::EdgeOutOfRange {
                    oscillator: i,
                    edge: osc.edge,
                    edges: edges.len(),
                });
            }
            if !(0.0..=1.0).contains(&osc.start) {
                return Err(EngineError::StartOutOfRange { oscillator: i, start: osc.start });
            }
            if !(osc.speed > 0.0 && osc.speed.is_finite()) {
                return Err(EngineError::InvalidSpeed { oscillator: i, speed: osc.speed });
            }
        }

        match self.strategy {
            Strategy::Chords => {
                if self.chords.is_empty() {
                    return Err(EngineError::StrategyMismatch(
                        "chords strategy needs at least one chord".to_string(),
                    ));
                }
                for (i, chord) in self.chords.iter().enumerate() {
                    for end in [chord.from, chord.to] {
                        if end >= self.oscillators.len() {
                            return Err(EngineError::ChordOutOfRange { chord: i, oscillator: end });
                        }
                    }
                }
            }
            Strategy::EdgeNormals => {
                if !self.chords.is_empty() {
                    return Err(EngineError::StrategyMismatch(
                        "normals strategy does not use chords".to_string(),
                    ));
                }
            }
        }

        let lines = self.line_count();
        for (i, &(a, b)) in self.pairs.iter().enumerate() {
            for index in [a, b] {
                if index >= lines {
                    return Err(EngineError::PairOutOfRange { pair: i, index, lines });
                }
            }
            if a == b {
                return Err(EngineError::SelfPair { pair: i, index: a });
            }
        }

        if self.trail_length == 0 {
            return Err(EngineError::ZeroTrailLength);
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(EngineError::InvalidTolerance { name: "epsilon", value: self.epsilon });
        }
        if !(self.max_offset > 0.0) {
            return Err(EngineError::InvalidTolerance {
                name: "max_offset",
                value: self.max_offset,
            });
        }

        Ok(polygon)
    }
}
