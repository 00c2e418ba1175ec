//! Frame controller.
//!
//! A `Simulation` owns every piece of mutable state of one sketch: the
//! moving points, the trails and the play/guide flags. Nothing is global, so
//! several simulations can run side by side.
//!
//! The caller supplies the clock. Each `tick()` is one fixed step no matter
//! how much real time has passed, then `render()` draws the committed state:
//!
//! ```ignore
//! loop {
//!     sim.tick();
//!     sim.render(&mut surface);
//! }
//! ```

use crate::config::{EngineConfig, Strategy};
use crate::edge::{Edge, EdgeSample};
use crate::error::EngineError;
use crate::geometry::{Point, Polygon};
use crate::intersect::{intersect, Acceptance, Line};
use crate::oscillator::Oscillator;
use crate::render::{render_frame, RenderStyle, Surface};
use crate::trail::Trail;
use crate::variant::Variant;

/// Outcome counters of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Pairs whose intersection was pushed to their trail
    pub accepted: usize,
    /// Pairs skipped this step (parallel, zero-length chord, out of window)
    pub rejected: usize,
}

/// One running sketch.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: EngineConfig,
    polygon: Polygon,
    edges: Vec<Edge>,
    acceptance: Acceptance,
    oscillators: Vec<Oscillator>,
    trails: Vec<Trail>,
    running: bool,
    guide_visible: bool,
    steps: u64,
    style: RenderStyle,
}

impl Simulation {
    /// Validate `config` and set up the initial state: running, guide
    /// hidden, empty trails.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let polygon = config.validate()?;
        let edges = polygon.edges();
        let acceptance = Acceptance::new(config.center, config.max_offset);
        let oscillators = initial_oscillators(&config);
        let trails = config
            .pairs
            .iter()
            .map(|_| Trail::new(config.trail_length))
            .collect();
        let style = RenderStyle::for_strategy(config.strategy);

        log::debug!(
            "simulation: {} vertices, {} oscillators, {} {} lines, {} tracked pairs, trail length {}",
            polygon.len(),
            config.oscillators.len(),
            config.line_count(),
            config.strategy.name(),
            config.pairs.len(),
            config.trail_length
        );

        Ok(Self {
            config,
            polygon,
            edges,
            acceptance,
            oscillators,
            trails,
            running: true,
            guide_visible: false,
            steps: 0,
            style,
        })
    }

    /// A preset with its own render style.
    pub fn from_variant(variant: Variant) -> Result<Self, EngineError> {
        Ok(Self::new(variant.config())?.with_style(variant.style()))
    }

    /// Use a specific render style instead of the strategy default.
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    // ========================================================================
    // STEPPING
    // ========================================================================

    /// Advance one step if running. Returns `None` when paused.
    pub fn tick(&mut self) -> Option<StepReport> {
        if self.running {
            Some(self.step())
        } else {
            None
        }
    }

    /// Advance one step unconditionally.
    ///
    /// 1. bounce every point
    /// 2. sample the edges at the new positions
    /// 3. build the lines and intersect every tracked pair
    /// 4. push accepted points to their trails
    pub fn step(&mut self) -> StepReport {
        for osc in &mut self.oscillators {
            osc.advance();
        }

        let samples = self.samples();
        let lines = build_lines(&self.config, &samples);

        let mut report = StepReport::default();
        for (trail, &(a, b)) in self.trails.iter_mut().zip(&self.config.pairs) {
            let hit = intersect_pair(&lines, a, b, self.config.epsilon)
                .filter(|p| self.acceptance.accepts(*p));

            match hit {
                Some(point) => {
                    trail.push(point);
                    report.accepted += 1;
                }
                None => report.rejected += 1,
            }
        }

        self.steps += 1;
        report
    }

    /// Run `count` steps regardless of the running flag.
    pub fn advance(&mut self, count: usize) -> StepReport {
        let mut total = StepReport::default();
        for _ in 0..count {
            let report = self.step();
            total.accepted += report.accepted;
            total.rejected += report.rejected;
        }
        total
    }

    /// Draw the current state.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        render_frame(self, &self.style, surface);
    }

    // ========================================================================
    // CONTROLS
    // ========================================================================

    pub fn set_running(&mut self, running: bool) {
        log::trace!("running = {}", running);
        self.running = running;
    }

    pub fn toggle_running(&mut self) {
        self.set_running(!self.running);
    }

    pub fn set_guide_visible(&mut self, visible: bool) {
        log::trace!("guide visible = {}", visible);
        self.guide_visible = visible;
    }

    pub fn toggle_guide(&mut self) {
        self.set_guide_visible(!self.guide_visible);
    }

    /// Change one point's speed. Position and direction are kept.
    pub fn set_speed(&mut self, index: usize, speed: f64) -> Result<(), EngineError> {
        let count = self.oscillators.len();
        let osc = self
            .oscillators
            .get_mut(index)
            .ok_or(EngineError::NoSuchOscillator { index, count })?;

        if !(speed > 0.0 && speed.is_finite()) {
            return Err(EngineError::InvalidSpeed { oscillator: index, speed });
        }

        log::trace!("oscillator {} speed {} -> {}", index, osc.speed(), speed);
        osc.set_speed(speed);
        Ok(())
    }

    /// Empty every trail at once.
    pub fn clear_trails(&mut self) {
        log::trace!("clearing {} trails", self.trails.len());
        for trail in &mut self.trails {
            trail.clear();
        }
    }

    /// Change the trail capacity of every pair.
    pub fn set_trail_length(&mut self, length: usize) -> Result<(), EngineError> {
        if length == 0 {
            return Err(EngineError::ZeroTrailLength);
        }
        self.config.trail_length = length;
        for trail in &mut self.trails {
            trail.set_capacity(length);
        }
        Ok(())
    }

    /// Back to the configured initial positions with empty trails.
    ///
    /// Speeds changed at runtime are reset too.
    pub fn reset(&mut self) {
        self.oscillators = initial_oscillators(&self.config);
        self.clear_trails();
        self.steps = 0;
    }

    // ========================================================================
    // READ ACCESS (renderers, reports)
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn oscillators(&self) -> &[Oscillator] {
        &self.oscillators
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn guide_visible(&self) -> bool {
        self.guide_visible
    }

    /// Steps taken since construction or the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current point and normal of every oscillator.
    pub fn samples(&self) -> Vec<EdgeSample> {
        self.oscillators
            .iter()
            .map(|osc| self.edges[osc.edge].sample(osc.position()))
            .collect()
    }

    /// Current lines. `None` marks a chord whose two points coincide.
    pub fn lines(&self) -> Vec<Option<Line>> {
        build_lines(&self.config, &self.samples())
    }

    /// Accepted intersection of every tracked pair at the current state.
    pub fn intersections(&self) -> Vec<Option<Point>> {
        let lines = self.lines();
        self.config
            .pairs
            .iter()
            .map(|&(a, b)| {
                intersect_pair(&lines, a, b, self.config.epsilon)
                    .filter(|p| self.acceptance.accepts(*p))
            })
            .collect()
    }
}

fn initial_oscillators(config: &EngineConfig) -> Vec<Oscillator> {
    config
        .oscillators
        .iter()
        .map(|o| Oscillator::new(o.edge, o.start, o.direction, o.speed))
        .collect()
}

fn build_lines(config: &EngineConfig, samples: &[EdgeSample]) -> Vec<Option<Line>> {
    match config.strategy {
        Strategy::EdgeNormals => samples
            .iter()
            .map(|s| Some(Line::along_normal(s)))
            .collect(),
        Strategy::Chords => config
            .chords
            .iter()
            .map(|c| Line::through(samples[c.from].point, samples[c.to].point))
            .collect(),
    }
}

fn intersect_pair(lines: &[Option<Line>], a: usize, b: usize, epsilon: f64) -> Option<Point> {
    match (lines[a], lines[b]) {
        (Some(la), Some(lb)) => intersect(&la, &lb, epsilon),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Chord, OscillatorConfig, Shape};

    fn square_pair(trail_length: usize) -> EngineConfig {
        EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 250.0 },
            Strategy::EdgeNormals,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.0, 0.008),
            OscillatorConfig::new(1, 0.3, 0.011),
        ])
        .with_pairs(vec![(0, 1)])
        .with_trail_length(trail_length)
    }

    #[test]
    fn square_pair_fills_trail() {
        let mut sim = Simulation::new(square_pair(50)).unwrap();
        for _ in 0..1000 {
            sim.tick();
        }

        let trail = &sim.trails()[0];
        assert_eq!(trail.len(), 50);
        assert_ne!(trail.oldest(), trail.latest());
        for p in trail.iter() {
            assert!((p.x - 400.0).abs() < 600.0);
            assert!((p.y - 400.0).abs() < 600.0);
        }
        assert_eq!(sim.steps(), 1000);
    }

    #[test]
    fn first_step_lands_at_expected_point() {
        let mut sim = Simulation::new(square_pair(50)).unwrap();
        let report = sim.step();
        assert_eq!(report, StepReport { accepted: 1, rejected: 0 });

        // top edge x = 150 + 500 * 0.008, right edge y = 150 + 500 * 0.311
        let p = sim.trails()[0].latest().unwrap();
        assert!((p.x - 154.0).abs() < 1e-9);
        assert!((p.y - 305.5).abs() < 1e-9);
    }

    #[test]
    fn paused_tick_changes_nothing() {
        let mut sim = Simulation::new(square_pair(50)).unwrap();
        sim.advance(10);
        sim.set_running(false);

        let before = sim.oscillators().to_vec();
        let trail_before = sim.trails()[0].points();
        assert_eq!(sim.tick(), None);
        assert_eq!(sim.oscillators(), &before[..]);
        assert_eq!(sim.trails()[0].points(), trail_before);
        assert_eq!(sim.steps(), 10);

        sim.toggle_running();
        assert!(sim.tick().is_some());
    }

    #[test]
    fn parallel_lines_skip_push() {
        // Two oscillators on the same edge: identical normals, never meet
        let config = EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 250.0 },
            Strategy::EdgeNormals,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.1, 0.01),
            OscillatorConfig::new(0, 0.6, 0.02),
        ])
        .with_pairs(vec![(0, 1)]);

        let mut sim = Simulation::new(config).unwrap();
        let report = sim.advance(100);
        assert_eq!(report.accepted, 0);
        assert_eq!(report.rejected, 100);
        assert!(sim.trails()[0].is_empty());
    }

    #[test]
    fn opposite_edges_are_parallel() {
        // Top and bottom edges of a square have opposite normals
        let config = EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 250.0 },
            Strategy::EdgeNormals,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.1, 0.01),
            OscillatorConfig::new(2, 0.6, 0.02),
        ])
        .with_pairs(vec![(0, 1)]);

        let mut sim = Simulation::new(config).unwrap();
        sim.advance(20);
        assert!(sim.trails()[0].is_empty());
        assert_eq!(sim.intersections(), vec![None]);
    }

    #[test]
    fn chords_of_square_cross_inside() {
        let config = EngineConfig::new(
            Point::new(400.0, 400.0),
            Shape::Square { half_size: 280.0 },
            Strategy::Chords,
        )
        .with_oscillators(vec![
            OscillatorConfig::new(0, 0.0, 0.005),
            OscillatorConfig::new(1, 0.25, 0.007),
            OscillatorConfig::new(2, 0.5, 0.009),
            OscillatorConfig::new(3, 0.75, 0.011),
        ])
        .with_chords(vec![Chord::new(0, 2), Chord::new(1, 3)])
        .with_pairs(vec![(0, 1)])
        .with_trail_length(100);

        let mut sim = Simulation::new(config).unwrap();
        sim.advance(500);

        let trail = &sim.trails()[0];
        assert_eq!(trail.len(), 100);
        // A top-bottom chord and a left-right chord always cross inside
        for p in trail.iter() {
            assert!(p.x >= 120.0 - 1e-9 && p.x <= 680.0 + 1e-9);
            assert!(p.y >= 120.0 - 1e-9 && p.y <= 680.0 + 1e-9);
        }
    }

    #[test]
    fn set_speed_validates() {
        let mut sim = Simulation::new(square_pair(50)).unwrap();
        assert!(sim.set_speed(1, 0.05).is_ok());
        assert_eq!(sim.oscillators()[1].speed(), 0.05);
        assert_eq!(
            sim.set_speed(5, 0.05),
            Err(EngineError::NoSuchOscillator { index: 5, count: 2 })
        );
        assert!(matches!(sim.set_speed(0, 0.0), Err(EngineError::InvalidSpeed { .. })));
        assert!(matches!(sim.set_speed(0, f64::INFINITY), Err(EngineError::InvalidSpeed { .. })));
    }

    #[test]
    fn clear_and_reset() {
        let mut sim = Simulation::new(square_pair(20)).unwrap();
        sim.advance(30);
        sim.clear_trails();
        assert!(sim.trails()[0].is_empty());

        sim.step();
        assert_eq!(sim.trails()[0].len(), 1);

        sim.set_speed(0, 0.5).unwrap();
        sim.reset();
        assert_eq!(sim.steps(), 0);
        assert!(sim.trails()[0].is_empty());
        assert_eq!(sim.oscillators()[0].position(), 0.0);
        assert_eq!(sim.oscillators()[0].speed(), 0.008);
    }

    #[test]
    fn trail_length_can_shrink() {
        let mut sim = Simulation::new(square_pair(50)).unwrap();
        sim.advance(60);
        sim.set_trail_length(10).unwrap();
        assert_eq!(sim.trails()[0].len(), 10);
        assert_eq!(sim.config().trail_length, 10);
        assert_eq!(sim.set_trail_length(0), Err(EngineError::ZeroTrailLength));
    }

    #[test]
    fn from_variant_uses_preset_style() {
        let sim = Simulation::from_variant(Variant::HexagonNormals).unwrap();
        assert_eq!(sim.style(), &Variant::HexagonNormals.style());
        assert!(sim.is_running());
        assert!(!sim.guide_visible());
    }

    #[test]
    fn independent_simulations_do_not_interfere() {
        let mut a = Simulation::new(square_pair(50)).unwrap();
        let b = Simulation::new(square_pair(50)).unwrap();
        a.advance(25);
        assert_eq!(b.steps(), 0);
        assert!(b.trails()[0].is_empty());
        assert_eq!(a.trails()[0].len(), 25);
    }
}
