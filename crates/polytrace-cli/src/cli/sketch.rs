//! Sketch files: YAML overrides on top of a preset.
//!
//! Every field is optional. Whatever a sketch leaves out comes from its
//! `base` preset (default `hexagon-normals`), so the smallest useful sketch
//! is a single line such as `trail_length: 200`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use polytrace::{
    all_pairs, extract_outline_from_svg, Chord, Direction, OscillatorConfig, Point, Shape,
    Simulation, Strategy, TrailStyle, Variant, RenderStyle,
};

use super::common::DEFAULT_VARIANT;

/// A sketch file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sketch {
    /// Title shown in the player
    #[serde(default)]
    pub name: Option<String>,

    /// Preset the sketch starts from
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub center: Option<[f64; 2]>,

    #[serde(default)]
    pub shape: Option<ShapeSpec>,

    /// "normals" or "chords"
    #[serde(default)]
    pub strategy: Option<String>,

    #[serde(default)]
    pub oscillators: Option<Vec<OscillatorSpec>>,

    /// Oscillator index pairs, chords strategy only
    #[serde(default)]
    pub chords: Option<Vec<[usize; 2]>>,

    /// Either `all` or a list of line index pairs
    #[serde(default)]
    pub pairs: Option<PairsSpec>,

    #[serde(default)]
    pub trail_length: Option<usize>,

    #[serde(default)]
    pub epsilon: Option<f64>,

    #[serde(default)]
    pub max_offset: Option<f64>,

    #[serde(default)]
    pub palette: Option<PaletteSpec>,

    /// "tapered" or "dotted"
    #[serde(default)]
    pub trail_style: Option<String>,

    /// Start with the guide overlay visible
    #[serde(default)]
    pub guide: Option<bool>,
}

/// Polygon shape, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeSpec {
    Regular {
        sides: usize,
        radius: f64,
        /// Degrees, clockwise on screen
        #[serde(default)]
        rotation: f64,
    },
    Square {
        half_size: f64,
    },
    Vertices {
        points: Vec<[f64; 2]>,
    },
    /// First path of an SVG file
    Svg {
        path: String,
    },
}

/// One moving point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OscillatorSpec {
    pub edge: usize,
    #[serde(default)]
    pub start: f64,
    pub speed: f64,
    /// Start moving towards t = 0
    #[serde(default)]
    pub reverse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PairsSpec {
    /// Only "all" is accepted
    Keyword(String),
    List(Vec<[usize; 2]>),
}

/// Color overrides, each list replaces the preset's list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteSpec {
    #[serde(default)]
    pub edges: Option<Vec<String>>,
    #[serde(default)]
    pub lines: Option<Vec<String>>,
    #[serde(default)]
    pub trails: Option<Vec<String>>,
    #[serde(default)]
    pub background: Option<String>,
}

impl ShapeSpec {
    fn to_shape(&self) -> Result<Shape, String> {
        Ok(match self {
            ShapeSpec::Regular { sides, radius, rotation } => Shape::Regular {
                sides: *sides,
                radius: *radius,
                rotation: rotation.to_radians(),
            },
            ShapeSpec::Square { half_size } => Shape::Square { half_size: *half_size },
            ShapeSpec::Vertices { points } => {
                Shape::Vertices(points.iter().map(|[x, y]| Point::new(*x, *y)).collect())
            }
            ShapeSpec::Svg { path } => {
                let content = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read {}: {}", path, e))?;
                let outline = extract_outline_from_svg(&content)
                    .map_err(|e| format!("{}: {}", path, e))?;
                Shape::Vertices(outline)
            }
        })
    }
}

impl Sketch {
    /// Load a sketch from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read sketch file: {}", e))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content)
            .map_err(|e| format!("Failed to parse sketch YAML: {}", e))
    }

    fn base_variant(&self) -> Result<Variant, String> {
        match &self.base {
            Some(name) => {
                Variant::from_name(name).ok_or_else(|| format!("Unknown base preset: {}", name))
            }
            None => Ok(DEFAULT_VARIANT),
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.name, &self.base) {
            (Some(name), _) => name.clone(),
            (None, Some(base)) => format!("sketch ({})", base),
            (None, None) => "sketch".to_string(),
        }
    }

    /// Apply the overrides to the base preset and build a simulation.
    pub fn build(&self) -> Result<Simulation, String> {
        let variant = self.base_variant()?;
        let mut config = variant.config();
        let mut style = variant.style();

        if let Some([x, y]) = self.center {
            config.center = Point::new(x, y);
        }
        if let Some(shape) = &self.shape {
            config.shape = shape.to_shape()?;
        }

        let mut lines_changed = false;

        if let Some(name) = &self.strategy {
            let strategy =
                Strategy::from_name(name).ok_or_else(|| format!("Unknown strategy: {}", name))?;
            if strategy != config.strategy {
                config.strategy = strategy;
                style = RenderStyle {
                    background: style.background,
                    ..RenderStyle::for_strategy(strategy)
                };
                if strategy == Strategy::EdgeNormals {
                    config.chords.clear();
                }
                lines_changed = true;
            }
        }

        if let Some(oscillators) = &self.oscillators {
            config.oscillators = oscillators
                .iter()
                .map(|o| OscillatorConfig {
                    direction: if o.reverse { Direction::Backward } else { Direction::Forward },
                    ..OscillatorConfig::new(o.edge, o.start, o.speed)
                })
                .collect();
            lines_changed = true;
        }

        if let Some(chords) = &self.chords {
            config.chords = chords.iter().map(|[a, b]| Chord::new(*a, *b)).collect();
            lines_changed = true;
        }

        match &self.pairs {
            Some(PairsSpec::Keyword(word)) if word.eq_ignore_ascii_case("all") => {
                config.pairs = all_pairs(config.line_count());
            }
            Some(PairsSpec::Keyword(word)) => {
                return Err(format!("Invalid pairs: {} (use `all` or a list)", word));
            }
            Some(PairsSpec::List(list)) => {
                config.pairs = list.iter().map(|[a, b]| (*a, *b)).collect();
            }
            // New lines invalidate the preset's pairs
            None if lines_changed => config.pairs = all_pairs(config.line_count()),
            None => {}
        }

        if let Some(length) = self.trail_length {
            config.trail_length = length;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(max_offset) = self.max_offset {
            config.max_offset = max_offset;
        }

        if let Some(palette) = &self.palette {
            if let Some(edges) = &palette.edges {
                config.palette.edges = edges.clone();
            }
            if let Some(lines) = &palette.lines {
                config.palette.lines = lines.clone();
            }
            if let Some(trails) = &palette.trails {
                config.palette.trails = trails.clone();
            }
            if let Some(background) = &palette.background {
                style.background = background.clone();
            }
        }

        if let Some(name) = &self.trail_style {
            style.trail = match name.to_lowercase().as_str() {
                "dotted" => TrailStyle::Dotted,
                "tapered" => match style.trail {
                    TrailStyle::Tapered { .. } => style.trail,
                    TrailStyle::Dotted => TrailStyle::Tapered { width_gain: 5.0, alpha_gain: 0.6 },
                },
                other => return Err(format!("Unknown trail style: {}", other)),
            };
        }

        let mut sim = Simulation::new(config)
            .map_err(|e| format!("Invalid sketch: {}", e))?
            .with_style(style);

        if let Some(guide) = self.guide {
            sim.set_guide_visible(guide);
        }

        Ok(sim)
    }
}

/// Execute the sketch command.
pub fn cmd_sketch(args: &[String]) -> Result<(), String> {
    let mut sketch_path: Option<&str> = None;

    for arg in args {
        match arg.as_str() {
            "--example" => {
                print_example();
                return Ok(());
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            path if !path.starts_with('-') => sketch_path = Some(path),
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    let Some(path) = sketch_path else {
        print_usage();
        return Err("No sketch file specified".to_string());
    };

    let sketch = Sketch::load(path)?;
    let sim = sketch.build()?;
    let config = sim.config();

    eprintln!("Sketch: {}", sketch.display_name());
    eprintln!("Polygon: {} vertices", sim.polygon().len());
    eprintln!("Strategy: {}", config.strategy.name());
    eprintln!("Oscillators: {}", config.oscillators.len());
    eprintln!("Lines: {}", config.line_count());
    eprintln!("Tracked pairs: {}", config.pairs.len());
    eprintln!("Trail length: {}", config.trail_length);
    println!("OK");
    Ok(())
}

fn print_usage() {
    eprintln!("polytrace sketch - Check a YAML sketch file");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    polytrace sketch <sketch.yaml>");
    eprintln!("    polytrace sketch --example");
    eprintln!();
    eprintln!("Sketch files are accepted by play, render, frames, trace and");
    eprintln!("benchmark through -c <sketch.yaml>.");
}

pub const EXAMPLE: &str = r##"# Example polytrace sketch
# Every field is optional; missing ones come from the base preset.
name: "Skewed pentagon"
base: pentagon-normals

shape:
  kind: regular     # regular | square | vertices | svg
  sides: 5
  radius: 300
  rotation: 18      # degrees

strategy: normals   # normals | chords

oscillators:
  - { edge: 0, start: 0.0, speed: 0.004 }
  - { edge: 1, start: 0.5, speed: 0.009 }
  - { edge: 3, start: 0.2, speed: 0.013, reverse: true }

pairs: all          # or a list like [[0, 1], [1, 2]]

trail_length: 120
epsilon: 0.0001
max_offset: 600

palette:
  edges: ["#ff6b6b", "#4ecdc4", "#ffd93d"]
  trails: ["#ff69b4", "#7fff00", "#00ffff"]
  background: "#0a0a0a"

trail_style: tapered  # tapered | dotted
guide: true
"##;

fn print_example() {
    print!("{}", EXAMPLE);
}
