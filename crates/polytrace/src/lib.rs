//! # polytrace
//!
//! Points bounce along the edges of a polygon. Lines built from them (edge
//! normals or chords between points) are intersected pair by pair, and every
//! accepted intersection is appended to a fading trail.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod config;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod intersect;
pub mod oscillator;
pub mod render;
pub mod sim;
pub mod svg;
pub mod trail;
pub mod variant;

// Re-export common types at crate root for convenience.
pub use config::{
    all_pairs, Chord, EngineConfig, OscillatorConfig, Palette, Shape, Strategy, MAX_VERTICES,
};
pub use edge::{Edge, EdgeSample};
pub use error::EngineError;
pub use geometry::{Point, Polygon};
pub use intersect::{intersect, Acceptance, Line, DEFAULT_EPSILON, DEFAULT_MAX_OFFSET};
pub use oscillator::{bounce, Direction, Oscillator};
pub use render::{render_frame, Fill, RenderStyle, Stroke, Surface, TrailStyle};
pub use sim::{Simulation, StepReport};
pub use svg::{extract_outline_from_svg, SvgError, SvgSurface};
pub use trail::{Trail, TrailSegment};
pub use variant::{Variant, VariantMetadata, CENTER};
