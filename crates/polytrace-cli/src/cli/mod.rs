//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `render` - Run a sketch headless and write one frame (SVG/PNG)
//! - `frames` - Write a numbered PNG sequence
//! - `trace` - Dump simulation state as JSON
//! - `sketch` - Check YAML sketch files, print an example
//! - `benchmark` - Measure step throughput
//!
//! The interactive player and `variants` live in `main.rs`.

pub mod common;
pub mod sketch;
pub mod render;
pub mod frames;
pub mod trace;
pub mod benchmark;

pub use common::{frame_to_svg, load_variant, svg_to_image, Loaded, SourceArgs};
pub use sketch::cmd_sketch;
pub use render::cmd_render;
pub use frames::cmd_frames;
pub use trace::cmd_trace;
pub use benchmark::cmd_benchmark;
