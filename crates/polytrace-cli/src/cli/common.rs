//! Common utilities shared across CLI commands.

use std::str::FromStr;

use image::{DynamicImage, RgbaImage};
use polytrace::{Simulation, SvgSurface, Variant};
use resvg::usvg;
use tiny_skia::Pixmap;

use super::sketch::Sketch;

/// Preset used when no variant or sketch is given.
pub const DEFAULT_VARIANT: Variant = Variant::HexagonNormals;

/// A simulation plus the label it was loaded under.
pub struct Loaded {
    pub name: String,
    /// Preset it came from, `None` for sketch files
    pub variant: Option<Variant>,
    pub sim: Simulation,
}

/// Options every simulation-driven command accepts.
#[derive(Debug, Default)]
pub struct SourceArgs {
    pub variant: Option<String>,
    pub sketch: Option<String>,
}

impl SourceArgs {
    /// Try to consume `args[*i]` (and its value). Returns `Ok(true)` if it
    /// was a source argument.
    pub fn accept(&mut self, args: &[String], i: &mut usize) -> Result<bool, String> {
        match args[*i].as_str() {
            "-c" | "--config" => {
                self.sketch = Some(next_value(args, i, "--config")?);
                Ok(true)
            }
            arg if !arg.starts_with('-') && self.variant.is_none() => {
                self.variant = Some(arg.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Load the sketch file if given, else the named preset.
    pub fn load(&self) -> Result<Loaded, String> {
        if let Some(path) = &self.sketch {
            let sketch = Sketch::load(path)?;
            let sim = sketch.build()?;
            log::info!("loaded sketch {} ({})", path, sketch.display_name());
            return Ok(Loaded {
                name: sketch.display_name(),
                variant: None,
                sim,
            });
        }

        let variant = match &self.variant {
            Some(name) => Variant::from_name(name).ok_or_else(|| {
                format!("Unknown variant: {} (see `polytrace variants`)", name)
            })?,
            None => DEFAULT_VARIANT,
        };
        load_variant(variant)
    }
}

pub fn load_variant(variant: Variant) -> Result<Loaded, String> {
    let sim = Simulation::from_variant(variant).map_err(|e| e.to_string())?;
    Ok(Loaded {
        name: variant.name().to_string(),
        variant: Some(variant),
        sim,
    })
}

/// Value following a flag, e.g. the `50` in `-n 50`.
pub fn next_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", flag))
}

/// Parsed value following a flag.
pub fn parse_next<T: FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T, String> {
    let raw = next_value(args, i, flag)?;
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, raw))
}

/// Render the current frame as an SVG document.
pub fn frame_to_svg(sim: &Simulation) -> String {
    let style = sim.style();
    let mut surface = SvgSurface::new(style.width, style.height);
    sim.render(&mut surface);
    surface.finish()
}

/// Rasterize an SVG document, scaled by `scale`.
pub fn svg_to_pixmap(svg: &str, scale: f32) -> Result<Pixmap, String> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| format!("Failed to parse generated SVG: {}", e))?;

    let size = tree.size();
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| format!("Failed to create {}x{} pixmap", width, height))?;

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Rasterize an SVG document into an `image` buffer (for the terminal view).
pub fn svg_to_image(svg: &str, scale: f32) -> Result<DynamicImage, String> {
    let pixmap = svg_to_pixmap(svg, scale)?;
    let (width, height) = (pixmap.width(), pixmap.height());

    let rgba = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| "Failed to create image".to_string())?;

    Ok(DynamicImage::ImageRgba8(rgba))
}
