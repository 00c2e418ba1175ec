//! Render command: run a sketch headless and write one frame.

use std::fs;

use super::common::{frame_to_svg, next_value, parse_next, svg_to_pixmap, SourceArgs};

/// Execute the render command.
pub fn cmd_render(args: &[String]) -> Result<(), String> {
    let mut source = SourceArgs::default();
    let mut steps: usize = 600;
    let mut svg_out: Option<String> = None;
    let mut png_out: Option<String> = None;
    let mut png_scale: f32 = 1.0;
    let mut guide = false;

    let mut i = 0;
    while i < args.len() {
        if source.accept(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-n" | "--steps" => steps = parse_next(args, &mut i, "--steps")?,
            "-o" | "--output" => svg_out = Some(next_value(args, &mut i, "--output")?),
            "--png" => png_out = Some(next_value(args, &mut i, "--png")?),
            "--png-scale" => png_scale = parse_next(args, &mut i, "--png-scale")?,
            "--guide" => guide = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if !(png_scale > 0.0) {
        return Err(format!("--png-scale must be positive, got {}", png_scale));
    }

    let mut loaded = source.load()?;
    if guide {
        loaded.sim.set_guide_visible(true);
    }

    let report = loaded.sim.advance(steps);
    eprintln!(
        "{}: {} steps, {} points accepted, {} rejected",
        loaded.name, steps, report.accepted, report.rejected
    );

    let svg = frame_to_svg(&loaded.sim);

    if let Some(path) = &png_out {
        let pixmap = svg_to_pixmap(&svg, png_scale)?;
        pixmap
            .save_png(path)
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;
        eprintln!("Wrote: {} ({}x{})", path, pixmap.width(), pixmap.height());
    }

    match &svg_out {
        Some(path) => {
            fs::write(path, &svg).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
        }
        // SVG to stdout unless only a PNG was asked for
        None if png_out.is_none() => print!("{}", svg),
        None => {}
    }

    Ok(())
}

fn print_usage() {
    eprintln!("polytrace render - Run a sketch and write one frame");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    polytrace render [variant] [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <file>    Sketch YAML instead of a preset");
    eprintln!("    -n, --steps <n>        Steps to run before drawing (default: 600)");
    eprintln!("    -o, --output <file>    Output SVG file (default: stdout)");
    eprintln!("    --png <file>           Also rasterize to PNG");
    eprintln!("    --png-scale <s>        PNG scale factor (default: 1.0)");
    eprintln!("    --guide                Draw the guide overlay");
    eprintln!("    -h, --help             Show this help");
}
