//! Frames command: write a numbered PNG sequence for animations.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use super::common::{frame_to_svg, next_value, parse_next, svg_to_pixmap, SourceArgs};

/// Execute the frames command.
pub fn cmd_frames(args: &[String]) -> Result<(), String> {
    let mut source = SourceArgs::default();
    let mut frames: usize = 120;
    let mut every: usize = 1;
    let mut warmup: usize = 0;
    let mut dir = PathBuf::from("frames");
    let mut scale: f32 = 1.0;
    let mut guide = false;

    let mut i = 0;
    while i < args.len() {
        if source.accept(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-n" | "--frames" => frames = parse_next(args, &mut i, "--frames")?,
            "--every" => every = parse_next(args, &mut i, "--every")?,
            "--warmup" => warmup = parse_next(args, &mut i, "--warmup")?,
            "-d" | "--dir" => dir = PathBuf::from(next_value(args, &mut i, "--dir")?),
            "--scale" => scale = parse_next(args, &mut i, "--scale")?,
            "--guide" => guide = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if every == 0 {
        return Err("--every must be at least 1".to_string());
    }
    if !(scale > 0.0) {
        return Err(format!("--scale must be positive, got {}", scale));
    }

    let mut loaded = source.load()?;
    if guide {
        loaded.sim.set_guide_visible(true);
    }

    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    loaded.sim.advance(warmup);

    eprintln!(
        "{}: {} frames, {} step(s) per frame -> {}",
        loaded.name,
        frames,
        every,
        dir.display()
    );
    let start = Instant::now();

    for frame in 0..frames {
        loaded.sim.advance(every);

        let svg = frame_to_svg(&loaded.sim);
        let pixmap = svg_to_pixmap(&svg, scale)?;
        let path = dir.join(format!("frame_{:04}.png", frame));
        pixmap
            .save_png(&path)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

        log::debug!("wrote {}", path.display());
    }

    let elapsed = start.elapsed();
    eprintln!(
        "Wrote {} frames in {:.2}s ({:.1} fps)",
        frames,
        elapsed.as_secs_f64(),
        frames as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

fn print_usage() {
    eprintln!("polytrace frames - Write a PNG sequence");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    polytrace frames [variant] [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <file>    Sketch YAML instead of a preset");
    eprintln!("    -n, --frames <n>       Number of frames (default: 120)");
    eprintln!("    --every <k>            Steps between frames (default: 1)");
    eprintln!("    --warmup <n>           Steps to run before the first frame (default: 0)");
    eprintln!("    -d, --dir <dir>        Output directory (default: frames)");
    eprintln!("    --scale <s>            Image scale factor (default: 1.0)");
    eprintln!("    --guide                Draw the guide overlay");
    eprintln!();
    eprintln!("EXAMPLE:");
    eprintln!("    polytrace frames octagon-chords -n 300 -d out && ffmpeg -i out/frame_%04d.png out.mp4");
}
