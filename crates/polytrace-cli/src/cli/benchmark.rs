//! Benchmark command implementation.

use std::time::Instant;

use polytrace::Variant;

use super::common::{load_variant, parse_next, Loaded, SourceArgs};

/// Execute the benchmark command.
///
/// With no variant or sketch every preset is measured.
pub fn cmd_benchmark(args: &[String]) -> Result<(), String> {
    let mut source = SourceArgs::default();
    let mut steps: usize = 100_000;

    let mut i = 0;
    while i < args.len() {
        if source.accept(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-n" | "--steps" => steps = parse_next(args, &mut i, "--steps")?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let runs: Vec<Loaded> = if source.variant.is_none() && source.sketch.is_none() {
        Variant::all()
            .iter()
            .map(|v| load_variant(*v))
            .collect::<Result<_, _>>()?
    } else {
        vec![source.load()?]
    };

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  POLYTRACE BENCHMARK: {} steps", steps);
    println!("═══════════════════════════════════════════════════════════════");
    println!("  {:18}  {:>6}  {:>10}  {:>12}  {:>9}", "Sketch", "Pairs", "Time(ms)", "Steps/sec", "Accepted");
    println!("  {:18}  {:>6}  {:>10}  {:>12}  {:>9}", "------", "-----", "--------", "---------", "--------");

    for mut run in runs {
        let pairs = run.sim.config().pairs.len();

        let start = Instant::now();
        let report = run.sim.advance(steps);
        let elapsed = start.elapsed();

        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { steps as f64 / secs } else { f64::INFINITY };
        let total = report.accepted + report.rejected;
        let accepted_pct = if total > 0 {
            100.0 * report.accepted as f64 / total as f64
        } else {
            0.0
        };

        println!(
            "  {:18}  {:>6}  {:>10.2}  {:>12.0}  {:>8.1}%",
            run.name,
            pairs,
            secs * 1000.0,
            rate,
            accepted_pct
        );
    }

    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: polytrace benchmark [variant] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <file>     Sketch YAML instead of a preset");
    eprintln!("  -n, --steps <n>         Steps per run (default: 100000)");
    eprintln!();
    eprintln!("Measures raw step throughput (no rendering). Without a variant");
    eprintln!("every preset is measured.");
}
