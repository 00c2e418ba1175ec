//! Trace command: JSON dump of the simulation state after `n` steps.
//!
//! Meant for scripts and agents that want the numbers, not the picture.

use serde::Serialize;
use polytrace::{Direction, Simulation};

use super::common::{parse_next, SourceArgs};

#[derive(Debug, Serialize)]
pub struct TraceReport {
    pub name: String,
    pub strategy: &'static str,
    pub steps: u64,
    pub accepted: usize,
    pub rejected: usize,
    pub oscillators: Vec<OscillatorTrace>,
    pub trails: Vec<TrailTrace>,
}

#[derive(Debug, Serialize)]
pub struct OscillatorTrace {
    pub edge: usize,
    pub position: f64,
    pub direction: &'static str,
    pub speed: f64,
    pub point: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct TrailTrace {
    pub pair: [usize; 2],
    pub color: String,
    pub capacity: usize,
    /// Oldest first
    pub points: Vec<[f64; 2]>,
}

impl TraceReport {
    pub fn capture(name: &str, sim: &Simulation, accepted: usize, rejected: usize) -> Self {
        let config = sim.config();
        let samples = sim.samples();

        let oscillators = sim
            .oscillators()
            .iter()
            .zip(&samples)
            .map(|(osc, sample)| OscillatorTrace {
                edge: osc.edge,
                position: osc.position(),
                direction: match osc.direction() {
                    Direction::Forward => "forward",
                    Direction::Backward => "backward",
                },
                speed: osc.speed(),
                point: [sample.point.x, sample.point.y],
            })
            .collect();

        let trails = sim
            .trails()
            .iter()
            .zip(&config.pairs)
            .enumerate()
            .map(|(i, (trail, &(a, b)))| TrailTrace {
                pair: [a, b],
                color: config.palette.trail_color(i).to_string(),
                capacity: trail.capacity(),
                points: trail.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();

        Self {
            name: name.to_string(),
            strategy: config.strategy.name(),
            steps: sim.steps(),
            accepted,
            rejected,
            oscillators,
            trails,
        }
    }
}

/// Execute the trace command.
pub fn cmd_trace(args: &[String]) -> Result<(), String> {
    let mut source = SourceArgs::default();
    let mut steps: usize = 200;
    let mut pretty = false;

    let mut i = 0;
    while i < args.len() {
        if source.accept(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-n" | "--steps" => steps = parse_next(args, &mut i, "--steps")?,
            "--pretty" => pretty = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let mut loaded = source.load()?;
    let report = loaded.sim.advance(steps);
    let trace = TraceReport::capture(&loaded.name, &loaded.sim, report.accepted, report.rejected);

    let json = if pretty {
        serde_json::to_string_pretty(&trace)
    } else {
        serde_json::to_string(&trace)
    }
    .map_err(|e| format!("Failed to serialize trace: {}", e))?;

    println!("{}", json);
    Ok(())
}

fn print_usage() {
    eprintln!("polytrace trace - Dump simulation state as JSON");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    polytrace trace [variant] [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <file>    Sketch YAML instead of a preset");
    eprintln!("    -n, --steps <n>        Steps to run (default: 200)");
    eprintln!("    --pretty               Indent the JSON");
}
