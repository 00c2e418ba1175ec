//! Integration tests for polytrace CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Path to the polytrace binary built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_polytrace"))
}

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("polytrace-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

#[test]
fn variants_command_lists_all_presets() {
    let output = Command::new(binary_path())
        .arg("variants")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    for name in [
        "hexagon-normals",
        "square-normals",
        "pentagon-normals",
        "octagon-normals",
        "square-chords",
        "hexagon-chords",
        "octagon-chords",
    ] {
        assert!(stdout.contains(name), "Should list '{}'", name);
    }
}

#[test]
fn render_command_produces_svg() {
    let output = Command::new(binary_path())
        .args(["render", "square-normals", "-n", "120", "--guide"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("<svg"), "Should have SVG element");
    assert!(stdout.contains("<path"), "Should have trail paths");
    assert!(stdout.contains("<circle"), "Should have markers");
    assert!(stdout.contains("feGaussianBlur"), "Should have glow filters");
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn render_command_writes_png() {
    let dir = scratch_dir("render");
    let png = dir.join("frame.png");
    let svg = dir.join("frame.svg");

    let output = Command::new(binary_path())
        .args(["render", "octagon-chords", "-n", "300"])
        .arg("--png")
        .arg(&png)
        .args(["--png-scale", "0.5", "-o"])
        .arg(&svg)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&png).expect("PNG should exist");
    assert_eq!(&bytes[1..4], b"PNG");
    let svg_text = fs::read_to_string(&svg).expect("SVG should exist");
    assert!(svg_text.starts_with("<svg"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unknown_variant_fails() {
    let output = Command::new(binary_path())
        .args(["render", "nonagon-normals"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown variant"), "stderr: {}", stderr);
}

#[test]
fn trace_command_produces_json() {
    let output = Command::new(binary_path())
        .args(["trace", "square-normals", "-n", "1000"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).expect("Should be valid JSON");

    assert_eq!(json["steps"], 1000);
    let points = json["trails"][0]["points"].as_array().expect("points array");
    assert_eq!(points.len(), 50);
    for p in points {
        let x = p[0].as_f64().unwrap();
        let y = p[1].as_f64().unwrap();
        assert!((x - 400.0).abs() < 600.0 && (y - 400.0).abs() < 600.0);
    }
}

#[test]
fn sketch_example_round_trips() {
    let output = Command::new(binary_path())
        .args(["sketch", "--example"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let example = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(example.contains("base:"));

    let dir = scratch_dir("sketch");
    let path = dir.join("example.yaml");
    fs::write(&path, &example).expect("Failed to write sketch");

    let check = Command::new(binary_path())
        .arg("sketch")
        .arg(&path)
        .output()
        .expect("Failed to execute command");
    assert!(check.status.success(), "stderr: {}", String::from_utf8_lossy(&check.stderr));

    let trace = Command::new(binary_path())
        .args(["trace", "-n", "50", "-c"])
        .arg(&path)
        .output()
        .expect("Failed to execute command");
    assert!(trace.status.success());
    let json: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&trace.stdout).trim()).unwrap();
    assert_eq!(json["name"], "Skewed pentagon");
    assert_eq!(json["oscillators"].as_array().unwrap().len(), 3);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_sketch_fails() {
    let dir = scratch_dir("bad-sketch");
    let path = dir.join("bad.yaml");
    fs::write(&path, "base: square-normals\npairs: [[0, 0]]\n").unwrap();

    let output = Command::new(binary_path())
        .arg("sketch")
        .arg(&path)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("itself"), "stderr: {}", stderr);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn frames_command_writes_sequence() {
    let dir = scratch_dir("frames");

    let output = Command::new(binary_path())
        .args(["frames", "hexagon-normals", "-n", "3", "--every", "5", "--scale", "0.25", "-d"])
        .arg(&dir)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    for i in 0..3 {
        assert!(dir.join(format!("frame_{:04}.png", i)).exists());
    }
    assert!(!dir.join("frame_0003.png").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn benchmark_command_runs() {
    let output = Command::new(binary_path())
        .args(["benchmark", "pentagon-normals", "-n", "2000"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    assert!(combined.contains("BENCHMARK"), "Should show benchmark header");
    assert!(combined.contains("pentagon-normals"), "Should show sketch name");
    assert!(combined.contains("Steps/sec"), "Should show throughput");
}

#[test]
fn help_command_shows_usage() {
    let output = Command::new(binary_path())
        .arg("help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    assert!(combined.contains("render"), "Should mention render command");
    assert!(combined.contains("trace"), "Should mention trace command");
    assert!(combined.contains("variants"), "Should mention variants command");
}
