// Command-line tests for the complexity binary

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CSV_HEADER: &str = "picNum,picType,error,count_I,count_P,count_B,bits";

/// Test utilities for generating inputs
mod test_utils {
    use std::path::Path;

    fn sample(x: usize, y: usize) -> u8 {
        ((x * 7 + y * 13 + x * y * 3) % 251) as u8
    }

    fn frame(width: usize, height: usize, shift: usize) -> Vec<u8> {
        let chroma = width.div_ceil(2) * height.div_ceil(2);
        let mut bytes: Vec<u8> = (0..height)
            .flat_map(|y| (0..width).map(move |x| sample(x + shift, y)))
            .collect();
        bytes.extend(std::iter::repeat(128).take(2 * chroma));
        bytes
    }

    /// Write a raw I420 clip of `frames` panning pictures
    pub fn write_raw(path: &Path, width: usize, height: usize, frames: usize) {
        let bytes: Vec<u8> = (0..frames).flat_map(|i| frame(width, height, i)).collect();
        std::fs::write(path, bytes).unwrap();
    }

    /// Write the same clip as YUV4MPEG2
    pub fn write_y4m(path: &Path, width: usize, height: usize, frames: usize) {
        let mut bytes = format!("YUV4MPEG2 W{} H{} F25:1 Ip A1:1 C420jpeg\n", width, height).into_bytes();
        for i in 0..frames {
            bytes.extend_from_slice(b"FRAME\n");
            bytes.extend(frame(width, height, i));
        }
        std::fs::write(path, bytes).unwrap();
    }
}

fn complexity(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("complexity").unwrap();
    cmd.current_dir(dir)
        .env_remove("COMPLEXITY_GOP_SIZE")
        .env_remove("COMPLEXITY_B_FRAMES")
        .env_remove("COMPLEXITY_FRAMES")
        .env_remove("COMPLEXITY_OUTPUT_FORMAT")
        .env_remove("COMPLEXITY_CONFIG")
        .args(["--log-level", "warn"]);
    cmd
}

fn csv_rows(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[test]
fn test_analyze_raw_writes_one_row_per_picture() {
    let dir = TempDir::new().unwrap();
    test_utils::write_raw(&dir.path().join("clip.yuv"), 32, 32, 9);

    let output = complexity(dir.path())
        .args(["analyze", "-i", "clip.yuv", "-W", "32", "-H", "32", "-g", "4", "-b", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(CSV_HEADER))
        .get_output()
        .stdout
        .clone();

    let rows = csv_rows(&output);
    assert_eq!(rows.len(), 9);
    let types: String = rows
        .iter()
        .map(|r| r.split(',').nth(1).unwrap().to_string())
        .collect();
    assert_eq!(types, "IBPPIBPPI");
    for (i, row) in rows.iter().enumerate() {
        assert!(row.starts_with(&format!("{},", i)));
    }
}

#[test]
fn test_analyze_y4m_to_json_file() {
    let dir = TempDir::new().unwrap();
    test_utils::write_y4m(&dir.path().join("clip.y4m"), 32, 16, 6);

    complexity(dir.path())
        .args(["analyze", "-i", "clip.y4m", "-g", "3", "-b", "1", "-o", "report.json", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["records"].as_array().unwrap().len(), 6);
    assert_eq!(value["gops"].as_array().unwrap().len(), 2);
    assert_eq!(value["records"][0]["picture_type"], "I");
}

#[test]
fn test_frame_budget_limits_rows() {
    let dir = TempDir::new().unwrap();
    test_utils::write_raw(&dir.path().join("clip.yuv"), 16, 16, 10);

    let output = complexity(dir.path())
        .args(["analyze", "-i", "clip.yuv", "-W", "16", "-H", "16", "-g", "2", "-b", "0", "-n", "4"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(csv_rows(&output).len(), 4);
}

#[test]
fn test_env_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    test_utils::write_raw(&dir.path().join("clip.yuv"), 16, 16, 4);
    std::fs::write(
        dir.path().join("complexity.toml"),
        "[analysis]\ngop_size = 4\nb_frames = 0\nwidth = 16\nheight = 16\n",
    )
    .unwrap();

    let from_file = complexity(dir.path())
        .args(["analyze", "-i", "clip.yuv"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows = csv_rows(&from_file);
    assert!(rows[2].starts_with("2,P,"));

    let from_env = complexity(dir.path())
        .env("COMPLEXITY_GOP_SIZE", "2")
        .args(["analyze", "-i", "clip.yuv"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows = csv_rows(&from_env);
    assert!(rows[2].starts_with("2,I,"));
}

#[test]
fn test_raw_input_without_dimension_fails() {
    let dir = TempDir::new().unwrap();
    test_utils::write_raw(&dir.path().join("clip.yuv"), 16, 16, 2);

    complexity(dir.path())
        .args(["analyze", "-i", "clip.yuv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--width"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    complexity(dir.path())
        .args(["analyze", "-i", "missing.y4m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.y4m"));
}

#[test]
fn test_invalid_gop_size_fails() {
    let dir = TempDir::new().unwrap();
    test_utils::write_raw(&dir.path().join("clip.yuv"), 16, 16, 2);

    complexity(dir.path())
        .args(["analyze", "-i", "clip.yuv", "-W", "16", "-H", "16", "-g", "0"])
        .assert()
        .failure();
}

#[test]
fn test_inspect_reports_frames() {
    let dir = TempDir::new().unwrap();
    test_utils::write_y4m(&dir.path().join("clip.y4m"), 32, 16, 3);

    complexity(dir.path())
        .args(["inspect", "-i", "clip.y4m"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dimension: 32x16"))
        .stdout(predicate::str::contains("Frames: 3"));

    let output = complexity(dir.path())
        .args(["inspect", "-i", "clip.y4m", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["frame_count"], 3);
    assert_eq!(value["format"], "y4m");
}
