//! Integration tests for the CLI commands

use assert_cmd::cargo::cargo_bin_cmd;
use image::{Rgba, RgbaImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WORDS_JSON: &str = r#"{"words": [
  {"text": "hello", "bbox": {"x0": 10, "y0": 10, "x1": 50, "y1": 30}},
  {"text": "world", "bbox": {"x0": 60, "y0": 10, "x1": 90, "y1": 30}}
]}"#;

fn fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let image_path = dir.join("page.png");
    RgbaImage::from_pixel(100, 50, Rgba([255, 255, 255, 255]))
        .save(&image_path)
        .unwrap();
    let words_path = dir.join("words.json");
    std::fs::write(&words_path, WORDS_JSON).unwrap();
    (image_path, words_path)
}

#[test]
fn test_version_command() {
    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("readout "));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("readout "));
}

#[test]
fn test_select_prints_selected_words() {
    let dir = TempDir::new().unwrap();
    let (image, words) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(&words)
        .args(["--display-width", "200", "--from", "105,65", "--to", "15,15"]);

    cmd.assert().success().stdout("hello\n");
}

#[test]
fn test_select_whole_line_keeps_word_order() {
    let dir = TempDir::new().unwrap();
    let (image, words) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(&words)
        .args(["--from", "0,0", "--to", "100,50"]);

    cmd.assert().success().stdout("hello world\n");
}

#[test]
fn test_select_miss_prints_empty_line() {
    let dir = TempDir::new().unwrap();
    let (image, words) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(&words)
        .args(["--from", "0,40", "--to", "5,48", "--tolerance", "1"]);

    cmd.assert().success().stdout("\n");
}

#[test]
fn test_select_writes_overlay() {
    let dir = TempDir::new().unwrap();
    let (image, words) = fixture(dir.path());
    let overlay = dir.path().join("overlay.png");

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(&words)
        .arg("--overlay")
        .arg(&overlay)
        .args(["--display-width", "200", "--from", "15,15", "--to", "105,65"]);

    cmd.assert().success();
    let rendered = image::open(&overlay).unwrap();
    assert_eq!((rendered.width(), rendered.height()), (200, 100));
}

#[test]
fn test_words_lists_display_rects() {
    let dir = TempDir::new().unwrap();
    let (image, words) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("words")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(&words)
        .args(["--display-width", "200"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hello\t20,20,100,60"))
        .stdout(predicate::str::contains("world\t120,20,180,60"));
}

#[test]
fn test_select_rejects_undecodable_image() {
    let dir = TempDir::new().unwrap();
    let (_, words) = fixture(dir.path());
    let bogus = dir.path().join("bogus.png");
    std::fs::write(&bogus, b"definitely not a png").unwrap();

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&bogus)
        .arg("--words")
        .arg(&words)
        .args(["--display-width", "100", "--from", "0,0", "--to", "10,10"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_select_without_recognizer_selects_nothing() {
    let dir = TempDir::new().unwrap();
    let (image, _) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.env("PATH", "/nonexistent")
        .arg("select")
        .arg("--image")
        .arg(&image)
        .args(["--from", "0,0", "--to", "100,50"]);

    cmd.assert().success().stdout("\n");
}

#[test]
fn test_words_without_recognizer_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let (image, _) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.env("PATH", "/nonexistent")
        .arg("words")
        .arg("--image")
        .arg(&image);

    cmd.assert().success().stdout("");
}

#[test]
fn test_select_fails_on_missing_word_list() {
    let dir = TempDir::new().unwrap();
    let (image, _) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(dir.path().join("missing.json"))
        .args(["--from", "0,0", "--to", "10,10"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("recognition failed"));
}

#[cfg(unix)]
#[test]
fn test_select_speaks_through_command() {
    let dir = TempDir::new().unwrap();
    let (image, words) = fixture(dir.path());

    let mut cmd = cargo_bin_cmd!("readout");
    cmd.arg("select")
        .arg("--image")
        .arg(&image)
        .arg("--words")
        .arg(&words)
        .args(["--from", "0,0", "--to", "100,50", "--speak"])
        .args(["--speech-command", "sh", "--speech-arg=-c", "--speech-arg", "exit 0"]);

    cmd.assert().success().stdout("hello world\n");
}
