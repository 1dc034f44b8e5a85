use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use fontpath_core::fixtures::simple_font;
use serde_json::Value;
use tempfile::tempdir;

fn fontpath(font_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fontpath"))
        .args(args)
        .arg("--font-dir")
        .arg(font_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("run fontpath")
}

fn fixture_dir() -> tempfile::TempDir {
    let tmp = tempdir().expect("tempdir");
    let fonts = [
        ("Arial.ttf", "Arial", false, false),
        ("Arial Bold.ttf", "Arial", true, false),
        ("Arial Italic.ttf", "Arial", false, true),
        ("Georgia.otf", "Georgia", false, false),
    ];
    for (file, family, bold, italic) in fonts {
        fs::write(tmp.path().join(file), simple_font(family, bold, italic)).expect("write font");
    }
    fs::write(tmp.path().join("broken.ttf"), b"definitely not a font").expect("write junk");
    tmp
}

#[test]
fn find_prints_the_matching_path() {
    let fonts = fixture_dir();

    let output = fontpath(fonts.path(), &["find", "Arial", "--bold"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "stdout:\n{}", stdout);
    assert!(stdout.trim_end().ends_with("Arial Bold.ttf"));
}

#[test]
fn find_unknown_family_exits_with_error() {
    let fonts = fixture_dir();

    let output = fontpath(fonts.path(), &["find", "NoSuchFamily"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: no installed font"), "stderr: {stderr}");
}

#[test]
fn list_json_contains_every_valid_font() {
    let fonts = fixture_dir();

    let output = fontpath(fonts.path(), &["list", "--json", "--jobs", "2"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("parse json output");
    let arr = parsed.as_array().expect("list --json returns a JSON array");
    assert_eq!(arr.len(), 4);
    assert!(arr
        .iter()
        .any(|e| e["family_name"] == "Georgia" && e["is_bold"] == false));
}

#[test]
fn list_name_filter_and_ndjson() {
    let fonts = fixture_dir();

    let output = fontpath(fonts.path(), &["list", "--ndjson", "-n", "^Geo"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout:\n{}", stdout);
    let entry: Value = serde_json::from_str(lines[0]).expect("ndjson line");
    assert_eq!(entry["family_name"], "Georgia");
}

#[test]
fn list_plain_output_is_ansi_free_when_color_never() {
    let fonts = fixture_dir();

    let output = fontpath(fonts.path(), &["list", "--color", "never"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 4);
    assert!(!stdout.contains("\u{1b}["));
}

#[test]
fn inspect_reports_failures_but_prints_good_files() {
    let fonts = fixture_dir();
    let good = fonts.path().join("Georgia.otf");
    let bad = fonts.path().join("broken.ttf");

    let output = Command::new(env!("CARGO_BIN_EXE_fontpath"))
        .arg("inspect")
        .arg(&good)
        .arg(&bad)
        .output()
        .expect("run fontpath");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Georgia Regular"), "stdout: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.ttf"), "stderr: {stderr}");
    assert!(stderr.contains("1 of 2 files"), "stderr: {stderr}");
}
