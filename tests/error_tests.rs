//! Startup validation and exit code tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the user's config and environment overrides
fn voice_auditor(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-auditor"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("VOICE_AUDITOR_RECOGNIZER")
        .env_remove("VOICE_AUDITOR_WHISPER_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("in")).unwrap();
    fs::create_dir_all(dir.path().join("out")).unwrap();
    dir
}

#[test]
fn missing_output_directory() {
    let dir = workspace();
    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn output_inside_input() {
    let dir = workspace();
    let nested = dir.path().join("in").join("keep");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("in").join("song.mp3"), b"ID3").unwrap();

    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(&nested)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must not be within"));

    assert!(dir.path().join("in").join("song.mp3").exists());
}

#[test]
fn output_equal_to_input() {
    let dir = workspace();
    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("in"))
        .assert()
        .code(1);
}

#[test]
fn sibling_with_shared_prefix_is_allowed() {
    let dir = workspace();
    let sibling = dir.path().join("in2");
    fs::create_dir_all(&sibling).unwrap();

    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(&sibling)
        .assert()
        .success();
}

#[test]
fn missing_input_directory() {
    let dir = workspace();
    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("gone"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input directory"));
}

#[test]
fn output_checked_before_input() {
    let dir = workspace();
    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("gone"))
        .arg("--output")
        .arg(dir.path().join("also-gone"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Output directory"));
}

#[test]
fn empty_input_completes() {
    let dir = workspace();
    fs::write(dir.path().join("in").join("notes.txt"), b"not audio").unwrap();

    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stderr(predicate::str::contains("All files processed"));
}

#[test]
fn invalid_poll_interval_from_config_file() {
    let dir = workspace();
    let config_dir = dir.path().join("voice-auditor");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "poll_interval = \"soon\"\n").unwrap();

    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid poll interval"));
}

#[test]
fn invalid_poll_interval_flag() {
    let dir = workspace();
    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .args(["--poll-interval", "fast"])
        .assert()
        .code(2);
}

#[cfg(not(feature = "whisper"))]
#[test]
fn whisper_unavailable_without_feature() {
    let dir = workspace();
    voice_auditor(dir.path())
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .args(["--recognizer", "whisper"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("whisper"));
}

#[test]
fn env_recognizer_is_validated() {
    let dir = workspace();
    voice_auditor(dir.path())
        .env("VOICE_AUDITOR_RECOGNIZER", "siri")
        .arg("--input")
        .arg(dir.path().join("in"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid recognizer"));
}
