//! CLI integration tests using assert_cmd.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LYRICS: &str = "[ti:Six Lines]
[00:01.00]I love you
[00:02.00]you love me
[00:03.00]sun is bright
[00:04.00]moon is dark
[00:05.00]run fast now
[00:06.00]stop right there
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();
        fs::write(dir.path().join("song.lrc"), LYRICS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn versedrill(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("versedrill").unwrap();
        cmd.env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("config.toml"))
            .arg("--database")
            .arg(self.path("drill.db"));
        cmd
    }

    fn import(&self, lyrics: &Path) {
        self.versedrill()
            .args(["import", "--title", "Six Lines", "--artist", "Band", "--lyrics"])
            .arg(lyrics)
            .assert()
            .success()
            .stdout(predicate::str::contains("(6 lines)"));
    }

    fn create_lesson(&self) -> serde_json::Value {
        let output = self
            .versedrill()
            .args(["lesson", "--user", "u1"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn import_then_list_songs() {
    let ws = Workspace::new();
    ws.versedrill()
        .arg("songs")
        .assert()
        .success()
        .stdout(predicate::str::contains("No songs imported yet."));

    ws.import(&ws.path("song.lrc"));

    ws.versedrill()
        .arg("songs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Six Lines"))
        .stdout(predicate::str::contains("1 song(s)."));
}

#[test]
fn import_missing_file_fails() {
    let ws = Workspace::new();
    ws.versedrill()
        .args(["import", "--title", "t", "--artist", "a", "--lyrics"])
        .arg(ws.path("missing.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read lyrics"));
}

#[test]
fn lesson_without_songs_is_a_validation_error() {
    let ws = Workspace::new();
    ws.versedrill()
        .args(["lesson", "--user", "u1"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No songs available"));
}

#[test]
fn blank_user_is_rejected() {
    let ws = Workspace::new();
    ws.import(&ws.path("song.lrc"));
    ws.versedrill()
        .args(["lesson", "--user", ""])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("userId is required"));
}

#[test]
fn lesson_answer_and_summary() {
    let ws = Workspace::new();
    ws.import(&ws.path("song.lrc"));

    let lesson = ws.create_lesson();
    let lesson_id = lesson["lessonId"].as_str().unwrap().to_string();
    let items = lesson["items"].as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0]["type"], "fillblanks");
    let correct_word = items[0]["correctWord"].as_str().unwrap().to_string();

    ws.versedrill()
        .args(["answer", "--lesson", &lesson_id, "--item", "0", "--input", &correct_word])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"correct\": true"));

    // Second answer for the same item is a conflict
    ws.versedrill()
        .args(["answer", "--lesson", &lesson_id, "--item", "0", "--input", "zzz"])
        .assert()
        .code(2);

    ws.versedrill()
        .args(["answer", "--lesson", &lesson_id, "--item", "1", "--input", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"correct\": false"));

    let output = ws
        .versedrill()
        .args(["summary", "--lesson", &lesson_id])
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total"], 6);
    assert_eq!(summary["correct"], 4);
    assert_eq!(summary["wrong"], 1);
    assert_eq!(summary["scheduledForRepractice"], serde_json::json!(["zzz"]));
}

#[test]
fn arrange_answer_reports_correct() {
    let ws = Workspace::new();
    ws.import(&ws.path("song.lrc"));
    let lesson = ws.create_lesson();
    let lesson_id = lesson["lessonId"].as_str().unwrap();

    ws.versedrill()
        .args(["answer", "--lesson", lesson_id, "--item", "5", "--kind", "arrange"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"correct\": true"));
}

#[test]
fn unknown_lesson_is_not_found() {
    let ws = Workspace::new();
    ws.versedrill()
        .args(["summary", "--lesson", "does-not-exist"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Lesson not found"));
}

#[test]
fn out_of_range_item_is_a_validation_error() {
    let ws = Workspace::new();
    ws.import(&ws.path("song.lrc"));
    let lesson = ws.create_lesson();
    let lesson_id = lesson["lessonId"].as_str().unwrap();

    ws.versedrill()
        .args(["answer", "--lesson", lesson_id, "--item", "6", "--input", "love"])
        .assert()
        .code(4);
}

#[test]
fn bad_config_fails_before_running() {
    let ws = Workspace::new();
    fs::write(ws.path("config.toml"), "[storage]\ntimeout_ms = 0\n").unwrap();
    ws.versedrill()
        .arg("songs")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timeout_ms"));
}
