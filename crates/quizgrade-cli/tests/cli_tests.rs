//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LIBRARY: &str = r#"{
  "appName": "English Quest",
  "lessons": [
    {
      "id": "unit1",
      "title": "Unit 1",
      "kind": "quiz",
      "takePolicy": { "mode": "limit", "limit": "3" },
      "questions": [
        { "id": "q1", "type": "single", "prompt": "Which word is a verb?",
          "options": ["run", "table"], "answer": "run" },
        { "id": "q2", "type": "multi", "prompt": "Select the fruits.",
          "options": ["apple", "carrot", "banana"], "answer": ["apple", "banana"] },
        { "id": "q3", "type": "exact", "prompt": "Type: I am learning English.",
          "answer": "I am learning English." },
        { "id": "q4", "type": "contains", "prompt": "Why do you study English?",
          "keywords": ["because"], "minWords": 5 }
      ]
    },
    {
      "id": "final",
      "title": "Final Exam",
      "kind": "exam",
      "takePolicy": { "mode": "one_time" },
      "questions": [
        { "id": "q1", "type": "single", "prompt": "Past tense of 'go'?",
          "options": ["goed", "went"], "answer": "went" }
      ]
    }
  ]
}"#;

const ANSWERS: &str = r#"{
  "q1": "Run ",
  "q2": ["banana", "apple"],
  "q3": "i am learning english",
  "q4": "I study English because I like it"
}"#;

fn quizgrade(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizgrade").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("QUIZGRADE_LEDGER");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("library.json"), LIBRARY).unwrap();
    std::fs::write(dir.path().join("answers.json"), ANSWERS).unwrap();
    dir
}

fn grade(dir: &TempDir, lesson: &str) -> Command {
    let mut cmd = quizgrade(dir.path());
    cmd.args([
        "grade",
        "--library",
        "library.json",
        "--lesson",
        lesson,
        "--answers",
        "answers.json",
        "--student",
        "ana",
        "--ledger",
        "ledger.json",
    ]);
    cmd
}

#[test]
fn validate_valid_library() {
    let dir = setup();
    quizgrade(dir.path())
        .args(["validate", "--library", "library.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Library: English Quest (2 lessons)"))
        .stdout(predicate::str::contains("unit1: Unit 1 (4 questions, quiz, 3 attempt(s))"))
        .stdout(predicate::str::contains("All lessons valid."));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bad.json"),
        r#"{ "lessons": [ { "id": "l", "questions": [
            { "id": "q", "type": "single", "prompt": "Pick", "options": ["A"], "answer": "B" },
            { "id": "z", "type": "essay", "prompt": "Write" } ] } ] }"#,
    )
    .unwrap();

    quizgrade(dir.path())
        .args(["validate", "--library", "bad.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: [l/q] answer 'B' is not one of the options"))
        .stdout(predicate::str::contains("unknown question type 'essay'"))
        .stdout(predicate::str::contains("2 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    quizgrade(dir.path())
        .args(["validate", "--library", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_without_library() {
    let dir = TempDir::new().unwrap();
    quizgrade(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no library given"));
}

#[test]
fn grade_records_attempt() {
    let dir = setup();
    grade(&dir, "unit1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3/4 (75%)"))
        .stderr(predicate::str::contains("Attempts: 1/3"));

    let ledger = std::fs::read_to_string(dir.path().join("ledger.json")).unwrap();
    assert!(ledger.contains("\"ana\""));
    assert!(ledger.contains("\"lessonId\": \"unit1\""));
    assert!(ledger.contains("\"percent\": 75"));
}

#[test]
fn grade_json_output() {
    let dir = setup();
    let output = grade(&dir, "unit1")
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["correct"], 3);
    assert_eq!(result["total"], 4);
    assert_eq!(result["results"][2]["verdict"]["correct"], false);
    assert_eq!(
        result["results"][2]["verdict"]["normalized_user"],
        "i am learning english"
    );
}

#[test]
fn grade_one_time_locks_second_attempt() {
    let dir = setup();
    grade(&dir, "final").assert().success();

    grade(&dir, "final")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no attempts left"))
        .stderr(predicate::str::contains("Attempts: 1/1 (locked)"));
}

#[test]
fn grade_dry_run_does_not_record() {
    let dir = setup();
    grade(&dir, "final")
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("not recorded"));

    assert!(!dir.path().join("ledger.json").exists());
}

#[test]
fn grade_saves_result_file() {
    let dir = setup();
    grade(&dir, "unit1")
        .args(["--output", "results", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Score:** 3/4 (75%)"));

    let saved: Vec<_> = std::fs::read_dir(dir.path().join("results"))
        .unwrap()
        .collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn grade_unknown_lesson() {
    let dir = setup();
    grade(&dir, "missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lesson 'missing' not found"));
}

#[test]
fn grade_rejects_unknown_format() {
    let dir = setup();
    grade(&dir, "unit1")
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn status_shows_attempts() {
    let dir = setup();
    grade(&dir, "unit1").assert().success();
    grade(&dir, "final").assert().success();

    quizgrade(dir.path())
        .args([
            "status",
            "--library",
            "library.json",
            "--student",
            "ana",
            "--ledger",
            "ledger.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attempts: 1/3"))
        .stdout(predicate::str::contains("Attempts: 1/1 (locked)"))
        .stdout(predicate::str::contains("Locked"))
        .stdout(predicate::str::contains("Recent Scores"))
        .stdout(predicate::str::contains("Unit 1 • QUIZ • 3/4 • 75%"));
}

#[test]
fn status_without_attempts() {
    let dir = setup();
    quizgrade(dir.path())
        .args(["status", "--library", "library.json", "--student", "ben"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attempts: 0/3"))
        .stdout(predicate::str::contains("No attempts yet."));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizgrade(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizgrade.toml"))
        .stdout(predicate::str::contains("Created lessons/sample.json"));

    assert!(dir.path().join("quizgrade.toml").exists());
    assert!(dir.path().join("lessons/sample.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    quizgrade(dir.path()).arg("init").assert().success();

    // Second init should skip
    quizgrade(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_validate_uses_config() {
    let dir = TempDir::new().unwrap();
    quizgrade(dir.path()).arg("init").assert().success();

    quizgrade(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Library: English Quest (2 lessons)"))
        .stdout(predicate::str::contains("All lessons valid."));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    quizgrade(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Grade quiz submissions"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    quizgrade(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizgrade"));
}
