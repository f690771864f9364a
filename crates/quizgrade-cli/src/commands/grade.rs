//! The `quizgrade grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgrade_core::attempts::AttemptLedger;
use quizgrade_core::parser::load_answers;
use quizgrade_core::report::{grade_lesson, LessonResult};

use crate::config::load_config_from;

/// Arguments for a grading run.
pub struct GradeArgs {
    pub library: Option<PathBuf>,
    pub lesson: String,
    pub answers: PathBuf,
    pub student: String,
    pub ledger: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    anyhow::ensure!(!args.student.trim().is_empty(), "student ID must not be empty");
    anyhow::ensure!(
        matches!(args.format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown format '{}' (expected text, json, or markdown)",
        args.format
    );

    let config = load_config_from(args.config.as_deref())?;
    let parsed = super::open_library(args.library, config.library.as_deref())?;

    let lesson = parsed.library.lesson(&args.lesson).ok_or_else(|| {
        anyhow::anyhow!(
            "lesson '{}' not found. Available: {:?}",
            args.lesson,
            parsed
                .library
                .lessons
                .iter()
                .map(|l| l.id.as_str())
                .collect::<Vec<_>>()
        )
    })?;

    let ledger_path = args.ledger.unwrap_or(config.ledger);
    let mut ledger = AttemptLedger::load_json(&ledger_path)?;

    if !args.dry_run {
        let status = ledger.status(&args.student, &lesson.id, &lesson.take_policy);
        anyhow::ensure!(
            status.can_take,
            "no attempts left for this assignment ({status})"
        );
    }

    let answers = load_answers(&args.answers)?;
    let result = grade_lesson(lesson, &answers);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "markdown" | "md" => println!("{}", result.to_markdown()),
        _ => print_result(&result),
    }

    if let Some(dir) = args.output.or(config.output_dir) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("result-{}-{}-{timestamp}.json", args.student, lesson.id));
        result.save_json(&path)?;
        eprintln!("Result saved to: {}", path.display());
    }

    if args.dry_run {
        eprintln!("Dry run: attempt not recorded.");
        return Ok(());
    }

    let status = ledger
        .record_checked(&args.student, &lesson.take_policy, result.to_attempt_record())
        .context("failed to record attempt")?;
    ledger.save_json(&ledger_path)?;
    eprintln!("Attempt recorded. {status}");

    Ok(())
}

fn print_result(result: &LessonResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Status", "Your answer", "Expected"]);

    for r in &result.results {
        table.add_row(vec![
            Cell::new(format!("Q{}", r.index)),
            Cell::new(&r.prompt),
            Cell::new(if r.verdict.correct { "Correct" } else { "Wrong" }),
            Cell::new(dash_if_empty(&r.user_display)),
            Cell::new(dash_if_empty(&r.expected_display)),
        ]);
    }

    println!("{} ({})", result.lesson_title, result.kind);
    println!("{table}");
    println!(
        "Score: {}/{} ({}%)",
        result.correct, result.total, result.percent
    );
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}
