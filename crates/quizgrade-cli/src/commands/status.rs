//! The `quizgrade status` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizgrade_core::attempts::AttemptLedger;

use crate::config::load_config_from;

const RECENT_LIMIT: usize = 6;

pub fn execute(
    library: Option<PathBuf>,
    student: String,
    ledger: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parsed = super::open_library(library, config.library.as_deref())?;
    let ledger = AttemptLedger::load_json(&ledger.unwrap_or(config.ledger))?;

    println!(
        "{} — {} assignment(s) for {student}",
        parsed.library.app_name,
        parsed.library.lessons.len()
    );

    let mut table = Table::new();
    table.set_header(vec!["Lesson", "Kind", "Questions", "Attempts", "Action"]);
    for lesson in &parsed.library.lessons {
        let status = ledger.status(&student, &lesson.id, &lesson.take_policy);
        table.add_row(vec![
            Cell::new(format!("{} ({})", lesson.title, lesson.id)),
            Cell::new(lesson.kind),
            Cell::new(lesson.questions.len()),
            Cell::new(&status.status_text),
            Cell::new(if status.can_take { "Start" } else { "Locked" }),
        ]);
    }
    println!("{table}");

    let recent = ledger.recent(&student, RECENT_LIMIT);
    println!("\nRecent Scores");
    if recent.is_empty() {
        println!("  No attempts yet.");
    }
    for a in recent {
        println!(
            "  {} • {} • {}/{} • {}% ({})",
            a.lesson_title,
            a.kind.to_string().to_uppercase(),
            a.score,
            a.total,
            a.percent,
            a.taken_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
