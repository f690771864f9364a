//! Lesson scoring and result reports with JSON persistence.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attempts::AttemptRecord;
use crate::grading::{grade, Verdict};
use crate::model::{Answer, Lesson, LessonKind};
use crate::normalize::{percent, pretty_print};

/// The graded outcome of one question within a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// 1-based position in the lesson.
    pub index: usize,
    pub question_id: String,
    pub prompt: String,
    pub verdict: Verdict,
    /// The submitted answer as the student wrote it.
    pub user_display: String,
    /// The expected answer as the author wrote it.
    pub expected_display: String,
}

/// The graded outcome of a whole lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonResult {
    pub lesson_id: String,
    pub lesson_title: String,
    pub kind: LessonKind,
    pub results: Vec<QuestionResult>,
    /// Number of correct answers.
    pub correct: u32,
    /// Number of questions graded.
    pub total: u32,
    pub percent: u32,
}

/// Grade every question in a lesson against the submitted answers.
///
/// Questions without an entry in `answers` are graded as unanswered.
pub fn grade_lesson(lesson: &Lesson, answers: &HashMap<String, Answer>) -> LessonResult {
    let results: Vec<QuestionResult> = lesson
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let submitted = answers.get(&q.id);
            QuestionResult {
                index: i + 1,
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                verdict: grade(q, submitted),
                user_display: pretty_print(submitted),
                expected_display: pretty_print(Some(&q.expected())),
            }
        })
        .collect();

    let correct = results.iter().filter(|r| r.verdict.correct).count() as u32;
    let total = results.len() as u32;

    tracing::info!(
        lesson_id = %lesson.id,
        correct,
        total,
        "graded lesson"
    );

    LessonResult {
        lesson_id: lesson.id.clone(),
        lesson_title: lesson.title.clone(),
        kind: lesson.kind,
        results,
        correct,
        total,
        percent: percent(correct, total),
    }
}

impl LessonResult {
    /// Questions answered incorrectly.
    pub fn wrong(&self) -> impl Iterator<Item = &QuestionResult> {
        self.results.iter().filter(|r| !r.verdict.correct)
    }

    /// Build the attempt record for this result, stamped now.
    pub fn to_attempt_record(&self) -> AttemptRecord {
        AttemptRecord {
            attempt_id: Uuid::new_v4(),
            lesson_id: self.lesson_id.clone(),
            lesson_title: self.lesson_title.clone(),
            kind: self.kind,
            score: self.correct,
            total: self.total,
            percent: self.percent,
            taken_at: Utc::now(),
        }
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: LessonResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }

    /// Format the result as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "## {} ({})\n\n**Score:** {}/{} ({}%)\n\n",
            self.lesson_title, self.kind, self.correct, self.total, self.percent
        ));

        md.push_str("| # | Question | Status | Your answer | Expected |\n");
        md.push_str("|---|----------|--------|-------------|----------|\n");
        for r in &self.results {
            md.push_str(&format!(
                "| Q{} | {} | {} | {} | {} |\n",
                r.index,
                escape_cell(&r.prompt),
                if r.verdict.correct { "Correct" } else { "Wrong" },
                display_or_dash(&r.user_display),
                display_or_dash(&r.expected_display),
            ));
        }

        let wrong = self.wrong().count();
        if wrong > 0 {
            md.push_str(&format!("\n{wrong} question(s) to review.\n"));
        }

        md
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn display_or_dash(s: &str) -> String {
    if s.is_empty() {
        "—".to_string()
    } else {
        escape_cell(s)
    }
}
