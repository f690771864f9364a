//! Attempt history and the ledger that enforces attempt policies.
//!
//! The ledger keeps one growing list of attempt records per student. Policy
//! checks and appends go through `&mut self`, so checking a policy and
//! recording the attempt it allows happen as one step.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AttemptError;
use crate::model::{AttemptPolicy, LessonKind};
use crate::policy::{evaluate_attempt_policy, AttemptStatus};

/// One finished attempt at a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub attempt_id: Uuid,
    pub lesson_id: String,
    pub lesson_title: String,
    #[serde(default)]
    pub kind: LessonKind,
    /// Number of correct answers.
    pub score: u32,
    /// Number of questions graded.
    pub total: u32,
    pub percent: u32,
    pub taken_at: DateTime<Utc>,
}

/// Read and append access to recorded attempts.
pub trait AttemptHistory {
    /// All attempts by a student, oldest first.
    fn attempts_for(&self, student_id: &str) -> &[AttemptRecord];

    /// Append an attempt for a student.
    fn record(&mut self, student_id: &str, record: AttemptRecord);

    /// Number of attempts a student has made at one lesson.
    fn count_for_lesson(&self, student_id: &str, lesson_id: &str) -> u32 {
        self.attempts_for(student_id)
            .iter()
            .filter(|a| a.lesson_id == lesson_id)
            .count() as u32
    }
}

/// In-memory attempt store with JSON persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptLedger {
    attempts: BTreeMap<String, Vec<AttemptRecord>>,
}

impl AttemptHistory for AttemptLedger {
    fn attempts_for(&self, student_id: &str) -> &[AttemptRecord] {
        self.attempts
            .get(student_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn record(&mut self, student_id: &str, record: AttemptRecord) {
        tracing::debug!(
            student_id,
            lesson_id = %record.lesson_id,
            score = record.score,
            total = record.total,
            "recording attempt"
        );
        self.attempts
            .entry(student_id.to_string())
            .or_default()
            .push(record);
    }
}

impl AttemptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current policy status for a student and lesson.
    pub fn status(&self, student_id: &str, lesson_id: &str, policy: &AttemptPolicy) -> AttemptStatus {
        evaluate_attempt_policy(policy, self.count_for_lesson(student_id, lesson_id))
    }

    /// Record an attempt only if the policy still allows one.
    ///
    /// Returns the status after recording. When the policy is exhausted nothing
    /// is recorded and [`AttemptError::Locked`] is returned.
    pub fn record_checked(
        &mut self,
        student_id: &str,
        policy: &AttemptPolicy,
        record: AttemptRecord,
    ) -> std::result::Result<AttemptStatus, AttemptError> {
        let before = self.status(student_id, &record.lesson_id, policy);
        if !before.can_take {
            return Err(AttemptError::Locked {
                lesson_id: record.lesson_id,
                status: before.status_text,
            });
        }

        let lesson_id = record.lesson_id.clone();
        self.record(student_id, record);
        Ok(self.status(student_id, &lesson_id, policy))
    }

    /// The `n` most recent attempts by a student, newest first.
    pub fn recent(&self, student_id: &str, n: usize) -> Vec<&AttemptRecord> {
        self.attempts_for(student_id).iter().rev().take(n).collect()
    }

    /// Students with at least one recorded attempt.
    pub fn students(&self) -> impl Iterator<Item = &str> {
        self.attempts.keys().map(String::as_str)
    }

    /// Load a ledger from a JSON file. A missing file is an empty ledger.
    pub fn load_json(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no ledger at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ledger from {}", path.display()))?;
        let ledger: AttemptLedger =
            serde_json::from_str(&content).context("failed to parse ledger JSON")?;
        Ok(ledger)
    }

    /// Save the ledger as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize ledger")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write ledger to {}", path.display()))?;
        Ok(())
    }
}
