//! Error types for library ingestion and attempt recording.
//!
//! Grading and policy evaluation are total and never fail; these errors only
//! surface at the data boundary and when a locked attempt is recorded.

use thiserror::Error;

/// Errors raised while turning a raw lesson document into the validated model.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file extension does not name a supported document format.
    #[error("unsupported library format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    /// A question carries a type tag outside the four known variants.
    #[error("unknown question type '{type_tag}' for question {question_id}")]
    UnknownQuestionType {
        question_id: String,
        type_tag: String,
    },
}

/// Errors raised by the attempt ledger.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The attempt policy for this lesson is exhausted.
    #[error("no attempts left for lesson {lesson_id} ({status})")]
    Locked { lesson_id: String, status: String },
}
