//! The grading engine.
//!
//! Compares a submitted answer against a question's expected answer under
//! type-specific rules. Grading is pure: no I/O, no shared state, and no error
//! path. Ill-formed or absent input yields an incorrect verdict.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Answer, Question, QuestionKind, QuestionType};
use crate::normalize::{normalize, normalize_set, word_count};

/// The outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the answer is accepted.
    pub correct: bool,
    /// The submitted value after normalization.
    pub normalized_user: String,
    /// The expected value after normalization.
    pub normalized_expected: String,
    /// Which rule graded the answer.
    pub question_type: QuestionType,
}

/// Grade a submitted answer against a question.
pub fn grade(question: &Question, submitted: Option<&Answer>) -> Verdict {
    let question_type = question.question_type();

    let (correct, normalized_user, normalized_expected) = match &question.kind {
        QuestionKind::Single { answer, .. } | QuestionKind::Exact { answer } => {
            grade_phrase(submitted, answer)
        }
        QuestionKind::Multi { answers, .. } => grade_multi(submitted, answers),
        QuestionKind::Contains {
            keywords,
            min_words,
        } => grade_contains(submitted, keywords, *min_words),
    };

    tracing::debug!(
        question_id = %question.id,
        %question_type,
        correct,
        "graded answer"
    );

    Verdict {
        correct,
        normalized_user,
        normalized_expected,
        question_type,
    }
}

/// Text from a submission meant for a free-text or single-choice question.
///
/// An absent answer reads as empty text. A choice list is the wrong shape.
fn submitted_text(submitted: Option<&Answer>) -> Option<&str> {
    match submitted {
        Some(Answer::Text(s)) => Some(s.as_str()),
        Some(Answer::Choices(_)) => None,
        None => Some(""),
    }
}

fn grade_phrase(submitted: Option<&Answer>, expected: &str) -> (bool, String, String) {
    let expected = normalize(expected);
    match submitted_text(submitted) {
        Some(text) => {
            let user = normalize(text);
            (user == expected, user, expected)
        }
        None => (false, shape_mismatch_display(submitted), expected),
    }
}

fn grade_multi(submitted: Option<&Answer>, expected: &[String]) -> (bool, String, String) {
    let user_set = match submitted {
        Some(Answer::Choices(items)) => normalize_set(items),
        // Anything but a list counts as no selection.
        Some(Answer::Text(_)) | None => BTreeSet::new(),
    };
    let expected_set = normalize_set(expected);

    let correct = user_set.len() == expected_set.len()
        && expected_set.iter().all(|v| user_set.contains(v));

    (correct, join_set(&user_set), join_set(&expected_set))
}

fn grade_contains(
    submitted: Option<&Answer>,
    keywords: &[String],
    min_words: u32,
) -> (bool, String, String) {
    let expected_keywords: Vec<String> = keywords
        .iter()
        .map(|k| normalize(k))
        .filter(|k| !k.is_empty())
        .collect();
    let expected = expected_keywords.join(", ");

    let Some(text) = submitted_text(submitted) else {
        return (false, shape_mismatch_display(submitted), expected);
    };
    let user = normalize(text);

    if min_words > 0 && word_count(&user) < min_words as usize {
        return (false, user, expected);
    }

    let correct = if expected_keywords.is_empty() {
        !user.is_empty()
    } else {
        expected_keywords.iter().all(|k| user.contains(k.as_str()))
    };

    (correct, user, expected)
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn shape_mismatch_display(submitted: Option<&Answer>) -> String {
    match submitted {
        Some(Answer::Choices(items)) => join_set(&normalize_set(items)),
        _ => String::new(),
    }
}
