//! Core data model types for quizgrade.
//!
//! These are the validated shapes the grading engine and policy evaluator
//! accept. Loosely-shaped documents are converted into them by
//! [`crate::parser`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single question inside a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, used to key submitted answers.
    pub id: String,
    /// The text shown to the student.
    #[serde(default)]
    pub prompt: String,
    /// Type-specific expected answer.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// The four question variants and the fields each one needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// Pick exactly one option.
    Single {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default)]
        answer: String,
    },
    /// Pick every correct option and nothing else.
    Multi {
        #[serde(default)]
        options: Vec<String>,
        #[serde(rename = "answer", default)]
        answers: Vec<String>,
    },
    /// Type a phrase that must match after normalization.
    Exact {
        #[serde(default)]
        answer: String,
    },
    /// Free text that must contain every keyword.
    Contains {
        #[serde(default)]
        keywords: Vec<String>,
        /// Minimum word count; 0 means no minimum.
        #[serde(rename = "minWords", default)]
        min_words: u32,
    },
}

impl Question {
    /// The bare type tag of this question.
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::Single { .. } => QuestionType::Single,
            QuestionKind::Multi { .. } => QuestionType::Multi,
            QuestionKind::Exact { .. } => QuestionType::Exact,
            QuestionKind::Contains { .. } => QuestionType::Contains,
        }
    }

    /// Options offered to the student (empty for free-text questions).
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::Single { options, .. } | QuestionKind::Multi { options, .. } => options,
            QuestionKind::Exact { .. } | QuestionKind::Contains { .. } => &[],
        }
    }

    /// The expected answer in submission shape, for display.
    pub fn expected(&self) -> Answer {
        match &self.kind {
            QuestionKind::Single { answer, .. } | QuestionKind::Exact { answer } => {
                Answer::Text(answer.clone())
            }
            QuestionKind::Multi { answers, .. } => Answer::Choices(answers.clone()),
            QuestionKind::Contains { keywords, .. } => Answer::Choices(keywords.clone()),
        }
    }

    /// Student-facing instructions for answering this question.
    pub fn instructions(&self) -> String {
        match &self.kind {
            QuestionKind::Single { .. } => "Choose one option.".to_string(),
            QuestionKind::Multi { .. } => "Select all that apply.".to_string(),
            QuestionKind::Exact { .. } => "Type the exact phrase.".to_string(),
            QuestionKind::Contains {
                keywords,
                min_words,
            } => {
                let required = if keywords.is_empty() {
                    "(any)".to_string()
                } else {
                    keywords.join(", ")
                };
                if *min_words > 0 {
                    format!("Must contain: {required} • min {min_words} words")
                } else {
                    format!("Must contain: {required}")
                }
            }
        }
    }
}

/// Question type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multi,
    Exact,
    Contains,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Single => write!(f, "single"),
            QuestionType::Multi => write!(f, "multi"),
            QuestionType::Exact => write!(f, "exact"),
            QuestionType::Contains => write!(f, "contains"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuestionType::Single),
            "multi" => Ok(QuestionType::Multi),
            "exact" => Ok(QuestionType::Exact),
            "contains" => Ok(QuestionType::Contains),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A submitted answer: free text, or the list of selected options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Choices(Vec<String>),
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<Vec<&str>> for Answer {
    fn from(v: Vec<&str>) -> Self {
        Answer::Choices(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Answer {
    fn from(v: Vec<String>) -> Self {
        Answer::Choices(v)
    }
}

/// How many times a student may take a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttemptPolicy {
    /// Which rule applies.
    #[serde(default)]
    pub mode: PolicyMode,
    /// Cap on attempts; only meaningful for [`PolicyMode::Limit`].
    #[serde(default)]
    pub limit: u32,
}

impl AttemptPolicy {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn one_time() -> Self {
        Self {
            mode: PolicyMode::OneTime,
            limit: 0,
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            mode: PolicyMode::Limit,
            limit,
        }
    }
}

/// Attempt policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    #[default]
    Unlimited,
    OneTime,
    Limit,
}

impl PolicyMode {
    /// Parse a mode, falling back to [`PolicyMode::Unlimited`] for anything
    /// unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            if !s.trim().is_empty() {
                tracing::warn!("unknown attempt policy mode '{s}', treating as unlimited");
            }
            PolicyMode::Unlimited
        })
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Unlimited => write!(f, "unlimited"),
            PolicyMode::OneTime => write!(f, "one_time"),
            PolicyMode::Limit => write!(f, "limit"),
        }
    }
}

impl FromStr for PolicyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unlimited" => Ok(PolicyMode::Unlimited),
            "one_time" => Ok(PolicyMode::OneTime),
            "limit" => Ok(PolicyMode::Limit),
            other => Err(format!("unknown policy mode: {other}")),
        }
    }
}

/// What kind of assignment a lesson is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Homework,
    #[default]
    Quiz,
    Exam,
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonKind::Homework => write!(f, "homework"),
            LessonKind::Quiz => write!(f, "quiz"),
            LessonKind::Exam => write!(f, "exam"),
        }
    }
}

impl FromStr for LessonKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "homework" => Ok(LessonKind::Homework),
            "quiz" => Ok(LessonKind::Quiz),
            "exam" => Ok(LessonKind::Exam),
            other => Err(format!("unknown lesson kind: {other}")),
        }
    }
}

/// An assignment: an ordered set of questions plus its attempt policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: LessonKind,
    #[serde(default)]
    pub take_policy: AttemptPolicy,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// The published collection of lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub app_name: String,
    pub version: u32,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Library {
    /// Find a lesson by id.
    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }
}
