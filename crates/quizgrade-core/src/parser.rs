//! Lesson library parser.
//!
//! Loads loosely-shaped library documents (JSON or TOML), fills in the
//! defaults authors are allowed to omit, parses numeric fields leniently, and
//! validates the result for common authoring mistakes.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::IngestError;
use crate::model::{
    Answer, AttemptPolicy, Lesson, LessonKind, Library, PolicyMode, Question, QuestionKind,
    QuestionType,
};
use crate::normalize::{parse_keyword_list, parse_lines};

const DEFAULT_APP_NAME: &str = "English Quest";
const DEFAULT_VERSION: u32 = 2;

/// Intermediate structure for parsing library files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLibrary {
    #[serde(default, deserialize_with = "lenient_text")]
    app_name: Option<String>,
    #[serde(default)]
    version: Option<RawCount>,
    #[serde(default)]
    lessons: Vec<RawLesson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLesson {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    kind: Option<String>,
    #[serde(default, alias = "take_policy")]
    take_policy: Option<RawPolicy>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawPolicy {
    #[serde(default, deserialize_with = "lenient_text")]
    mode: Option<String>,
    #[serde(default)]
    limit: Option<RawCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    type_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    prompt: Option<String>,
    #[serde(default)]
    options: Option<RawList>,
    #[serde(default)]
    answer: Option<Value>,
    #[serde(default)]
    keywords: Option<RawList>,
    #[serde(default, alias = "min_words")]
    min_words: Option<RawCount>,
}

/// A count that authors may write as a number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

/// A list written either as an array or as free text, one entry per line.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawList {
    Items(Vec<Value>),
    Text(String),
    Other(Value),
}

/// Text form of a scalar value. Arrays, objects and null have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize an optional text field, accepting any scalar in its text form.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

impl RawCount {
    /// Resolve to a non-negative count. Unparseable input yields `None`.
    fn resolve(&self) -> Option<u32> {
        match self {
            RawCount::Int(n) => Some((*n).clamp(0, i64::from(u32::MAX)) as u32),
            RawCount::Float(f) if f.is_finite() => Some(f.trunc().clamp(0.0, f64::from(u32::MAX)) as u32),
            RawCount::Float(_) => None,
            RawCount::Text(s) => parse_leading_int(s),
            RawCount::Other(_) => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            RawCount::Int(n) => n.to_string(),
            RawCount::Float(f) => f.to_string(),
            RawCount::Text(s) => format!("'{s}'"),
            RawCount::Other(v) => v.to_string(),
        }
    }
}

/// Parse a leading integer the way lenient form input is read: optional
/// leading whitespace and sign, then digits, ignoring any trailing text.
fn parse_leading_int(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

/// Parse an optional lenient count. Absent or blank is 0; anything that is
/// not a number is 0 with a warning.
fn lenient_count(
    raw: Option<&RawCount>,
    field: &str,
    on_invalid: impl FnOnce(String),
) -> u32 {
    match raw {
        None => 0,
        Some(RawCount::Text(s)) if s.trim().is_empty() => 0,
        Some(count) => count.resolve().unwrap_or_else(|| {
            on_invalid(format!("{field} {} is not a number, using 0", count.describe()));
            0
        }),
    }
}

impl RawList {
    /// Trimmed, non-empty entries, plus how many entries had no text form.
    fn into_entries(self, split_commas: bool) -> (Vec<String>, usize) {
        match self {
            RawList::Items(items) => {
                let total = items.len();
                let texts: Vec<String> = items.iter().filter_map(scalar_text).collect();
                let dropped = total - texts.len();
                let entries = texts
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                (entries, dropped)
            }
            RawList::Text(text) if split_commas => (parse_keyword_list(&text), 0),
            RawList::Text(text) => (parse_lines(&text), 0),
            RawList::Other(value) => match scalar_text(&value) {
                Some(text) => RawList::Text(text).into_entries(split_commas),
                None => (Vec::new(), usize::from(!value.is_null())),
            },
        }
    }
}

/// Supported library document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFormat {
    Json,
    Toml,
}

impl LibraryFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> std::result::Result<Self, IngestError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(LibraryFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(LibraryFormat::Toml),
            other => Err(IngestError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// A library together with the problems found while ingesting it.
#[derive(Debug, Clone)]
pub struct ParsedLibrary {
    pub library: Library,
    /// Records that were skipped or repaired during ingestion.
    pub warnings: Vec<ValidationWarning>,
}

/// Load a library file, choosing the format from its extension.
pub fn load_library(path: &Path) -> Result<ParsedLibrary> {
    let format = LibraryFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read library file: {}", path.display()))?;

    parse_library_str(&content, format)
        .with_context(|| format!("failed to parse library: {}", path.display()))
}

/// Parse a library document from a string.
pub fn parse_library_str(content: &str, format: LibraryFormat) -> Result<ParsedLibrary> {
    let raw: RawLibrary = match format {
        LibraryFormat::Json => {
            serde_json::from_str(content).context("invalid library JSON")?
        }
        LibraryFormat::Toml => toml::from_str(content).context("invalid library TOML")?,
    };

    let mut warnings = Vec::new();

    let version = raw
        .version
        .as_ref()
        .and_then(|v| match v {
            RawCount::Text(_) => None,
            other => other.resolve(),
        })
        .unwrap_or(DEFAULT_VERSION);

    let lessons = raw
        .lessons
        .into_iter()
        .enumerate()
        .map(|(i, l)| convert_lesson(i, l, &mut warnings))
        .collect();

    Ok(ParsedLibrary {
        library: Library {
            app_name: raw
                .app_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            version,
            lessons,
        },
        warnings,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn convert_lesson(index: usize, raw: RawLesson, warnings: &mut Vec<ValidationWarning>) -> Lesson {
    let id = non_empty(raw.id).unwrap_or_else(|| format!("lesson_{:02}", index + 1));

    let kind = match non_empty(raw.kind) {
        Some(k) => k.parse::<LessonKind>().unwrap_or_else(|e| {
            warnings.push(ValidationWarning::lesson(&id, format!("{e}, using quiz")));
            LessonKind::Quiz
        }),
        None => LessonKind::Quiz,
    };

    let take_policy = match raw.take_policy {
        Some(p) => {
            let mode = p.mode.as_deref().unwrap_or("");
            if !mode.trim().is_empty() && mode.parse::<PolicyMode>().is_err() {
                warnings.push(ValidationWarning::lesson(
                    &id,
                    format!("unknown attempt policy mode '{mode}', using unlimited"),
                ));
            }
            AttemptPolicy {
                mode: PolicyMode::parse_lenient(mode),
                limit: lenient_count(p.limit.as_ref(), "limit", |m| {
                    warnings.push(ValidationWarning::lesson(&id, m))
                }),
            }
        }
        None => AttemptPolicy::unlimited(),
    };

    let mut questions = Vec::with_capacity(raw.questions.len());
    for (qi, q) in raw.questions.into_iter().enumerate() {
        match convert_question(qi, q, warnings) {
            Ok(question) => questions.push(question),
            Err(e) => {
                tracing::warn!("skipping question in lesson {id}: {e}");
                warnings.push(ValidationWarning::lesson(&id, e.to_string()));
            }
        }
    }

    Lesson {
        title: non_empty(raw.title).unwrap_or_else(|| format!("Lesson {}", index + 1)),
        id,
        description: raw.description.unwrap_or_default(),
        kind,
        take_policy,
        questions,
    }
}

fn convert_question(
    index: usize,
    raw: RawQuestion,
    warnings: &mut Vec<ValidationWarning>,
) -> std::result::Result<Question, IngestError> {
    let id = non_empty(raw.id).unwrap_or_else(|| format!("q_{:02}", index + 1));
    let type_tag = non_empty(raw.type_tag).unwrap_or_else(|| "single".to_string());
    let question_type: QuestionType =
        type_tag
            .parse()
            .map_err(|_| IngestError::UnknownQuestionType {
                question_id: id.clone(),
                type_tag: type_tag.clone(),
            })?;

    let options = list_entries(&id, "options", raw.options, false, warnings);

    let kind = match question_type {
        QuestionType::Single => QuestionKind::Single {
            options,
            answer: answer_text(&id, raw.answer.as_ref(), warnings),
        },
        QuestionType::Multi => QuestionKind::Multi {
            options,
            answers: answer_list(&id, raw.answer, warnings),
        },
        QuestionType::Exact => QuestionKind::Exact {
            answer: answer_text(&id, raw.answer.as_ref(), warnings),
        },
        QuestionType::Contains => QuestionKind::Contains {
            keywords: list_entries(&id, "keywords", raw.keywords, true, warnings),
            min_words: lenient_count(raw.min_words.as_ref(), "minWords", |m| {
                warnings.push(ValidationWarning::question(&id, m))
            }),
        },
    };

    Ok(Question {
        id,
        prompt: raw.prompt.unwrap_or_default(),
        kind,
    })
}

fn list_entries(
    id: &str,
    field: &str,
    raw: Option<RawList>,
    split_commas: bool,
    warnings: &mut Vec<ValidationWarning>,
) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let (entries, dropped) = raw.into_entries(split_commas);
    if dropped > 0 {
        warnings.push(ValidationWarning::question(
            id,
            format!("{field}: skipped {dropped} entry(ies) that are not text"),
        ));
    }
    entries
}

/// Expected text for single/exact questions. Scalars take their text form; a
/// list collapses to its comma-joined text.
fn answer_text(id: &str, answer: Option<&Value>, warnings: &mut Vec<ValidationWarning>) -> String {
    match answer {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => {
            warnings.push(ValidationWarning::question(
                id,
                "expected a single answer but found a list, joining entries",
            ));
            items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(",")
        }
        Some(Value::Object(_)) => {
            warnings.push(ValidationWarning::question(
                id,
                "answer is not text, treating as empty",
            ));
            String::new()
        }
        Some(scalar) => scalar_text(scalar).unwrap_or_default(),
    }
}

/// Correct options for multi-select questions.
fn answer_list(id: &str, answer: Option<Value>, warnings: &mut Vec<ValidationWarning>) -> Vec<String> {
    match answer {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let answers: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if answers.len() < items.len() {
                warnings.push(ValidationWarning::question(
                    id,
                    "multi-select answer has entries that are not text, skipping them",
                ));
            }
            answers
        }
        Some(_) => {
            warnings.push(ValidationWarning::question(
                id,
                "multi-select answer is not a list, treating as no correct options",
            ));
            Vec::new()
        }
    }
}

/// Load submitted answers from a JSON object keyed by question id.
pub fn load_answers(path: &Path) -> Result<HashMap<String, Answer>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    parse_answers_str(&content)
        .with_context(|| format!("failed to parse answers: {}", path.display()))
}

/// Parse submitted answers from a JSON string.
///
/// Strings are text answers and arrays of strings are selections. Any other
/// value leaves that question unanswered.
pub fn parse_answers_str(content: &str) -> Result<HashMap<String, Answer>> {
    let answers: HashMap<String, Value> =
        serde_json::from_str(content).context("answers must be a JSON object keyed by question ID")?;
    Ok(answers
        .into_iter()
        .filter_map(|(id, value)| submitted_answer(&id, value).map(|a| (id, a)))
        .collect())
}

fn submitted_answer(question_id: &str, value: Value) -> Option<Answer> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Answer::Text(s)),
        Value::Array(items) => {
            let choices: Option<Vec<String>> = items
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            if choices.is_none() {
                tracing::warn!("answer for {question_id} has non-text selections, treating as unanswered");
            }
            choices.map(Answer::Choices)
        }
        other => {
            tracing::warn!("answer for {question_id} is not text ({other}), treating as unanswered");
            None
        }
    }
}

/// A warning from library ingestion or validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The lesson ID (if applicable).
    pub lesson_id: Option<String>,
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn lesson(lesson_id: &str, message: impl Into<String>) -> Self {
        Self {
            lesson_id: Some(lesson_id.to_string()),
            question_id: None,
            message: message.into(),
        }
    }

    fn question(question_id: &str, message: impl Into<String>) -> Self {
        Self {
            lesson_id: None,
            question_id: Some(question_id.to_string()),
            message: message.into(),
        }
    }

    fn in_lesson(lesson_id: &str, question_id: &str, message: impl Into<String>) -> Self {
        Self {
            lesson_id: Some(lesson_id.to_string()),
            question_id: Some(question_id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a library for common authoring issues.
pub fn validate_library(library: &Library) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if library.lessons.is_empty() {
        warnings.push(ValidationWarning {
            lesson_id: None,
            question_id: None,
            message: "library has no lessons".into(),
        });
    }

    let mut seen_lessons = HashSet::new();
    for lesson in &library.lessons {
        if !seen_lessons.insert(&lesson.id) {
            warnings.push(ValidationWarning::lesson(
                &lesson.id,
                format!("duplicate lesson ID: {}", lesson.id),
            ));
        }
        validate_lesson(lesson, &mut warnings);
    }

    warnings
}

fn validate_lesson(lesson: &Lesson, warnings: &mut Vec<ValidationWarning>) {
    if lesson.questions.is_empty() {
        warnings.push(ValidationWarning::lesson(&lesson.id, "lesson has no questions"));
    }

    let mut seen_questions = HashSet::new();
    for q in &lesson.questions {
        let warn = |message: String| ValidationWarning::in_lesson(&lesson.id, &q.id, message);

        if !seen_questions.insert(&q.id) {
            warnings.push(warn(format!("duplicate question ID: {}", q.id)));
        }
        if q.prompt.trim().is_empty() {
            warnings.push(warn("prompt is empty".into()));
        }

        match &q.kind {
            QuestionKind::Single { options, answer } => {
                if options.is_empty() {
                    warnings.push(warn("single-choice question has no options".into()));
                } else if !options.contains(answer) {
                    warnings.push(warn(format!("answer '{answer}' is not one of the options")));
                }
            }
            QuestionKind::Multi { options, answers } => {
                if answers.is_empty() {
                    warnings.push(warn("multi-select question has no correct options".into()));
                }
                for a in answers.iter().filter(|a| !options.contains(*a)) {
                    warnings.push(warn(format!("answer '{a}' is not one of the options")));
                }
            }
            QuestionKind::Exact { answer } => {
                if answer.trim().is_empty() {
                    warnings.push(warn("exact-answer question has an empty answer".into()));
                }
            }
            QuestionKind::Contains {
                keywords,
                min_words,
            } => {
                if keywords.is_empty() && *min_words == 0 {
                    warnings.push(warn(
                        "contains question has no keywords or minimum, any answer passes".into(),
                    ));
                }
            }
        }
    }
}
