//! The `quizgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgrade_core::parser::{load_library, validate_library};

use crate::config::load_config_from;

pub fn execute(library: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let library_path = library.or(config.library).ok_or_else(|| {
        anyhow::anyhow!("no library given. Pass --library or set `library` in quizgrade.toml")
    })?;
    let parsed = load_library(&library_path)?;
    let lib = &parsed.library;

    println!("Library: {} ({} lessons)", lib.app_name, lib.lessons.len());
    for lesson in &lib.lessons {
        let attempts = match lesson.take_policy.cap() {
            Some(cap) => format!("{cap} attempt(s)"),
            None => "unlimited attempts".to_string(),
        };
        println!(
            "  {}: {} ({} questions, {}, {attempts})",
            lesson.id,
            lesson.title,
            lesson.questions.len(),
            lesson.kind
        );
    }

    let mut warnings = parsed.warnings.clone();
    warnings.extend(validate_library(lib));

    for w in &warnings {
        println!("  WARNING: {}", super::format_warning(w));
    }

    if warnings.is_empty() {
        println!("All lessons valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
