pub mod grade;
pub mod init;
pub mod status;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use quizgrade_core::parser::{load_library, ParsedLibrary, ValidationWarning};

/// Resolve the library path from the flag or the config, then load it.
pub(crate) fn open_library(flag: Option<PathBuf>, configured: Option<&Path>) -> Result<ParsedLibrary> {
    let path = flag
        .or_else(|| configured.map(Path::to_path_buf))
        .ok_or_else(|| {
            anyhow::anyhow!("no library given. Pass --library or set `library` in quizgrade.toml")
        })?;
    let parsed = load_library(&path)?;
    for w in &parsed.warnings {
        tracing::warn!("{}", format_warning(w));
    }
    Ok(parsed)
}

pub(crate) fn format_warning(w: &ValidationWarning) -> String {
    let location = match (&w.lesson_id, &w.question_id) {
        (Some(l), Some(q)) => format!("[{l}/{q}] "),
        (Some(l), None) => format!("[{l}] "),
        (None, Some(q)) => format!("[{q}] "),
        (None, None) => String::new(),
    };
    format!("{location}{}", w.message)
}
