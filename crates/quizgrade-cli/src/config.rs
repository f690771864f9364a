//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizgrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgradeConfig {
    /// Lesson library used when `--library` is not given.
    #[serde(default)]
    pub library: Option<PathBuf>,
    /// Attempt ledger used when `--ledger` is not given.
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,
    /// Directory graded results are saved into, if any.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_ledger() -> PathBuf {
    PathBuf::from("./quizgrade-attempts.json")
}

impl Default for QuizgradeConfig {
    fn default() -> Self {
        Self {
            library: None,
            ledger: default_ledger(),
            output_dir: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        // Substituted values are not expanded again.
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizgrade.toml` in the current directory
/// 2. `~/.config/quizgrade/config.toml`
///
/// `QUIZGRADE_LEDGER` overrides the ledger path.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizgradeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgradeConfig::default(),
    };

    if let Ok(ledger) = std::env::var("QUIZGRADE_LEDGER") {
        config.ledger = PathBuf::from(ledger);
    }

    config.library = config.library.as_deref().map(resolve_path);
    config.ledger = resolve_path(&config.ledger);
    config.output_dir = config.output_dir.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgrade"))
}
