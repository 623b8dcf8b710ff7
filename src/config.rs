use crate::renderer::Locale;
use std::path::PathBuf;

pub const DEFAULT_QUIZ_DIR: &str = "quizzes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub quiz_dir: PathBuf,
    pub source: SourceKind,
    pub db_path: PathBuf,
    pub locale: Locale,
    pub user: Option<String>,
}

fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\interactive-quizzes")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/interactive-quizzes")
    }
}

pub fn default_db_path() -> PathBuf {
    get_data_dir().join("iq.db")
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unknown values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match non_empty("QUIZ_SOURCE").as_deref() {
            Some("sqlite") => SourceKind::Sqlite,
            _ => SourceKind::Json,
        };

        Self {
            quiz_dir: non_empty("QUIZ_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_QUIZ_DIR)),
            source,
            db_path: non_empty("QUIZ_DB")
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            locale: non_empty("QUIZ_LOCALE")
                .and_then(|code| Locale::from_code(&code))
                .unwrap_or_default(),
            user: non_empty("QUIZ_USER"),
        }
    }
}
