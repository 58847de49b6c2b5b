//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve database path, log level and log directory from explicit values
//!   or `HEALTHLOG_*` environment variables.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Resolution never fails; missing or unrecognized values fall back to
//!   defaults.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "HEALTHLOG_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "HEALTHLOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "HEALTHLOG_LOG_DIR";

/// Database file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "healthlog.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "healthlog-logs";

/// Log verbosity accepted by the core logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `debug` for debug builds, `info` for release builds.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }

    /// Case-insensitive; `warning` is an alias of `warn`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the core needs to open storage and start logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// Must be absolute for logging to start.
    pub log_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: LogLevel::build_default(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by any non-blank `HEALTHLOG_*` variable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CoreConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_blank(LOG_LEVEL_ENV)
                .and_then(|raw| LogLevel::parse(&raw))
                .unwrap_or(defaults.log_level),
            log_dir: non_blank(LOG_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_logging(mut self, level: LogLevel, log_dir: impl Into<PathBuf>) -> Self {
        self.log_level = level;
        self.log_dir = log_dir.into();
        self
    }
}
