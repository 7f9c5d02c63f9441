//! Runtime configuration resolved once at startup.
//!
//! The database lives under `~/.tako/` unless `--db` points elsewhere; the log
//! file sits next to it. The log filter comes from `TAKO_LOG`.

use std::fs;
use std::path::{Path, PathBuf};

/// Data directory under `$HOME`.
pub const DATA_DIR: &str = ".tako";
pub const DB_FILE: &str = "db.json";
pub const LOG_FILE: &str = "tako.log";
/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TAKO_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve from the command line override and the process environment.
    pub fn resolve(db_override: Option<&Path>) -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let filter = std::env::var(LOG_ENV).ok();
        Self::from_parts(db_override, home, filter)
    }

    /// Resolve from explicit inputs instead of the process environment.
    pub fn from_parts(db_override: Option<&Path>, home: Option<PathBuf>, log_filter: Option<String>) -> Self {
        let db_path = match db_override {
            Some(path) => path.to_path_buf(),
            None => home
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_DIR)
                .join(DB_FILE),
        };
        let log_path = db_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(LOG_FILE);
        Config {
            db_path,
            log_path,
            log_filter: log_filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Directory holding the database and the log.
    pub fn data_dir(&self) -> &Path {
        self.db_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Create the directory holding the database and log file.
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        let dir = self.data_dir();
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(dir)
    }
}
