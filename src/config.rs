//! Configuration loading and management
//!
//! Handles parsing of `planner.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::task::{Category, Priority};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILENAME: &str = "planner.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Task behavior configuration
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Aggregation configuration
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Which storage backend holds the tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Flat tabular file (`tasks.csv`)
    #[default]
    Csv,
    /// Single-file SQLite database (`tasks.db`)
    Sqlite,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Csv => "csv",
            StorageKind::Sqlite => "sqlite",
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend used when `--backend` is not given
    #[serde(default)]
    pub backend: StorageKind,

    /// File name of the tabular store
    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    /// File name of the SQLite store
    #[serde(default = "default_sqlite_file")]
    pub sqlite_file: String,
}

fn default_csv_file() -> String {
    "tasks.csv".to_string()
}

fn default_sqlite_file() -> String {
    "tasks.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::default(),
            csv_file: default_csv_file(),
            sqlite_file: default_sqlite_file(),
        }
    }
}

/// Task-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Refuse to delete tasks that are still Pending
    #[serde(default = "default_true")]
    pub protect_pending: bool,

    /// Priority used by `add` when none is given
    #[serde(default = "default_priority")]
    pub default_priority: String,

    /// Category used by `add` when none is given
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> String {
    Priority::Medium.to_string()
}

fn default_category() -> String {
    Category::Work.to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            protect_pending: true,
            default_priority: default_priority(),
            default_category: default_category(),
        }
    }
}

impl TasksConfig {
    pub fn priority(&self) -> Result<Priority> {
        Ok(self.default_priority.parse()?)
    }

    pub fn category(&self) -> Result<Category> {
        Ok(self.default_category.parse()?)
    }

    fn validate(&self) -> Result<()> {
        self.priority().map_err(|err| {
            Error::InvalidConfig(format!("tasks.default_priority: {err}"))
        })?;
        self.category().map_err(|err| {
            Error::InvalidConfig(format!("tasks.default_category: {err}"))
        })?;
        Ok(())
    }
}

/// Aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Days before today included in the weekly summary
    #[serde(default = "default_weekly_window_days")]
    pub weekly_window_days: u32,
}

fn default_weekly_window_days() -> u32 {
    7
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            weekly_window_days: default_weekly_window_days(),
        }
    }
}

pub const MAX_WINDOW_DAYS: u32 = 366;

/// Check a trailing-window length given in days.
pub fn validate_window_days(days: u32, field: &str) -> Result<()> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(Error::InvalidArgument(format!(
            "{field} must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a `planner.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults when absent
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let config_path = Self::path_in(data_dir);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the configuration file inside `data_dir`
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILENAME)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate_file_name(&self.storage.csv_file, "storage.csv_file")?;
        validate_file_name(&self.storage.sqlite_file, "storage.sqlite_file")?;
        self.tasks.validate()?;
        validate_window_days(self.stats.weekly_window_days, "stats.weekly_window_days")
            .map_err(|err| match err {
                Error::InvalidArgument(message) => Error::InvalidConfig(message),
                other => other,
            })?;
        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
    }
    if trimmed.len() != name.len() {
        return Err(Error::InvalidConfig(format!(
            "{field} must not start or end with whitespace, got '{name}'"
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidConfig(format!(
            "{field} must be a plain file name, got '{trimmed}'"
        )));
    }
    Ok(())
}

/// Create the data directory if needed. Returns true when it was created.
pub fn ensure_data_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    if path.exists() {
        return Err(Error::DataDirUnavailable(path.to_path_buf()));
    }
    std::fs::create_dir_all(path).map_err(|_| Error::DataDirUnavailable(path.to_path_buf()))?;
    Ok(true)
}

/// Resolve the data directory: explicit path, then the platform data dir, then `.`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    directories::ProjectDirs::from("", "", "planner")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
