//! Storage layer for planner
//!
//! Tasks live in one store file inside the data directory:
//!
//! ```text
//! <data-dir>/
//!   planner.toml     # optional configuration
//!   tasks.csv        # tabular backend
//!   tasks.db         # SQLite backend
//! ```
//!
//! Both backends implement [`TaskBackend`]. Every call opens the file or
//! connection, does its work and releases it before returning; nothing is
//! held between calls, so concurrent writers are last-writer-wins.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::config::{StorageConfig, StorageKind};
use crate::error::{Error, Result};
use crate::task::{sort_by_schedule, NewTask, Status, Task};

pub mod csv_store;
pub mod sqlite_store;

pub use csv_store::CsvStore;
pub use sqlite_store::SqliteStore;

/// Column order of the tabular store.
pub const COLUMNS: [&str; 7] = [
    "id",
    "date",
    "scheduled_time",
    "description",
    "priority",
    "status",
    "category",
];

/// Persistence contract shared by the tabular and SQLite stores.
pub trait TaskBackend: fmt::Debug {
    fn kind(&self) -> StorageKind;

    /// Path of the store file.
    fn location(&self) -> &Path;

    /// Create an empty store if none exists. Idempotent.
    fn ensure_initialized(&self) -> Result<()>;

    /// All tasks in storage order.
    fn load_all(&self) -> Result<Vec<Task>>;

    /// Tasks on `date`, ordered by scheduled time (ties by id).
    fn load_for_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let mut tasks = self.load_all()?;
        tasks.retain(|task| task.date == date);
        sort_by_schedule(&mut tasks);
        Ok(tasks)
    }

    /// Id the next insert will receive: max existing id + 1, or 1.
    fn next_id(&self) -> Result<u64> {
        next_id_for(&self.load_all()?)
    }

    /// Store a new task with status Pending.
    fn insert(&self, new: NewTask) -> Result<Task>;

    /// Returns false when no task has `id`.
    fn set_status(&self, id: u64, status: Status) -> Result<bool>;

    /// Returns false when no task has `id`.
    fn remove(&self, id: u64) -> Result<bool>;
}

/// Max existing id + 1, or 1. Fails once the id space is used up.
pub fn next_id_for(tasks: &[Task]) -> Result<u64> {
    match tasks.iter().map(|task| task.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| Error::OperationFailed("task id space exhausted".to_string())),
    }
}

/// Open the backend of `kind` inside `data_dir`.
pub fn open(kind: StorageKind, data_dir: &Path, config: &StorageConfig) -> Box<dyn TaskBackend> {
    match kind {
        StorageKind::Csv => Box::new(CsvStore::new(data_dir.join(&config.csv_file))),
        StorageKind::Sqlite => Box::new(SqliteStore::new(data_dir.join(&config.sqlite_file))),
    }
}

/// Create `path`'s parent directory when it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
