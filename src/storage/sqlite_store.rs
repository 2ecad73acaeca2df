//! SQLite-backed task store.
//!
//! A single `tasks` table in a single database file. A connection is opened
//! per operation. Reads use a read-only connection and treat a missing file
//! as an empty store; the schema is only applied by writes and
//! `ensure_initialized`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use super::{ensure_parent_dir, TaskBackend};
use crate::config::StorageKind;
use crate::error::{Error, Result};
use crate::task::{
    format_date, format_time, parse_date, parse_time, sort_by_schedule, NewTask, Status, Task,
};

/// Current schema version recorded in `schema_meta`.
pub const SCHEMA_VERSION: u32 = 1;

/// `INTEGER PRIMARY KEY` without `AUTOINCREMENT` aliases the rowid, so SQLite
/// hands out max(id) + 1 for new rows.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id             INTEGER PRIMARY KEY,
    date           TEXT NOT NULL,      -- YYYY-MM-DD
    scheduled_time TEXT NOT NULL,      -- HH:MM
    description    TEXT NOT NULL DEFAULT '',
    priority       TEXT NOT NULL,
    status         TEXT NOT NULL DEFAULT 'Pending',
    category       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, date, scheduled_time, description, priority, status, category FROM tasks";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writable connection with the schema in place.
    fn connect(&self) -> Result<Connection> {
        ensure_parent_dir(&self.path)?;
        let conn = Connection::open(&self.path)?;
        apply_schema(&conn)?;
        Ok(conn)
    }

    /// Read-only connection, or `None` when the database has no tasks table yet.
    fn connect_read_only(&self) -> Result<Option<Connection>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        if !has_table(&conn, "tasks")? {
            return Ok(None);
        }
        Ok(Some(conn))
    }

    /// Schema version stamped in the database, if any.
    pub fn schema_version(&self) -> Result<Option<u32>> {
        let Some(conn) = self.connect_read_only()? else {
            return Ok(None);
        };
        if !has_table(&conn, "schema_meta")? {
            return Ok(None);
        }
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|raw| raw.parse().ok()))
    }

    fn query(&self, sql: &str, date: Option<NaiveDate>) -> Result<Vec<Task>> {
        let Some(conn) = self.connect_read_only()? else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare(sql)?;
        let rows = match date {
            Some(date) => stmt.query_map(params![format_date(date)], row_to_task)?,
            None => stmt.query_map([], row_to_task)?,
        };

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        debug!(path = %self.path.display(), count = tasks.len(), "queried tasks");
        Ok(tasks)
    }
}

fn has_table(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![name],
        |row| row.get(0),
    )
}

fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        params![SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

impl TaskBackend for SqliteStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Sqlite
    }

    fn location(&self) -> &Path {
        &self.path
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.connect_read_only()?.is_some() {
            return Ok(());
        }
        self.connect()?;
        info!(path = %self.path.display(), "created task database");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Task>> {
        self.query(&format!("{SELECT_COLUMNS} ORDER BY id"), None)
    }

    // Stored times may be unpadded ("9:00"), so ordering happens on parsed values.
    fn load_for_date(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let mut tasks = self.query(&format!("{SELECT_COLUMNS} WHERE date = ?1"), Some(date))?;
        sort_by_schedule(&mut tasks);
        Ok(tasks)
    }

    fn next_id(&self) -> Result<u64> {
        let Some(conn) = self.connect_read_only()? else {
            return Ok(1);
        };
        let max: Option<i64> = conn.query_row("SELECT MAX(id) FROM tasks", [], |row| row.get(0))?;
        match max {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| Error::OperationFailed("task id space exhausted".to_string()))
                .and_then(rowid_to_id),
        }
    }

    fn insert(&self, new: NewTask) -> Result<Task> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO tasks (date, scheduled_time, description, priority, status, category) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format_date(new.date),
                format_time(new.scheduled_time),
                new.description,
                new.priority.as_str(),
                Status::Pending.as_str(),
                new.category.as_str(),
            ],
        )?;
        let id = rowid_to_id(conn.last_insert_rowid())?;
        debug!(path = %self.path.display(), id, "inserted task");
        Ok(Task::from_new(id, new))
    }

    fn set_status(&self, id: u64, status: Status) -> Result<bool> {
        let Some(id) = sql_id(id) else {
            return Ok(false);
        };
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(changed > 0)
    }

    fn remove(&self, id: u64) -> Result<bool> {
        let Some(id) = sql_id(id) else {
            return Ok(false);
        };
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

fn sql_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn rowid_to_id(rowid: i64) -> Result<u64> {
    u64::try_from(rowid)
        .map_err(|_| Error::OperationFailed(format!("database returned invalid task id {rowid}")))
}

fn conversion_error(
    idx: usize,
    ty: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

#[derive(Debug, thiserror::Error)]
#[error("invalid {field} '{value}'")]
struct BadColumn {
    field: &'static str,
    value: String,
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let date: String = row.get(1)?;
    let time: String = row.get(2)?;
    let priority: String = row.get(4)?;
    let status: String = row.get(5)?;
    let category: String = row.get(6)?;

    Ok(Task {
        id: u64::try_from(id).map_err(|err| conversion_error(0, Type::Integer, err))?,
        date: parse_date(&date).ok_or_else(|| {
            conversion_error(1, Type::Text, BadColumn { field: "date", value: date.clone() })
        })?,
        scheduled_time: parse_time(&time).ok_or_else(|| {
            conversion_error(
                2,
                Type::Text,
                BadColumn {
                    field: "scheduled_time",
                    value: time.clone(),
                },
            )
        })?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        priority: priority
            .parse()
            .map_err(|err| conversion_error(4, Type::Text, err))?,
        status: status
            .parse()
            .map_err(|err| conversion_error(5, Type::Text, err))?,
        category: category
            .parse()
            .map_err(|err| conversion_error(6, Type::Text, err))?,
    })
}
