//! Typed task operations on top of a storage backend.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{Config, StorageKind};
use crate::error::{Error, Result};
use crate::storage::{self, TaskBackend};
use crate::task::{NewTask, Status, Task};

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug)]
pub struct TaskRepository {
    backend: Box<dyn TaskBackend>,
    protect_pending: bool,
}

impl TaskRepository {
    pub fn new(backend: Box<dyn TaskBackend>, protect_pending: bool) -> Self {
        Self {
            backend,
            protect_pending,
        }
    }

    /// Open the store of `kind` in `data_dir`, creating an empty one if needed.
    pub fn open(data_dir: &Path, kind: StorageKind, config: &Config) -> Result<Self> {
        let backend = storage::open(kind, data_dir, &config.storage);
        backend.ensure_initialized()?;
        Ok(Self::new(backend, config.tasks.protect_pending))
    }

    pub fn backend(&self) -> &dyn TaskBackend {
        self.backend.as_ref()
    }

    pub fn protects_pending(&self) -> bool {
        self.protect_pending
    }

    /// Append a task with status Pending and return it with its assigned id.
    pub fn add(&self, mut new: NewTask) -> Result<Task> {
        new.description = new.description.trim().to_string();
        let task = self.backend.insert(new)?;
        debug!(id = task.id, date = %task.date, "added task");
        Ok(task)
    }

    /// All tasks, or the tasks on `date` ordered by scheduled time.
    pub fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Task>> {
        match date {
            Some(date) => self.backend.load_for_date(date),
            None => self.backend.load_all(),
        }
    }

    pub fn get(&self, id: u64) -> Result<Option<Task>> {
        Ok(self.backend.load_all()?.into_iter().find(|task| task.id == id))
    }

    /// Set a task's status. Returns false (and changes nothing) when `id` is unknown.
    pub fn update_status(&self, id: u64, status: Status) -> Result<bool> {
        let updated = self.backend.set_status(id, status)?;
        if updated {
            debug!(id, status = %status, "updated task status");
        } else {
            warn!(id, "status update for unknown task ignored");
        }
        Ok(updated)
    }

    /// Remove a task. Unknown ids are a no-op; Pending tasks are refused while
    /// the guard is on unless `force` is set.
    pub fn delete(&self, id: u64, force: bool) -> Result<DeleteOutcome> {
        let Some(task) = self.get(id)? else {
            warn!(id, "delete for unknown task ignored");
            return Ok(DeleteOutcome::NotFound);
        };
        if self.protect_pending && !force && task.status == Status::Pending {
            return Err(Error::PendingTaskDelete(id));
        }
        if self.backend.remove(id)? {
            debug!(id, "deleted task");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    pub fn next_id(&self) -> Result<u64> {
        self.backend.next_id()
    }
}
