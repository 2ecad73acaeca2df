//! Tabular (CSV) task store.
//!
//! The whole file is read for every operation and rewritten for every change.
//! Rewrites go through a temp file in the same directory followed by a rename,
//! so readers see either the old file or the new one.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{ensure_parent_dir, next_id_for, TaskBackend, COLUMNS};
use crate::config::StorageKind;
use crate::error::{Error, Result};
use crate::task::{NewTask, Status, Task};

#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;

        let mut tasks = Vec::new();
        for record in reader.deserialize::<Task>() {
            let task = record.map_err(|err| Error::CorruptStore {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
            tasks.push(task);
        }
        debug!(path = %self.path.display(), count = tasks.len(), "read tasks");
        Ok(tasks)
    }

    fn write(&self, tasks: &[Task]) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir)?;
        {
            // Header written by hand so an empty store still carries it.
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(temp.as_file_mut());
            writer.write_record(COLUMNS)?;
            for task in tasks {
                writer.serialize(task)?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| Error::Io(err.error))?;

        debug!(path = %self.path.display(), count = tasks.len(), "wrote tasks");
        Ok(())
    }
}

impl TaskBackend for CsvStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Csv
    }

    fn location(&self) -> &Path {
        &self.path
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.write(&[])?;
        info!(path = %self.path.display(), "created empty task file");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Task>> {
        self.read()
    }

    fn insert(&self, new: NewTask) -> Result<Task> {
        let mut tasks = self.read()?;
        let task = Task::from_new(next_id_for(&tasks)?, new);
        tasks.push(task.clone());
        self.write(&tasks)?;
        Ok(task)
    }

    fn set_status(&self, id: u64, status: Status) -> Result<bool> {
        let mut tasks = self.read()?;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };
        task.status = status;
        self.write(&tasks)?;
        Ok(true)
    }

    fn remove(&self, id: u64) -> Result<bool> {
        let mut tasks = self.read()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write(&tasks)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::task::{parse_date, parse_time, Category, Priority};

    fn new_task(date: &str, time: &str, description: &str) -> NewTask {
        NewTask {
            date: parse_date(date).expect("date"),
            scheduled_time: parse_time(time).expect("time"),
            description: description.to_string(),
            priority: Priority::Medium,
            category: Category::Work,
        }
    }

    #[test]
    fn initialization_writes_header_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvStore::new(dir.path().join("tasks.csv"));
        store.ensure_initialized().expect("init");

        let content = fs::read_to_string(store.location()).expect("read");
        assert_eq!(
            content.trim(),
            "id,date,scheduled_time,description,priority,status,category"
        );
        assert!(store.load_all().expect("load").is_empty());
    }

    #[test]
    fn initialization_keeps_existing_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvStore::new(dir.path().join("tasks.csv"));
        store
            .insert(new_task("2024-01-01", "09:00", "Standup"))
            .expect("insert");
        store.ensure_initialized().expect("init");
        assert_eq!(store.load_all().expect("load").len(), 1);
    }

    #[test]
    fn descriptions_with_commas_and_quotes_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvStore::new(dir.path().join("tasks.csv"));
        let text = "Buy milk, eggs and \"good\" bread\nthen call mom";
        store
            .insert(new_task("2024-01-01", "09:00", text))
            .expect("insert");

        let tasks = store.load_all().expect("load");
        assert_eq!(tasks[0].description, text);
    }

    #[test]
    fn legacy_file_with_portuguese_labels_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.csv");
        fs::write(
            &path,
            "id,date,scheduled_time,description,priority,status,category\n\
             1,2024-03-04,08:30,Relatório,Alta,Concluída,Trabalho\n\
             2,2024-03-04,07:15:00,Corrida,Baixa,Em Andamento,Saúde\n",
        )
        .expect("write legacy");

        let store = CsvStore::new(&path);
        let tasks = store.load_all().expect("load");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].status, Status::Completed);
        assert_eq!(tasks[1].category, Category::Health);
        assert_eq!(tasks[1].status, Status::InProgress);

        store.set_status(2, Status::Completed).expect("update");
        let content = fs::read_to_string(&path).expect("read");
        assert!(content.contains("2,2024-03-04,07:15,Corrida,Low,Completed,Health"));
    }

    #[test]
    fn empty_file_reads_as_no_tasks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.csv");
        fs::write(&path, "").expect("write");
        let store = CsvStore::new(&path);
        assert!(store.load_all().expect("load").is_empty());
        assert_eq!(store.next_id().expect("next id"), 1);
    }

    #[test]
    fn unknown_label_reports_corrupt_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.csv");
        fs::write(
            &path,
            "id,date,scheduled_time,description,priority,status,category\n\
             1,2024-03-04,08:30,Thing,Urgent,Pending,Work\n",
        )
        .expect("write");

        let err = CsvStore::new(&path).load_all().expect_err("corrupt");
        assert!(matches!(err, Error::CorruptStore { .. }));
    }

    #[test]
    fn insert_refuses_when_ids_are_exhausted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.csv");
        fs::write(
            &path,
            "id,date,scheduled_time,description,priority,status,category\n\
             18446744073709551615,2024-01-01,09:00,Last,Medium,Pending,Work\n",
        )
        .expect("write");
        let store = CsvStore::new(&path);
        let before = fs::read_to_string(&path).expect("read");

        let err = store
            .insert(new_task("2024-01-01", "10:00", "Overflow"))
            .expect_err("no id left");
        assert!(matches!(err, Error::OperationFailed(_)));
        assert!(store.next_id().is_err());

        let ids: Vec<u64> = store.load_all().expect("load").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![u64::MAX]);
        assert_eq!(fs::read_to_string(&path).expect("read"), before);
    }

    #[test]
    fn missing_id_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CsvStore::new(dir.path().join("tasks.csv"));
        store
            .insert(new_task("2024-01-01", "09:00", "Standup"))
            .expect("insert");
        let before = fs::read_to_string(store.location()).expect("read");

        assert!(!store.set_status(42, Status::Completed).expect("update"));
        assert!(!store.remove(42).expect("remove"));

        let after = fs::read_to_string(store.location()).expect("read");
        assert_eq!(before, after);
    }
}
