//! Properties every task backend must share.

use planner::config::{Config, StorageKind};
use planner::repository::{DeleteOutcome, TaskRepository};
use planner::stats;
use planner::task::{parse_date, parse_time, Category, NewTask, Priority, Status};

const KINDS: [StorageKind; 2] = [StorageKind::Csv, StorageKind::Sqlite];

fn new_task(date: &str, time: &str, description: &str) -> NewTask {
    NewTask {
        date: parse_date(date).expect("date"),
        scheduled_time: parse_time(time).expect("time"),
        description: description.to_string(),
        priority: Priority::Low,
        category: Category::Study,
    }
}

fn open(kind: StorageKind, dir: &std::path::Path) -> TaskRepository {
    TaskRepository::open(dir, kind, &Config::default()).expect("open repository")
}

#[test]
fn ids_are_strictly_increasing() {
    for kind in KINDS {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(kind, dir.path());
        let mut previous = 0;
        for (idx, time) in ["09:00", "07:00", "23:59", "00:00", "12:30"].iter().enumerate() {
            let task = repo
                .add(new_task("2024-03-01", time, &format!("task {idx}")))
                .expect("add");
            assert!(task.id > previous, "{kind:?}");
            assert_eq!(task.status, Status::Pending);
            previous = task.id;
        }
    }
}

#[test]
fn date_listing_is_filtered_and_ordered() {
    for kind in KINDS {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(kind, dir.path());
        repo.add(new_task("2024-03-01", "18:00", "evening")).expect("add");
        repo.add(new_task("2024-03-02", "06:00", "other day")).expect("add");
        repo.add(new_task("2024-03-01", "07:15", "morning")).expect("add");
        repo.add(new_task("2024-03-01", "12:00", "noon")).expect("add");

        let day = parse_date("2024-03-01").expect("date");
        let tasks = repo.list(Some(day)).expect("list");
        assert!(tasks.iter().all(|task| task.date == day), "{kind:?}");
        let descriptions: Vec<&str> = tasks.iter().map(|task| task.description.as_str()).collect();
        assert_eq!(descriptions, vec!["morning", "noon", "evening"], "{kind:?}");
    }
}

#[test]
fn status_updates_touch_only_their_task() {
    for kind in KINDS {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(kind, dir.path());
        let first = repo.add(new_task("2024-03-01", "09:00", "a")).expect("add");
        let second = repo.add(new_task("2024-03-01", "10:00", "b")).expect("add");

        for status in [Status::InProgress, Status::Completed, Status::Pending, Status::Completed] {
            assert!(repo.update_status(first.id, status).expect("update"));
            let tasks = repo.list(None).expect("list");
            assert_eq!(tasks[0].status, status, "{kind:?}");
            assert_eq!(tasks[1].status, Status::Pending, "{kind:?}");
        }
        assert_eq!(repo.get(second.id).expect("get"), Some(second));
    }
}

#[test]
fn delete_is_idempotent() {
    for kind in KINDS {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(kind, dir.path());
        let task = repo.add(new_task("2024-03-01", "09:00", "a")).expect("add");
        repo.add(new_task("2024-03-01", "10:00", "b")).expect("add");

        assert_eq!(repo.delete(task.id, true).expect("delete"), DeleteOutcome::Deleted);
        assert_eq!(repo.delete(task.id, true).expect("delete"), DeleteOutcome::NotFound);
        let remaining = repo.list(None).expect("list");
        assert_eq!(remaining.len(), 1, "{kind:?}");
        assert!(remaining.iter().all(|t| t.id != task.id));
    }
}

#[test]
fn status_counts_cover_every_task() {
    for kind in KINDS {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(kind, dir.path());
        for idx in 0..6u64 {
            let task = repo
                .add(new_task("2024-03-01", "09:00", &format!("t{idx}")))
                .expect("add");
            let status = Status::ALL[(idx % 3) as usize];
            repo.update_status(task.id, status).expect("update");
        }
        let tasks = repo.list(None).expect("list");
        let counts = stats::status_counts(&tasks);
        let total: usize = counts.iter().map(|entry| entry.count).sum();
        assert_eq!(total, tasks.len(), "{kind:?}");
        assert!(counts.iter().all(|entry| entry.count == 2), "{kind:?}");
    }
}

#[test]
fn descriptions_survive_storage() {
    for kind in KINDS {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(kind, dir.path());
        let text = "Call \"Ana\", then buy milk; café ☕";
        let task = repo.add(new_task("2024-03-01", "09:00", text)).expect("add");
        let loaded = repo.get(task.id).expect("get").expect("task exists");
        assert_eq!(loaded.description, text, "{kind:?}");
    }
}

#[test]
fn unpadded_times_sort_the_same_on_every_backend() {
    let csv_dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        csv_dir.path().join("tasks.csv"),
        "id,date,scheduled_time,description,priority,status,category\n\
         1,2024-03-01,10:00,late,Low,Pending,Work\n\
         2,2024-03-01,9:00,early,Low,Pending,Work\n",
    )
    .expect("seed csv");

    let sqlite_dir = tempfile::tempdir().expect("tempdir");
    open(StorageKind::Sqlite, sqlite_dir.path());
    let conn = rusqlite::Connection::open(sqlite_dir.path().join("tasks.db")).expect("open db");
    conn.execute_batch(
        "INSERT INTO tasks (id, date, scheduled_time, description, priority, status, category) \
         VALUES (1, '2024-03-01', '10:00', 'late', 'Low', 'Pending', 'Work'); \
         INSERT INTO tasks (id, date, scheduled_time, description, priority, status, category) \
         VALUES (2, '2024-03-01', '9:00', 'early', 'Low', 'Pending', 'Work');",
    )
    .expect("seed db");
    drop(conn);

    let day = parse_date("2024-03-01").expect("date");
    for (kind, dir) in [
        (StorageKind::Csv, csv_dir.path()),
        (StorageKind::Sqlite, sqlite_dir.path()),
    ] {
        let tasks = open(kind, dir).list(Some(day)).expect("list");
        let ids: Vec<u64> = tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![2, 1], "{kind:?}");
        assert!(
            tasks
                .windows(2)
                .all(|pair| pair[0].scheduled_time <= pair[1].scheduled_time),
            "{kind:?}"
        );
    }
}
