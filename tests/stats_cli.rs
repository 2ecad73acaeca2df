mod support;

use chrono::{Duration, Local};
use predicates::str::contains;
use serde_json::Value;

use support::{TestDataDir, BACKENDS};

fn days_ago(days: i64) -> String {
    (Local::now().date_naive() - Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn add_with(data: &TestDataDir, backend: &str, description: &str, date: &str, category: &str) -> u64 {
    let value = data.json(
        backend,
        &[
            "add",
            description,
            "--date",
            date,
            "--time",
            "09:00",
            "--category",
            category,
        ],
    );
    value["data"]["id"].as_u64().expect("id")
}

fn cell(stats: &Value, category: &str, status: &str) -> Option<u64> {
    stats["data"]["category_by_status"]["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .find(|row| row["category"].as_str() == Some(category))?["counts"]
        .as_array()
        .expect("counts")
        .iter()
        .find(|entry| entry["status"].as_str() == Some(status))
        .and_then(|entry| entry["count"].as_u64())
}

#[test]
fn stats_cross_tabulates_categories() {
    for backend in BACKENDS {
        let data = TestDataDir::new();
        add_with(&data, backend, "Standup", "2024-01-01", "Work");
        add_with(&data, backend, "Report", "2024-01-02", "Work");
        add_with(&data, backend, "Run", "2024-01-02", "Health");
        data.json(backend, &["status", "2", "Completed"]);

        let stats = data.json(backend, &["stats"]);
        assert_eq!(stats["command"], "stats");
        assert_eq!(stats["data"]["total"], 3);

        let statuses = stats["data"]["category_by_status"]["statuses"]
            .as_array()
            .expect("statuses");
        assert_eq!(statuses.len(), 2, "{backend}");
        assert_eq!(cell(&stats, "Work", "Pending"), Some(1));
        assert_eq!(cell(&stats, "Work", "Completed"), Some(1));
        assert_eq!(cell(&stats, "Health", "Completed"), Some(0));
        assert_eq!(cell(&stats, "Study", "Pending"), None);
    }
}

#[test]
fn stats_on_empty_store_warns() {
    let data = TestDataDir::new();
    let stats = data.json("csv", &["stats"]);
    assert_eq!(stats["data"]["total"], 0);
    assert!(stats["data"]["status_counts"]
        .as_array()
        .expect("counts")
        .is_empty());
    assert_eq!(stats["warnings"][0], "No tasks recorded yet");

    data.cmd("csv")
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("No tasks recorded yet"));
}

#[test]
fn weekly_counts_trailing_window() {
    for backend in BACKENDS {
        let data = TestDataDir::new();
        let today = days_ago(0);
        let edge = days_ago(7);
        let outside = days_ago(8);
        add_with(&data, backend, "Today", &today, "Work");
        add_with(&data, backend, "Edge", &edge, "Work");
        add_with(&data, backend, "Old", &outside, "Work");
        data.json(backend, &["status", "1", "Completed"]);
        data.json(backend, &["status", "2", "Completed"]);
        data.json(backend, &["status", "3", "Completed"]);

        let weekly = data.json(backend, &["weekly"]);
        assert_eq!(weekly["command"], "weekly");
        assert_eq!(weekly["data"]["window_days"], 7);
        assert_eq!(weekly["data"]["start"], edge.as_str());
        assert_eq!(weekly["data"]["end"], today.as_str());
        assert_eq!(weekly["data"]["completed_total"], 2, "{backend}");

        let days = weekly["data"]["days"].as_array().expect("days");
        let dates: Vec<&str> = days
            .iter()
            .map(|entry| entry["date"].as_str().expect("date"))
            .collect();
        assert_eq!(dates, vec![edge.as_str(), today.as_str()], "{backend}");

        let wider = data.json(backend, &["weekly", "--days", "30"]);
        assert_eq!(wider["data"]["completed_total"], 3, "{backend}");
    }
}

#[test]
fn weekly_window_comes_from_config() {
    let data = TestDataDir::new();
    data.write_config("[stats]\nweekly_window_days = 1\n")
        .expect("config");
    add_with(&data, "csv", "Old", &days_ago(3), "Work");

    let weekly = data.json("csv", &["weekly"]);
    assert_eq!(weekly["data"]["window_days"], 1);
    assert!(weekly["data"]["days"].as_array().expect("days").is_empty());
    assert_eq!(weekly["data"]["completed_total"], 0);
    assert!(weekly["warnings"][0]
        .as_str()
        .expect("warning")
        .contains("No tasks in the last 1 days"));
}

#[test]
fn weekly_rejects_out_of_range_window() {
    let data = TestDataDir::new();
    data.cmd("csv")
        .args(["weekly", "--days", "0"])
        .assert()
        .code(2)
        .stderr(contains("--days must be between 1 and 366"));
}
