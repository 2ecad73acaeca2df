//! Group-by-count aggregations over the task set.
//!
//! Everything here is a pure function of a task slice, so the CLI, the
//! dashboard and the tests share one implementation regardless of backend.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::task::{Category, Status, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

/// Counts for one category, one entry per column of the owning table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStatusRow {
    pub category: Category,
    pub counts: Vec<StatusCount>,
}

/// Category-by-status cross-tabulation. Only categories and statuses that
/// occur in the data get a row or column; cells inside the table may be zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStatusTable {
    pub statuses: Vec<Status>,
    pub rows: Vec<CategoryStatusRow>,
}

impl CategoryStatusTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, category: Category, status: Status) -> usize {
        self.rows
            .iter()
            .find(|row| row.category == category)
            .and_then(|row| row.counts.iter().find(|entry| entry.status == status))
            .map_or(0, |entry| entry.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyStatusCount {
    pub date: NaiveDate,
    pub status: Status,
    pub count: usize,
}

/// Status distribution and category breakdown over every task.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub status_counts: Vec<StatusCount>,
    pub category_by_status: CategoryStatusTable,
}

/// Per-day per-status counts for the trailing window ending today.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub window_days: u32,
    pub days: Vec<DailyStatusCount>,
    pub completed_total: usize,
}

/// Count tasks per status, in status order. Statuses with no tasks are omitted.
pub fn status_counts(tasks: &[Task]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<Status, usize> = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.status).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

pub fn category_by_status(tasks: &[Task]) -> CategoryStatusTable {
    let mut cells: BTreeMap<(Category, Status), usize> = BTreeMap::new();
    let mut categories = BTreeSet::new();
    let mut statuses = BTreeSet::new();
    for task in tasks {
        *cells.entry((task.category, task.status)).or_default() += 1;
        categories.insert(task.category);
        statuses.insert(task.status);
    }

    let statuses: Vec<Status> = statuses.into_iter().collect();
    let rows = categories
        .into_iter()
        .map(|category| CategoryStatusRow {
            category,
            counts: statuses
                .iter()
                .map(|&status| StatusCount {
                    status,
                    count: cells.get(&(category, status)).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    CategoryStatusTable { statuses, rows }
}

/// First day of the trailing window `[today - window_days, today]`.
pub fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Tasks dated within `[today - window_days, today]`, grouped by date and
/// status. Sorted by date, then status. Days without tasks are not filled in.
pub fn weekly_stats(tasks: &[Task], today: NaiveDate, window_days: u32) -> Vec<DailyStatusCount> {
    let start = window_start(today, window_days);
    let mut groups: BTreeMap<(NaiveDate, Status), usize> = BTreeMap::new();
    for task in tasks
        .iter()
        .filter(|task| task.date >= start && task.date <= today)
    {
        *groups.entry((task.date, task.status)).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|((date, status), count)| DailyStatusCount {
            date,
            status,
            count,
        })
        .collect()
}

pub fn completed_total(days: &[DailyStatusCount]) -> usize {
    days.iter()
        .filter(|entry| entry.status == Status::Completed)
        .map(|entry| entry.count)
        .sum()
}

pub fn dashboard(tasks: &[Task]) -> Dashboard {
    Dashboard {
        generated_at: Utc::now(),
        total: tasks.len(),
        status_counts: status_counts(tasks),
        category_by_status: category_by_status(tasks),
    }
}

pub fn weekly(tasks: &[Task], today: NaiveDate, window_days: u32) -> WeeklySummary {
    let days = weekly_stats(tasks, today, window_days);
    WeeklySummary {
        start: window_start(today, window_days),
        end: today,
        window_days,
        completed_total: completed_total(&days),
        days,
    }
}

pub fn format_status_counts(counts: &[StatusCount]) -> String {
    counts
        .iter()
        .map(|entry| format!("{}={}", entry.status, entry.count))
        .collect::<Vec<_>>()
        .join(", ")
}
