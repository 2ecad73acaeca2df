//! Task data model.
//!
//! A task is one scheduled activity: a date, a time of day, a free-text
//! description and three enumerated labels (priority, category, status).
//! Labels are stored under their canonical English names; parsing is lenient
//! so data written by older Portuguese-language planners still loads.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

/// Error returned when a label does not name a known priority, category or status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.trim().to_string(),
            expected: expected.join(", "),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

fn normalize_label(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .collect()
}

fn match_label<T: Copy>(value: &str, table: &[(T, &[&str])]) -> Option<T> {
    let wanted = normalize_label(value);
    if wanted.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(_, names)| names.iter().any(|name| normalize_label(name) == wanted))
        .map(|(item, _)| *item)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    const NAMES: [(Priority, &'static [&'static str]); 3] = [
        (Priority::High, &["High", "Alta"]),
        (Priority::Medium, &["Medium", "Média", "Media"]),
        (Priority::Low, &["Low", "Baixa"]),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Work,
    Personal,
    Study,
    Health,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Health,
    ];

    const NAMES: [(Category, &'static [&'static str]); 4] = [
        (Category::Work, &["Work", "Trabalho"]),
        (Category::Personal, &["Personal", "Pessoal"]),
        (Category::Study, &["Study", "Estudo"]),
        (Category::Health, &["Health", "Saúde", "Saude"]),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Study => "Study",
            Category::Health => "Health",
        }
    }
}

/// Lifecycle tag of a task. Any transition between the three values is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    const NAMES: [(Status, &'static [&'static str]); 3] = [
        (Status::Pending, &["Pending", "Pendente"]),
        (Status::InProgress, &["In-Progress", "Em Andamento"]),
        (Status::Completed, &["Completed", "Concluída", "Concluida"]),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In-Progress",
            Status::Completed => "Completed",
        }
    }
}

macro_rules! label_impls {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseLabelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match_label(value, &<$ty>::NAMES).ok_or_else(|| {
                    let expected: Vec<&str> = <$ty>::ALL.iter().map(|item| item.as_str()).collect();
                    ParseLabelError::new($kind, value, &expected)
                })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ParseLabelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

label_impls!(Priority, "priority");
label_impls!(Category, "category");
label_impls!(Status, "status");

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parse an `HH:MM` time of day. `HH:MM:SS` is accepted and truncated to minutes.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, TIME_FORMAT_SECONDS))
        .ok()
        .map(truncate_to_minute)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

mod date_serde {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{raw}' (expected YYYY-MM-DD)")))
    }
}

mod time_serde {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid time '{raw}' (expected HH:MM)")))
    }
}

/// One scheduled activity. Field order matches the tabular file columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(with = "date_serde")]
    pub date: NaiveDate,
    #[serde(with = "time_serde")]
    pub scheduled_time: NaiveTime,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
}

impl Task {
    /// Build a freshly created task. New tasks always start Pending.
    pub fn from_new(id: u64, new: NewTask) -> Self {
        Self {
            id,
            date: new.date,
            scheduled_time: truncate_to_minute(new.scheduled_time),
            description: new.description,
            priority: new.priority,
            status: Status::Pending,
            category: new.category,
        }
    }
}

/// Input for creating a task; the id and status are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

/// Order tasks by time of day, breaking ties by id.
pub fn sort_by_schedule(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.scheduled_time
            .cmp(&right.scheduled_time)
            .then_with(|| left.id.cmp(&right.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("high".parse::<Priority>().expect("priority"), Priority::High);
        assert_eq!(" WORK ".parse::<Category>().expect("category"), Category::Work);
        assert_eq!(
            "in_progress".parse::<Status>().expect("status"),
            Status::InProgress
        );
        assert_eq!(
            "In Progress".parse::<Status>().expect("status"),
            Status::InProgress
        );
        assert_eq!(
            "in-progress".parse::<Status>().expect("status"),
            Status::InProgress
        );
    }

    #[test]
    fn legacy_portuguese_labels_parse() {
        assert_eq!("Média".parse::<Priority>().expect("priority"), Priority::Medium);
        assert_eq!("Saúde".parse::<Category>().expect("category"), Category::Health);
        assert_eq!(
            "Em Andamento".parse::<Status>().expect("status"),
            Status::InProgress
        );
        assert_eq!("Concluída".parse::<Status>().expect("status"), Status::Completed);
        assert_eq!("Pendente".parse::<Status>().expect("status"), Status::Pending);
    }

    #[test]
    fn unknown_label_lists_expected_values() {
        let err = "urgent".parse::<Priority>().expect_err("unknown");
        assert_eq!(err.kind(), "priority");
        let message = err.to_string();
        assert!(message.contains("urgent"));
        assert!(message.contains("High, Medium, Low"));

        assert!("".parse::<Status>().is_err());
    }

    #[test]
    fn time_parsing_truncates_seconds() {
        let time = parse_time("09:30:45").expect("time");
        assert_eq!(format_time(time), "09:30");
        assert!(parse_time("25:00").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }

    #[test]
    fn task_serializes_with_canonical_labels() {
        let new = NewTask {
            date: parse_date("2024-01-01").expect("date"),
            scheduled_time: parse_time("09:00").expect("time"),
            description: "Standup".to_string(),
            priority: Priority::Medium,
            category: Category::Work,
        };
        let task = Task::from_new(1, new);
        assert_eq!(task.status, Status::Pending);

        let value = serde_json::to_value(&task).expect("json");
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["scheduled_time"], "09:00");
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["priority"], "Medium");

        let mut legacy = value.clone();
        legacy["status"] = serde_json::Value::from("Concluída");
        let parsed: Task = serde_json::from_value(legacy).expect("legacy task");
        assert_eq!(parsed.status, Status::Completed);
    }

    #[test]
    fn sort_by_schedule_breaks_ties_by_id() {
        let date = parse_date("2024-01-01").expect("date");
        let make = |id: u64, time: &str| Task {
            id,
            date,
            scheduled_time: parse_time(time).expect("time"),
            description: String::new(),
            priority: Priority::Low,
            status: Status::Pending,
            category: Category::Personal,
        };
        let mut tasks = vec![make(3, "10:00"), make(2, "08:00"), make(1, "10:00")];
        sort_by_schedule(&mut tasks);
        let ids: Vec<u64> = tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
