//! planner task command implementations.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::config::{self, validate_window_days, Config, StorageKind};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::repository::{DeleteOutcome, TaskRepository};
use crate::stats;
use crate::task::{
    format_date, format_time, parse_date, parse_time, Category, NewTask, Priority, Status, Task,
};
use crate::ui::dashboard::DashboardOptions;

/// Flags shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<StorageKind>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub description: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub date: Option<String>,
    pub today: bool,
    pub status: Option<String>,
    pub global: GlobalOptions,
}

pub struct StatusOptions {
    pub id: u64,
    pub status: String,
    pub global: GlobalOptions,
}

pub struct DeleteOptions {
    pub id: u64,
    pub force: bool,
    pub global: GlobalOptions,
}

pub struct WeeklyOptions {
    pub days: Option<u32>,
    pub global: GlobalOptions,
}

pub struct TuiOptions {
    pub date: Option<String>,
    pub global: GlobalOptions,
}

struct TaskContext {
    repo: TaskRepository,
    config: Config,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let description = options.description.trim();
    if description.is_empty() {
        return Err(Error::InvalidArgument(
            "description cannot be empty".to_string(),
        ));
    }

    let now = Local::now();
    let date = parse_date_arg("date", options.date.as_deref())?.unwrap_or(now.date_naive());
    let scheduled_time = parse_time_arg("time", options.time.as_deref())?.unwrap_or(now.time());
    let priority = match options.priority.as_deref() {
        Some(value) => value.parse::<Priority>()?,
        None => ctx.config.tasks.priority()?,
    };
    let category = match options.category.as_deref() {
        Some(value) => value.parse::<Category>()?,
        None => ctx.config.tasks.category()?,
    };

    let task = ctx.repo.add(NewTask {
        date,
        scheduled_time,
        description: description.to_string(),
        priority,
        category,
    })?;

    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Date", format_date(task.date));
    human.push_summary("Time", format_time(task.scheduled_time));
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Category", task.category.to_string());
    human.push_summary("Status", task.status.to_string());
    human.push_next_step(format!("planner list --date {}", format_date(task.date)));

    emit_success(options.global.output(), "add", &task, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let date = if options.today {
        Some(Local::now().date_naive())
    } else {
        parse_date_arg("date", options.date.as_deref())?
    };
    let status = options
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;

    let mut tasks = ctx.repo.list(date)?;
    if let Some(status) = status {
        tasks.retain(|task| task.status == status);
    }

    let header = match date {
        Some(date) => format!("Tasks for {}", format_date(date)),
        None => "Tasks".to_string(),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("Total", tasks.len().to_string());
    if let Some(status) = status {
        human.push_summary("Status", status.to_string());
    }
    if tasks.is_empty() {
        human.push_warning(match date {
            Some(date) => format!("No tasks scheduled for {}", format_date(date)),
            None => "No tasks recorded yet".to_string(),
        });
        human.push_next_step("planner add <DESCRIPTION>");
    }
    for task in &tasks {
        human.push_detail(format_task_line(task, date.is_none()));
    }

    let output = TaskListOutput {
        date,
        status,
        total: tasks.len(),
        tasks,
    };
    emit_success(options.global.output(), "list", &output, Some(&human))
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let status = options.status.parse::<Status>()?;
    let updated = ctx.repo.update_status(options.id, status)?;

    let mut human = if updated {
        HumanOutput::new("Status updated")
    } else {
        HumanOutput::new("Nothing to update")
    };
    human.push_summary("ID", options.id.to_string());
    human.push_summary("Status", status.to_string());
    if !updated {
        human.push_warning(format!("task {} not found; nothing changed", options.id));
    }

    let output = StatusOutput {
        id: options.id,
        status,
        updated,
    };
    emit_success(options.global.output(), "status", &output, Some(&human))
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let outcome = ctx.repo.delete(options.id, options.force)?;

    let mut human = match outcome {
        DeleteOutcome::Deleted => HumanOutput::new("Task deleted"),
        DeleteOutcome::NotFound => HumanOutput::new("Nothing to delete"),
    };
    human.push_summary("ID", options.id.to_string());
    if outcome == DeleteOutcome::NotFound {
        human.push_warning(format!("task {} not found; nothing changed", options.id));
    }

    let output = DeleteOutput {
        id: options.id,
        outcome,
    };
    emit_success(options.global.output(), "delete", &output, Some(&human))
}

pub fn run_stats(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let tasks = ctx.repo.list(None)?;
    let board = stats::dashboard(&tasks);

    let mut human = HumanOutput::new("Dashboard");
    human.push_summary("Total", board.total.to_string());
    if board.total == 0 {
        human.push_warning("No tasks recorded yet");
    } else {
        human.push_summary("Statuses", stats::format_status_counts(&board.status_counts));
        for row in &board.category_by_status.rows {
            human.push_detail(format!(
                "{}: {}",
                row.category,
                stats::format_status_counts(&row.counts)
            ));
        }
    }

    emit_success(global.output(), "stats", &board, Some(&human))
}

pub fn run_weekly(options: WeeklyOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let window_days = options
        .days
        .unwrap_or(ctx.config.stats.weekly_window_days);
    validate_window_days(window_days, "--days")?;

    let tasks = ctx.repo.list(None)?;
    let summary = stats::weekly(&tasks, Local::now().date_naive(), window_days);

    let mut human = HumanOutput::new("Weekly summary");
    human.push_summary(
        "Window",
        format!(
            "{} .. {}",
            format_date(summary.start),
            format_date(summary.end)
        ),
    );
    human.push_summary("Completed", summary.completed_total.to_string());
    if summary.days.is_empty() {
        human.push_warning(format!("No tasks in the last {window_days} days"));
    }
    for entry in &summary.days {
        human.push_detail(format!(
            "{} {}={}",
            format_date(entry.date),
            entry.status,
            entry.count
        ));
    }

    emit_success(options.global.output(), "weekly", &summary, Some(&human))
}

pub fn run_next_id(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let next_id = ctx.repo.next_id()?;

    let mut human = HumanOutput::new("Next task id");
    human.push_summary("ID", next_id.to_string());

    emit_success(global.output(), "next-id", &NextIdOutput { next_id }, Some(&human))
}

pub fn run_tui(options: TuiOptions) -> Result<()> {
    if options.global.json {
        return Err(Error::InvalidArgument(
            "tui does not support --json".to_string(),
        ));
    }
    if options.global.quiet {
        return Err(Error::InvalidArgument(
            "tui does not support --quiet".to_string(),
        ));
    }
    let ctx = load_context(&options.global)?;
    let date = parse_date_arg("date", options.date.as_deref())?
        .unwrap_or_else(|| Local::now().date_naive());
    let options = DashboardOptions {
        date,
        window_days: ctx.config.stats.weekly_window_days,
        default_priority: ctx.config.tasks.priority()?,
        default_category: ctx.config.tasks.category()?,
    };
    crate::ui::dashboard::run(ctx.repo, options)
}

#[derive(Serialize)]
struct TaskListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<Status>,
    total: usize,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct StatusOutput {
    id: u64,
    status: Status,
    updated: bool,
}

#[derive(Serialize)]
struct DeleteOutput {
    id: u64,
    outcome: DeleteOutcome,
}

#[derive(Serialize)]
struct NextIdOutput {
    next_id: u64,
}

fn load_context(global: &GlobalOptions) -> Result<TaskContext> {
    let data_dir = config::resolve_data_dir(global.data_dir.as_deref());
    config::ensure_data_dir(&data_dir)?;
    let config = Config::load_from_dir(&data_dir)?;
    let kind = global.backend.unwrap_or(config.storage.backend);
    let repo = TaskRepository::open(&data_dir, kind, &config)?;
    Ok(TaskContext { repo, config })
}

fn parse_date_arg(label: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };
    parse_date(value).map(Some).ok_or_else(|| {
        Error::InvalidArgument(format!("invalid {label} '{value}' (expected YYYY-MM-DD)"))
    })
}

fn parse_time_arg(label: &str, value: Option<&str>) -> Result<Option<NaiveTime>> {
    let Some(value) = value else {
        return Ok(None);
    };
    parse_time(value).map(Some).ok_or_else(|| {
        Error::InvalidArgument(format!("invalid {label} '{value}' (expected HH:MM)"))
    })
}

fn format_task_line(task: &Task, with_date: bool) -> String {
    let when = if with_date {
        format!(
            "{} {}",
            format_date(task.date),
            format_time(task.scheduled_time)
        )
    } else {
        format_time(task.scheduled_time)
    };
    format!(
        "{when} #{} {} [{}][{}][{}]",
        task.id, task.description, task.status, task.priority, task.category
    )
}
