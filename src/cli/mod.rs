//! Command-line interface for planner
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in a submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::StorageKind;
use crate::error::Result;

mod init;
mod task;

/// planner - daily task planner
///
/// Schedule tasks by date and time, track their status, and review
/// status, category and weekly summaries.
#[derive(Parser, Debug)]
#[command(name = "planner")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding planner.toml and the task store
    #[arg(long, global = true, env = "PLANNER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend (overrides planner.toml)
    #[arg(long, global = true, env = "PLANNER_BACKEND", value_enum)]
    pub backend: Option<StorageKind>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, config file and an empty task store
    Init,

    /// Schedule a new task (starts Pending)
    Add {
        /// What the task is about
        description: String,

        /// Date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Time of day (HH:MM); defaults to now
        #[arg(long)]
        time: Option<String>,

        /// Priority: High, Medium, Low
        #[arg(long)]
        priority: Option<String>,

        /// Category: Work, Personal, Study, Health
        #[arg(long)]
        category: Option<String>,
    },

    /// List tasks, optionally for one date
    List {
        /// Only tasks on this date (YYYY-MM-DD), ordered by time
        #[arg(long, conflicts_with = "today")]
        date: Option<String>,

        /// Only today's tasks
        #[arg(long)]
        today: bool,

        /// Only tasks with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Change a task's status
    Status {
        /// Task ID
        id: u64,

        /// New status: Pending, In-Progress, Completed
        status: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u64,

        /// Delete even if the task is still Pending
        #[arg(long)]
        force: bool,
    },

    /// Status counts and category-by-status breakdown
    Stats,

    /// Per-day status counts for the trailing window
    Weekly {
        /// Window length in days (defaults to stats.weekly_window_days)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show the id the next task will receive
    NextId,

    /// Interactive terminal dashboard
    Tui {
        /// Initial date for the task tab (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = task::GlobalOptions {
            data_dir: self.data_dir,
            backend: self.backend,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Init => init::run(global),
            Commands::Add {
                description,
                date,
                time,
                priority,
                category,
            } => task::run_add(task::AddOptions {
                description,
                date,
                time,
                priority,
                category,
                global,
            }),
            Commands::List {
                date,
                today,
                status,
            } => task::run_list(task::ListOptions {
                date,
                today,
                status,
                global,
            }),
            Commands::Status { id, status } => task::run_status(task::StatusOptions {
                id,
                status,
                global,
            }),
            Commands::Delete { id, force } => task::run_delete(task::DeleteOptions {
                id,
                force,
                global,
            }),
            Commands::Stats => task::run_stats(global),
            Commands::Weekly { days } => task::run_weekly(task::WeeklyOptions { days, global }),
            Commands::NextId => task::run_next_id(global),
            Commands::Tui { date } => task::run_tui(task::TuiOptions { date, global }),
        }
    }
}
