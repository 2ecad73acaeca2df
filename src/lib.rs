//! planner - daily task planner library
//!
//! This library provides the core functionality for the planner CLI:
//! scheduling tasks, persisting them, and summarizing them.
//!
//! # Core Concepts
//!
//! - **Task**: one scheduled activity with a date, time, priority,
//!   category and status
//! - **Backend**: where tasks live, a CSV file or a SQLite database
//! - **Aggregation**: grouped counts (by status, by category and status,
//!   by day over a trailing window)
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `planner.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output formatting
//! - `repository`: Typed task operations over a backend
//! - `stats`: Status, category and weekly aggregations
//! - `storage`: CSV and SQLite backends
//! - `task`: Task record and label types
//! - `ui`: Terminal dashboard

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod repository;
pub mod stats;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
