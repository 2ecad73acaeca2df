//! Error types for planner
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, unknown label)
//! - 3: Blocked by policy (deleting a Pending task while the guard is on)
//! - 4: Operation failed (I/O, CSV, SQLite, serialization)

use std::path::PathBuf;
use thiserror::Error;

use crate::task::ParseLabelError;

/// Exit codes for the planner CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for planner operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid value: {0}")]
    InvalidValue(#[from] ParseLabelError),

    #[error("Data directory unavailable: {0}")]
    DataDirUnavailable(PathBuf),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Policy blocks (exit code 3)
    #[error("Task {0} is still Pending; change its status or pass --force to delete it")]
    PendingTaskDelete(u64),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Corrupt task store {path}: {message}")]
    CorruptStore { path: PathBuf, message: String },

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidValue(_)
            | Error::DataDirUnavailable(_)
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::PendingTaskDelete(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Csv(_)
            | Error::Sqlite(_)
            | Error::Json(_)
            | Error::TomlSerialize(_)
            | Error::CorruptStore { .. }
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::PendingTaskDelete(id) => Some(serde_json::json!({ "id": id })),
            Error::CorruptStore { path, .. } => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the JSON envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        let code = err.exit_code();
        JsonError {
            message: err.to_string(),
            code,
            kind: match code {
                exit_codes::USER_ERROR => "user_error",
                exit_codes::POLICY_BLOCKED => "policy_blocked",
                _ => "operation_failed",
            },
            details: err.details(),
        }
    }
}
