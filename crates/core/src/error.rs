//! Error types for makespan.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for makespan operations.
pub type Result<T> = std::result::Result<T, MakespanError>;

/// Main error type for makespan.
///
/// Every variant is terminal for the current run: no partial schedule is
/// ever produced alongside one of these.
#[derive(Debug, Error)]
pub enum MakespanError {
    #[error("Pipeline file not found in {0} or any parent directory")]
    PipelineNotFound(PathBuf),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error on line {line}: {message}")]
    Parse { message: String, line: u32 },

    #[error("Task '{0}' is defined more than once")]
    DuplicateTask(String),

    #[error("Task '{0}' has a duration of zero; durations must be positive")]
    InvalidDuration(String),

    #[error("Task '{task}' depends on '{dependency}' which does not exist")]
    UnknownDependency { task: String, dependency: String },

    #[error("Dependency cycle detected: {0}")]
    Cycle(String),

    #[error("Invalid core count {0}: at least one core is required")]
    InvalidCoreCount(i64),

    #[error("Scheduling deadlock at minute {time}: no task can start, pending: {}", .pending.join(", "))]
    SchedulingDeadlock { time: u64, pending: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
