//! Makespan Core - Core types for the makespan pipeline scheduler.

mod error;
mod pipeline;
mod task;

pub use error::{MakespanError, Result};
pub use pipeline::Pipeline;
pub use task::Task;
