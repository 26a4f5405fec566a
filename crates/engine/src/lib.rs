//! Makespan Engine - group-barrier list scheduling.
//!
//! [`TaskGraph`] validates a pipeline, [`Scheduler`] simulates it minute by
//! minute on identical cores, and [`Report`] turns the resulting trace into
//! a table.

mod barrier;
mod graph;
mod report;
mod scheduler;
mod sequencer;

pub use barrier::{GroupBarrier, GroupState};
pub use graph::TaskGraph;
pub use report::{Report, ReportRow};
pub use scheduler::{Schedule, Scheduler, Slot, TieBreak, TraceRecord, core_count};
pub use sequencer::{Progress, Sequencer};
