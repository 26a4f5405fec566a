//! CLI command implementations.

pub mod graph;
pub mod list;
pub mod schedule;
pub mod validate;
