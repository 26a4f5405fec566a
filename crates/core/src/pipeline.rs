//! Pipeline structure representing the parsed task list.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// An ordered collection of tasks, as read from a pipeline file.
///
/// Input order is kept: it decides which error is reported first during
/// validation and feeds the input-order tie-break.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pipeline {
    /// Path to the pipeline file.
    pub path: PathBuf,

    /// Tasks in input order.
    pub tasks: Vec<Task>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tasks: Vec::new(),
        }
    }

    /// Appends a task.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Builder-style variant of [`Pipeline::add_task`].
    pub fn with_task(mut self, task: Task) -> Self {
        self.add_task(task);
        self
    }

    /// Returns the distinct group names in first-appearance order.
    pub fn group_names(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.tasks.iter().filter_map(Task::group) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Sum of all task durations.
    pub fn total_work(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.duration)).sum()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
