//! Task definition.

use serde::{Deserialize, Serialize};

/// A unit of work in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier, unique within a pipeline.
    pub id: String,

    /// Duration in whole time units (minutes). Always positive once parsed.
    pub duration: u32,

    /// Group the task belongs to. `None` means ungrouped.
    pub group: Option<String>,

    /// Identifiers of the tasks that must finish before this one starts.
    pub dependencies: Vec<String>,
}

impl Task {
    /// Creates an ungrouped task with no dependencies.
    pub fn new(id: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            duration,
            group: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the group. An empty name leaves the task ungrouped.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.group = if group.is_empty() { None } else { Some(group) };
        self
    }

    /// Sets the dependencies, dropping repeated identifiers.
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.clear();
        for dep in deps {
            let dep = dep.into();
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }

    /// Returns the group name, if any.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Returns true if the task is not subject to the group barrier.
    pub fn is_ungrouped(&self) -> bool {
        self.group.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_is_ungrouped() {
        let task = Task::new("a", 1).with_group("");
        assert!(task.is_ungrouped());
        assert_eq!(task.group(), None);
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let task = Task::new("c", 2).with_dependencies(["a", "b", "a"]);
        assert_eq!(task.dependencies, vec!["a", "b"]);
    }
}
