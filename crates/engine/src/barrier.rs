//! Group barrier: once a group starts, other groups wait until it is done.

use std::collections::HashMap;

use crate::graph::TaskGraph;

/// Lifecycle of a group within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// No task of the group has started.
    Unopened,
    /// At least one task started and at least one has not finished.
    Open,
    /// Every task of the group finished.
    Closed,
}

/// Tracks group states and the single open-group slot.
///
/// Ungrouped tasks (`None`) pass every check and never change state.
#[derive(Debug, Clone)]
pub struct GroupBarrier {
    states: HashMap<String, GroupState>,

    /// Tasks of each group that have not completed yet.
    remaining: HashMap<String, usize>,

    open: Option<String>,
}

impl GroupBarrier {
    pub fn new(graph: &TaskGraph) -> Self {
        let states = graph
            .groups()
            .iter()
            .map(|g| (g.clone(), GroupState::Unopened))
            .collect();
        let remaining = graph
            .groups()
            .iter()
            .map(|g| (g.clone(), graph.group_size(g)))
            .collect();

        Self {
            states,
            remaining,
            open: None,
        }
    }

    /// Whether a task of `group` may start now.
    pub fn can_start(&self, group: Option<&str>) -> bool {
        match (group, self.open.as_deref()) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(group), Some(open)) => group == open,
        }
    }

    /// Opens the task's group if no group is open.
    pub fn on_task_start(&mut self, group: Option<&str>) {
        let Some(group) = group else {
            return;
        };
        debug_assert!(self.can_start(Some(group)), "group '{group}' started past the barrier");

        if self.open.is_none() {
            self.open = Some(group.to_string());
            self.states.insert(group.to_string(), GroupState::Open);
        }
    }

    /// Closes the task's group when this was its last unfinished task.
    pub fn on_task_complete(&mut self, group: Option<&str>) {
        let Some(group) = group else {
            return;
        };
        let Some(remaining) = self.remaining.get_mut(group) else {
            return;
        };

        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.states.insert(group.to_string(), GroupState::Closed);
            if self.open.as_deref() == Some(group) {
                self.open = None;
            }
        }
    }

    pub fn state(&self, group: &str) -> Option<GroupState> {
        self.states.get(group).copied()
    }

    pub fn open_group(&self) -> Option<&str> {
        self.open.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makespan_core::{Pipeline, Task};

    fn barrier() -> GroupBarrier {
        let pipeline = Pipeline::default()
            .with_task(Task::new("a1", 1).with_group("a"))
            .with_task(Task::new("a2", 1).with_group("a"))
            .with_task(Task::new("b1", 1).with_group("b"))
            .with_task(Task::new("free", 1));
        GroupBarrier::new(&TaskGraph::from_pipeline(&pipeline).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let barrier = barrier();
        assert_eq!(barrier.state("a"), Some(GroupState::Unopened));
        assert_eq!(barrier.state("b"), Some(GroupState::Unopened));
        assert_eq!(barrier.state("missing"), None);
        assert_eq!(barrier.open_group(), None);
        assert!(barrier.can_start(Some("a")));
        assert!(barrier.can_start(Some("b")));
    }

    #[test]
    fn test_open_group_blocks_other_groups() {
        let mut barrier = barrier();

        barrier.on_task_start(Some("a"));
        assert_eq!(barrier.open_group(), Some("a"));
        assert_eq!(barrier.state("a"), Some(GroupState::Open));

        assert!(barrier.can_start(Some("a")));
        assert!(!barrier.can_start(Some("b")));
        assert!(barrier.can_start(None), "ungrouped tasks bypass the barrier");
    }

    #[test]
    fn test_group_closes_after_last_task() {
        let mut barrier = barrier();

        barrier.on_task_start(Some("a"));
        barrier.on_task_start(Some("a"));
        barrier.on_task_complete(Some("a"));
        assert_eq!(barrier.state("a"), Some(GroupState::Open));
        assert!(!barrier.can_start(Some("b")));

        barrier.on_task_complete(Some("a"));
        assert_eq!(barrier.state("a"), Some(GroupState::Closed));
        assert_eq!(barrier.open_group(), None);
        assert!(barrier.can_start(Some("b")));

        barrier.on_task_start(Some("b"));
        assert_eq!(barrier.open_group(), Some("b"));
    }

    #[test]
    fn test_ungrouped_tasks_leave_state_alone() {
        let mut barrier = barrier();

        barrier.on_task_start(None);
        barrier.on_task_complete(None);

        assert_eq!(barrier.open_group(), None);
        assert_eq!(barrier.state("a"), Some(GroupState::Unopened));
    }
}
