//! Incremental readiness tracking over a [`TaskGraph`].

use petgraph::graph::NodeIndex;

use crate::graph::TaskGraph;

/// Where a task is in its lifecycle during one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending,
    Running,
    Completed,
}

/// Answers "which tasks may start now?" as tasks start and complete.
///
/// Holds per-run state only; create a new sequencer for every run.
#[derive(Debug, Clone)]
pub struct Sequencer<'g> {
    graph: &'g TaskGraph,

    /// Dependencies not yet completed, by node index.
    unmet: Vec<usize>,

    progress: Vec<Progress>,

    completed: usize,
}

impl<'g> Sequencer<'g> {
    pub fn new(graph: &'g TaskGraph) -> Self {
        let unmet = graph
            .indices()
            .map(|idx| graph.dependencies(idx).count())
            .collect();

        Self {
            graph,
            unmet,
            progress: vec![Progress::Pending; graph.len()],
            completed: 0,
        }
    }

    /// Pending tasks whose dependencies have all completed, in input order.
    pub fn ready(&self) -> Vec<NodeIndex> {
        self.graph
            .indices()
            .filter(|idx| {
                self.progress[idx.index()] == Progress::Pending && self.unmet[idx.index()] == 0
            })
            .collect()
    }

    pub fn mark_started(&mut self, task: NodeIndex) {
        debug_assert_eq!(self.unmet[task.index()], 0, "started a task with unmet dependencies");
        self.progress[task.index()] = Progress::Running;
    }

    /// Records a completion and releases the task's dependents.
    pub fn mark_completed(&mut self, task: NodeIndex) {
        if self.progress[task.index()] == Progress::Completed {
            return;
        }
        self.progress[task.index()] = Progress::Completed;
        self.completed += 1;

        let graph = self.graph;
        for dependent in graph.dependents(task) {
            self.unmet[dependent.index()] -= 1;
        }
    }

    pub fn progress(&self, task: NodeIndex) -> Progress {
        self.progress[task.index()]
    }

    /// Tasks that have not completed yet, in input order.
    pub fn unfinished(&self) -> Vec<NodeIndex> {
        self.graph
            .indices()
            .filter(|idx| self.progress[idx.index()] != Progress::Completed)
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.completed == self.graph.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makespan_core::{Pipeline, Task};

    fn diamond() -> TaskGraph {
        let pipeline = Pipeline::default()
            .with_task(Task::new("a", 1))
            .with_task(Task::new("b", 1).with_dependencies(["a"]))
            .with_task(Task::new("c", 1).with_dependencies(["a"]))
            .with_task(Task::new("d", 1).with_dependencies(["b", "c"]));
        TaskGraph::from_pipeline(&pipeline).unwrap()
    }

    fn ids(graph: &TaskGraph, tasks: &[NodeIndex]) -> Vec<String> {
        tasks.iter().map(|idx| graph.task(*idx).id.clone()).collect()
    }

    #[test]
    fn test_ready_set_grows_with_completions() {
        let graph = diamond();
        let mut seq = Sequencer::new(&graph);
        let idx = |id| graph.index_of(id).unwrap();

        assert_eq!(ids(&graph, &seq.ready()), vec!["a"]);

        seq.mark_started(idx("a"));
        assert!(seq.ready().is_empty(), "running tasks are not ready");

        seq.mark_completed(idx("a"));
        assert_eq!(ids(&graph, &seq.ready()), vec!["b", "c"]);

        seq.mark_started(idx("b"));
        seq.mark_completed(idx("b"));
        assert_eq!(ids(&graph, &seq.ready()), vec!["c"], "d still waits on c");

        seq.mark_started(idx("c"));
        seq.mark_completed(idx("c"));
        assert_eq!(ids(&graph, &seq.ready()), vec!["d"]);
        assert_eq!(ids(&graph, &seq.unfinished()), vec!["d"]);
        assert!(!seq.is_finished());
    }

    #[test]
    fn test_finish_and_progress() {
        let graph = diamond();
        let mut seq = Sequencer::new(&graph);

        for id in ["a", "b", "c", "d"] {
            let idx = graph.index_of(id).unwrap();
            assert_eq!(seq.progress(idx), Progress::Pending);
            seq.mark_started(idx);
            assert_eq!(seq.progress(idx), Progress::Running);
            seq.mark_completed(idx);
        }

        assert!(seq.is_finished());
        assert!(seq.unfinished().is_empty());
        assert!(seq.ready().is_empty());
    }

    #[test]
    fn test_repeated_completion_is_ignored() {
        let graph = diamond();
        let mut seq = Sequencer::new(&graph);
        let a = graph.index_of("a").unwrap();

        seq.mark_started(a);
        seq.mark_completed(a);
        seq.mark_completed(a);

        assert_eq!(ids(&graph, &seq.unfinished()), vec!["b", "c", "d"]);
        assert_eq!(ids(&graph, &seq.ready()), vec!["b", "c"]);
    }
}
