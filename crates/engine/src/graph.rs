//! Validated task dependency graph.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use makespan_core::{MakespanError, Pipeline, Result, Task};
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

/// The dependency graph of a pipeline.
///
/// Node indices follow input order: the n-th task of the pipeline is
/// `NodeIndex::new(n)`. Edges point from a dependency to its dependent.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    /// Mapping from task id to node index.
    nodes: HashMap<String, NodeIndex>,

    /// The underlying directed graph.
    graph: DiGraph<Task, ()>,

    /// A topological order of every node.
    order: Vec<NodeIndex>,

    /// Group names in first-appearance order.
    groups: Vec<String>,

    /// Number of tasks in each group.
    group_sizes: HashMap<String, usize>,

    /// Tasks outside each group that must complete before the group opens.
    prerequisites: HashMap<String, Vec<NodeIndex>>,
}

impl TaskGraph {
    /// Validates a pipeline and builds its graph.
    ///
    /// Checks run in a fixed order so the same input always reports the same
    /// error: duplicate ids and zero durations, then unknown dependencies
    /// (input order), then task cycles, then cycles between groups.
    pub fn from_pipeline(pipeline: &Pipeline) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for task in &pipeline.tasks {
            if nodes.contains_key(&task.id) {
                return Err(MakespanError::DuplicateTask(task.id.clone()));
            }
            if task.duration == 0 {
                return Err(MakespanError::InvalidDuration(task.id.clone()));
            }
            let idx = graph.add_node(task.clone());
            nodes.insert(task.id.clone(), idx);
        }

        for task in &pipeline.tasks {
            let to_idx = nodes[&task.id];

            for dep in &task.dependencies {
                let from_idx = nodes.get(dep).ok_or_else(|| MakespanError::UnknownDependency {
                    task: task.id.clone(),
                    dependency: dep.clone(),
                })?;

                // dep must finish before task
                graph.update_edge(*from_idx, to_idx, ());
            }
        }

        let mut dag = Self {
            nodes,
            graph,
            order: Vec::new(),
            groups: Vec::new(),
            group_sizes: HashMap::new(),
            prerequisites: HashMap::new(),
        };

        dag.order = match toposort(&dag.graph, None) {
            Ok(order) => order,
            Err(_) => {
                return Err(MakespanError::Cycle(describe_cycle(&dag.graph, |task| {
                    task.id.as_str()
                })));
            }
        };

        for group in pipeline.group_names() {
            dag.groups.push(group.to_string());
        }
        for group in pipeline.tasks.iter().filter_map(Task::group) {
            *dag.group_sizes.entry(group.to_string()).or_default() += 1;
        }

        dag.resolve_group_order()?;

        Ok(dag)
    }

    /// Computes each group's prerequisites and rejects groups that need each
    /// other.
    ///
    /// A task outside group G is a prerequisite of G when some member of G
    /// depends on it, directly or transitively, and it does not itself
    /// depend on a member of G. Tasks sandwiched between two members of G
    /// must run while G is open, which only ungrouped tasks may do; a
    /// grouped one puts its group both before and after G.
    fn resolve_group_order(&mut self) -> Result<()> {
        let ancestors = self.ancestors();

        let mut group_graph: DiGraph<&str, ()> = DiGraph::new();
        let group_nodes: HashMap<&str, NodeIndex> = self
            .groups
            .iter()
            .map(|g| (g.as_str(), group_graph.add_node(g.as_str())))
            .collect();

        let mut prerequisites = HashMap::new();

        for group in &self.groups {
            let members: Vec<NodeIndex> = self
                .indices()
                .filter(|&idx| self.graph[idx].group() == Some(group.as_str()))
                .collect();

            let upstream: BTreeSet<NodeIndex> = members
                .iter()
                .flat_map(|m| ancestors[m.index()].iter().copied())
                .filter(|idx| !members.contains(idx))
                .collect();

            let mut needed = Vec::new();
            for &idx in &upstream {
                let downstream_of_group = members
                    .iter()
                    .any(|m| ancestors[idx.index()].contains(m));
                if !downstream_of_group {
                    needed.push(idx);
                }

                if let Some(other) = self.graph[idx].group() {
                    group_graph.update_edge(group_nodes[other], group_nodes[group.as_str()], ());
                }
            }

            prerequisites.insert(group.clone(), needed);
        }

        if toposort(&group_graph, None).is_err() {
            let path = describe_cycle(&group_graph, |name| *name);
            return Err(MakespanError::Cycle(format!("groups {path}")));
        }

        self.prerequisites = prerequisites;
        Ok(())
    }

    /// Transitive dependencies of every task, by node index.
    fn ancestors(&self) -> Vec<BTreeSet<NodeIndex>> {
        let mut ancestors = vec![BTreeSet::new(); self.len()];

        for &idx in &self.order {
            let mut found = BTreeSet::new();
            for dep in self.dependencies(idx) {
                found.insert(dep);
                found.extend(ancestors[dep.index()].iter().copied());
            }
            ancestors[idx.index()] = found;
        }

        ancestors
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the task stored at `idx`.
    pub fn task(&self, idx: NodeIndex) -> &Task {
        &self.graph[idx]
    }

    /// Looks up a task index by id.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.get(id).copied()
    }

    /// All node indices in input order.
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Direct dependencies of a task.
    pub fn dependencies(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Tasks that directly depend on `idx`.
    pub fn dependents(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Tasks outside `group` that must complete before it may open, in
    /// input order.
    pub fn group_prerequisites(&self, group: &str) -> &[NodeIndex] {
        self.prerequisites.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group names in first-appearance order.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Number of tasks in a group (0 for unknown groups).
    pub fn group_size(&self, group: &str) -> usize {
        self.group_sizes.get(group).copied().unwrap_or(0)
    }

    /// Sum of all durations.
    pub fn total_work(&self) -> u64 {
        self.graph.node_weights().map(|t| u64::from(t.duration)).sum()
    }

    /// Length of the longest dependency chain, counted in minutes.
    pub fn critical_path(&self) -> u64 {
        let mut finish: HashMap<NodeIndex, u64> = HashMap::new();

        for &idx in &self.order {
            let ready_at = self
                .dependencies(idx)
                .filter_map(|dep| finish.get(&dep).copied())
                .max()
                .unwrap_or(0);
            finish.insert(idx, ready_at + u64::from(self.graph[idx].duration));
        }

        finish.values().copied().max().unwrap_or(0)
    }

    /// Returns task ids grouped by dependency depth. Tasks on the same level
    /// have no dependencies on each other.
    pub fn parallel_levels(&self) -> Vec<Vec<&str>> {
        let mut levels: Vec<Vec<&str>> = Vec::new();
        let mut task_levels: HashMap<NodeIndex, usize> = HashMap::new();

        for &idx in &self.order {
            let level = self
                .dependencies(idx)
                .filter_map(|dep| task_levels.get(&dep).copied())
                .max()
                .map(|l| l + 1)
                .unwrap_or(0);

            task_levels.insert(idx, level);

            while levels.len() <= level {
                levels.push(Vec::new());
            }
            levels[level].push(self.graph[idx].id.as_str());
        }

        levels
    }
}

/// Describes one cycle as `a -> b -> a`, starting from the earliest node
/// that sits on a cycle.
fn describe_cycle<N>(graph: &DiGraph<N, ()>, name: impl Fn(&N) -> &str) -> String {
    let cyclic = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .min_by_key(|scc| scc.iter().min().copied());

    let Some(scc) = cyclic else {
        return "dependency graph is not acyclic".to_string();
    };

    let path = cycle_path(graph, &scc);
    let mut names: Vec<&str> = path.iter().map(|idx| name(&graph[*idx])).collect();
    if let Some(&first) = names.first() {
        names.push(first);
    }
    names.join(" -> ")
}

/// Shortest walk that leaves the smallest node of `scc` and returns to it.
fn cycle_path<N>(graph: &DiGraph<N, ()>, scc: &[NodeIndex]) -> Vec<NodeIndex> {
    let members: HashSet<NodeIndex> = scc.iter().copied().collect();
    let Some(start) = scc.iter().min().copied() else {
        return Vec::new();
    };

    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        let mut next: Vec<NodeIndex> = graph
            .neighbors_directed(node, Direction::Outgoing)
            .filter(|n| members.contains(n))
            .collect();
        next.sort();

        for neighbor in next {
            if neighbor == start {
                let mut path = vec![node];
                let mut current = node;
                while let Some(&p) = parent.get(&current) {
                    path.push(p);
                    current = p;
                }
                path.reverse();
                return path;
            }
            if !parent.contains_key(&neighbor) {
                parent.insert(neighbor, node);
                queue.push_back(neighbor);
            }
        }
    }

    vec![start]
}
