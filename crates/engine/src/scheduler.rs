//! Greedy list scheduling under the group barrier.

use makespan_core::{MakespanError, Result};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::barrier::{GroupBarrier, GroupState};
use crate::graph::TaskGraph;
use crate::sequencer::{Progress, Sequencer};

/// Order in which ready tasks compete for free cores.
///
/// Only the trace depends on this choice; both orders are deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Shorter remaining duration first, then lexicographic task id.
    #[default]
    ShortestFirst,
    /// Pipeline input order.
    InputOrder,
}

/// Simulates a pipeline on a fixed number of identical cores.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// The validated dependency graph.
    graph: TaskGraph,

    /// Number of cores, at least one.
    cores: usize,

    tie_break: TieBreak,
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// Minutes until every task completed.
    pub total_time: u64,

    /// Number of cores the run used.
    pub cores: usize,

    /// One record per minute, `1..=total_time`.
    pub trace: Vec<TraceRecord>,
}

/// The cores busy during one minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// Minute number, starting at 1.
    pub time: u64,

    /// Busy cores in core order.
    pub slots: Vec<Slot>,
}

/// A task occupying a core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub core: usize,
    pub task: String,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Running {
    task: NodeIndex,
    remaining: u32,
}

/// Validates a raw core count.
pub fn core_count(raw: i64) -> Result<usize> {
    usize::try_from(raw)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(MakespanError::InvalidCoreCount(raw))
}

impl Scheduler {
    /// Creates a scheduler for `cores` cores.
    pub fn new(graph: TaskGraph, cores: usize) -> Result<Self> {
        if cores == 0 {
            return Err(MakespanError::InvalidCoreCount(0));
        }

        Ok(Self {
            graph,
            cores,
            tie_break: TieBreak::default(),
        })
    }

    /// Sets the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Runs the simulation minute by minute.
    ///
    /// Every call starts from fresh runtime state, so repeated runs return
    /// identical schedules.
    pub fn run(&self) -> Result<Schedule> {
        let mut sequencer = Sequencer::new(&self.graph);
        let mut barrier = GroupBarrier::new(&self.graph);
        let mut cores: Vec<Option<Running>> = vec![None; self.cores];
        let mut trace = Vec::new();
        let mut time = 0;

        debug!(
            tasks = self.graph.len(),
            cores = self.cores,
            tie_break = ?self.tie_break,
            "starting simulation"
        );

        while !sequencer.is_finished() {
            time += 1;
            self.admit(time, &mut sequencer, &mut barrier, &mut cores);

            // validated graphs always have a startable task here
            if cores.iter().all(Option::is_none) {
                let pending = sequencer
                    .unfinished()
                    .into_iter()
                    .map(|idx| self.graph.task(idx).id.clone())
                    .collect();
                return Err(MakespanError::SchedulingDeadlock { time, pending });
            }

            trace.push(self.record(time, &cores));

            for slot in cores.iter_mut() {
                let Some(running) = slot.as_mut() else {
                    continue;
                };
                running.remaining -= 1;
                if running.remaining > 0 {
                    continue;
                }

                let task = running.task;
                *slot = None;
                sequencer.mark_completed(task);
                barrier.on_task_complete(self.graph.task(task).group());
                trace!(time, task = %self.graph.task(task).id, "completed");
            }
        }

        debug!(total_time = time, "simulation finished");

        Ok(Schedule {
            total_time: time,
            cores: self.cores,
            trace,
        })
    }

    /// Starts candidates on free cores, lowest core first.
    fn admit(
        &self,
        time: u64,
        sequencer: &mut Sequencer,
        barrier: &mut GroupBarrier,
        cores: &mut [Option<Running>],
    ) {
        for idx in self.candidates(sequencer) {
            let Some(free_core) = cores.iter().position(Option::is_none) else {
                break;
            };

            let task = self.graph.task(idx);
            if !barrier.can_start(task.group()) {
                trace!(time, task = %task.id, open = ?barrier.open_group(), "held by group barrier");
                continue;
            }
            if let Some(group) = task.group() {
                let opening = barrier.state(group) == Some(GroupState::Unopened);
                if opening && !self.prerequisites_met(group, sequencer) {
                    trace!(time, task = %task.id, group, "group waits on prerequisites");
                    continue;
                }
            }

            barrier.on_task_start(task.group());
            sequencer.mark_started(idx);
            cores[free_core] = Some(Running {
                task: idx,
                remaining: task.duration,
            });
            trace!(time, core = free_core, task = %task.id, "started");
        }
    }

    /// Whether every task `group` depends on from outside has completed.
    fn prerequisites_met(&self, group: &str, sequencer: &Sequencer) -> bool {
        self.graph
            .group_prerequisites(group)
            .iter()
            .all(|&idx| sequencer.progress(idx) == Progress::Completed)
    }

    /// Ready tasks in tie-break order.
    fn candidates(&self, sequencer: &Sequencer) -> Vec<NodeIndex> {
        let mut ready = sequencer.ready();

        match self.tie_break {
            TieBreak::ShortestFirst => ready.sort_by(|a, b| {
                let (a, b) = (self.graph.task(*a), self.graph.task(*b));
                a.duration.cmp(&b.duration).then_with(|| a.id.cmp(&b.id))
            }),
            TieBreak::InputOrder => {}
        }

        ready
    }

    fn record(&self, time: u64, cores: &[Option<Running>]) -> TraceRecord {
        let slots = cores
            .iter()
            .enumerate()
            .filter_map(|(core, slot)| {
                slot.map(|running| {
                    let task = self.graph.task(running.task);
                    Slot {
                        core,
                        task: task.id.clone(),
                        group: task.group.clone(),
                    }
                })
            })
            .collect();

        TraceRecord { time, slots }
    }
}

impl Schedule {
    /// First and last minute a task ran, if it appears in the trace.
    pub fn task_span(&self, task: &str) -> Option<(u64, u64)> {
        let mut minutes = self
            .trace
            .iter()
            .filter(|record| record.slots.iter().any(|slot| slot.task == task))
            .map(|record| record.time);

        let start = minutes.next()?;
        let end = minutes.last().unwrap_or(start);
        Some((start, end))
    }

    /// Total busy core-minutes divided by available core-minutes.
    pub fn utilization(&self) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        let busy: usize = self.trace.iter().map(|record| record.slots.len()).sum();
        busy as f64 / (self.total_time as f64 * self.cores as f64)
    }
}

impl TraceRecord {
    /// Task ids in core order.
    pub fn tasks(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.task.as_str()).collect()
    }

    /// The group running in this minute, if any grouped task runs.
    pub fn group(&self) -> Option<&str> {
        self.slots.iter().find_map(|slot| slot.group.as_deref())
    }
}
