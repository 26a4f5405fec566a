//! Property-based tests for schedule invariants.
//!
//! Generated pipelines let a task depend on any earlier task, whatever its
//! group. Dependencies that make two groups need each other are rejected by
//! the graph builder; every pipeline it accepts must schedule.

use std::collections::HashSet;

use makespan_core::{MakespanError, Pipeline, Task};
use makespan_engine::{Schedule, Scheduler, TaskGraph, TieBreak};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

const GROUPS: [Option<&str>; 4] = [None, Some("extract"), Some("transform"), Some("load")];

/// (duration, group slot, raw dependency picks) per task.
fn raw_tasks(max_tasks: usize) -> impl Strategy<Value = Vec<(u32, usize, Vec<usize>)>> {
    proptest::collection::vec(
        (1u32..=5, 0..GROUPS.len(), proptest::collection::vec(any::<usize>(), 0..3)),
        1..=max_tasks,
    )
}

fn build_pipeline(raw: Vec<(u32, usize, Vec<usize>)>) -> Pipeline {
    let mut pipeline = Pipeline::default();

    for (i, (duration, slot, picks)) in raw.into_iter().enumerate() {
        let deps: Vec<String> = if i == 0 {
            Vec::new()
        } else {
            picks.into_iter().map(|p| format!("t{}", p % i)).collect()
        };

        let mut task = Task::new(format!("t{i}"), duration).with_dependencies(deps);
        if let Some(group) = GROUPS[slot] {
            task = task.with_group(group);
        }
        pipeline.add_task(task);
    }

    pipeline
}

fn any_pipeline(max_tasks: usize) -> impl Strategy<Value = Pipeline> {
    raw_tasks(max_tasks).prop_map(build_pipeline)
}

/// Pipelines the graph builder accepts.
fn pipeline_strategy(max_tasks: usize) -> impl Strategy<Value = Pipeline> {
    any_pipeline(max_tasks).prop_filter("groups need each other", |pipeline| {
        TaskGraph::from_pipeline(pipeline).is_ok()
    })
}

fn run(pipeline: &Pipeline, cores: usize, tie_break: TieBreak) -> Schedule {
    let graph = TaskGraph::from_pipeline(pipeline).expect("filtered pipelines are valid");
    Scheduler::new(graph, cores)
        .expect("cores > 0")
        .with_tie_break(tie_break)
        .run()
        .expect("accepted pipelines always schedule")
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn builder_accepts_or_reports_a_group_cycle(pipeline in any_pipeline(12)) {
        // generated dependencies only point backwards, so tasks never cycle
        match TaskGraph::from_pipeline(&pipeline) {
            Ok(_) => {}
            Err(MakespanError::Cycle(description)) => {
                prop_assert!(description.starts_with("groups "), "unexpected cycle {}", description);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn accepted_pipelines_always_schedule(
        pipeline in pipeline_strategy(12),
        cores in 1usize..5,
        input_order in any::<bool>(),
    ) {
        let graph = TaskGraph::from_pipeline(&pipeline).unwrap();
        let tie_break = if input_order { TieBreak::InputOrder } else { TieBreak::ShortestFirst };
        let result = Scheduler::new(graph, cores).unwrap().with_tie_break(tie_break).run();

        prop_assert!(result.is_ok(), "scheduling failed: {:?}", result.err());
    }

    #[test]
    fn total_time_respects_lower_bounds(pipeline in pipeline_strategy(12), cores in 1usize..5) {
        let graph = TaskGraph::from_pipeline(&pipeline).unwrap();
        let schedule = run(&pipeline, cores, TieBreak::ShortestFirst);

        prop_assert!(schedule.total_time >= graph.critical_path());
        prop_assert!(schedule.total_time >= graph.total_work().div_ceil(cores as u64));
        prop_assert!(schedule.total_time <= graph.total_work());
        prop_assert_eq!(schedule.trace.len() as u64, schedule.total_time);
    }

    #[test]
    fn every_task_runs_for_exactly_its_duration(pipeline in pipeline_strategy(12), cores in 1usize..5) {
        let schedule = run(&pipeline, cores, TieBreak::ShortestFirst);

        for task in &pipeline.tasks {
            let (start, end) = schedule.task_span(&task.id).expect("task was scheduled");
            prop_assert_eq!(end - start + 1, u64::from(task.duration), "{} was preempted", &task.id);

            let minutes = schedule
                .trace
                .iter()
                .filter(|r| r.slots.iter().any(|s| s.task == task.id))
                .count() as u64;
            prop_assert_eq!(minutes, u64::from(task.duration));

            for dep in &task.dependencies {
                let (_, dep_end) = schedule.task_span(dep).unwrap();
                prop_assert!(dep_end < start, "{} started before {} finished", &task.id, dep);
            }
        }
    }

    #[test]
    fn minutes_never_mix_groups_or_overbook(pipeline in pipeline_strategy(12), cores in 1usize..5) {
        let schedule = run(&pipeline, cores, TieBreak::ShortestFirst);

        for record in &schedule.trace {
            prop_assert!(record.slots.len() <= cores);

            let tasks: HashSet<&str> = record.slots.iter().map(|s| s.task.as_str()).collect();
            prop_assert_eq!(tasks.len(), record.slots.len(), "a task ran twice in minute {}", record.time);

            let groups: HashSet<&str> = record.slots.iter().filter_map(|s| s.group.as_deref()).collect();
            prop_assert!(groups.len() <= 1, "minute {} mixes groups {:?}", record.time, groups);
        }
    }

    #[test]
    fn a_group_never_reopens(pipeline in pipeline_strategy(12), cores in 1usize..5) {
        let schedule = run(&pipeline, cores, TieBreak::InputOrder);

        let mut finished: HashSet<&str> = HashSet::new();
        let mut current: Option<&str> = None;
        for record in &schedule.trace {
            if let Some(group) = record.group() {
                prop_assert!(!finished.contains(group), "group {} ran again after closing", group);
                if current != Some(group) {
                    if let Some(previous) = current {
                        finished.insert(previous);
                    }
                    current = Some(group);
                }
            }
        }
    }

    #[test]
    fn runs_are_deterministic(pipeline in pipeline_strategy(10), cores in 1usize..4) {
        let graph = TaskGraph::from_pipeline(&pipeline).unwrap();
        let scheduler = Scheduler::new(graph, cores).unwrap();

        prop_assert_eq!(scheduler.run().unwrap(), scheduler.run().unwrap());
    }

    #[test]
    fn cores_beyond_task_count_change_nothing(pipeline in pipeline_strategy(8)) {
        let n = pipeline.len();
        let at_n = run(&pipeline, n, TieBreak::ShortestFirst);
        let beyond = run(&pipeline, n + 3, TieBreak::ShortestFirst);

        prop_assert_eq!(at_n.total_time, beyond.total_time);
        prop_assert_eq!(at_n.trace, beyond.trace);
    }

    #[test]
    fn single_task_takes_its_duration(duration in 1u32..50, cores in 1usize..16) {
        let pipeline = Pipeline::default().with_task(Task::new("solo", duration));
        prop_assert_eq!(run(&pipeline, cores, TieBreak::ShortestFirst).total_time, u64::from(duration));
    }
}
