//! Schedule command implementation.

use std::path::Path;

use clap::ValueEnum;
use makespan_engine::{Report, Schedule, Scheduler, TaskGraph, TieBreak};
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;

use crate::output;

/// How the schedule is printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pipe table followed by the minimum execution time
    #[default]
    Table,
    /// Machine-readable schedule and report
    Json,
}

/// Tie-break policy as exposed on the CLI.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum TieBreakArg {
    /// Shortest duration first, then task name
    #[default]
    Shortest,
    /// Order of appearance in the pipeline file
    Input,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::Shortest => TieBreak::ShortestFirst,
            TieBreakArg::Input => TieBreak::InputOrder,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleOptions {
    pub format: OutputFormat,
    pub compact: bool,
    pub by_group: bool,
    pub tie_break: TieBreakArg,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    schedule: &'a Schedule,
    report: &'a Report,
}

/// Resolves the requested core count, defaulting to the logical CPU count.
pub fn resolve_cores(requested: Option<i64>) -> Result<usize> {
    let raw = requested.unwrap_or_else(|| i64::try_from(num_cpus::get()).unwrap_or(1));
    makespan_engine::core_count(raw).map_err(|e| miette!("{}", e))
}

/// Computes and prints the schedule.
pub fn execute(pipeline_path: &Path, cores: Option<i64>, options: &ScheduleOptions) -> Result<()> {
    let cores = resolve_cores(cores)?;

    let pipeline = makespan_parser::parse_file(pipeline_path)
        .map_err(|e| miette!("Failed to parse pipeline: {}", e))?;

    let graph = TaskGraph::from_pipeline(&pipeline)
        .map_err(|e| miette!("Failed to build dependency graph: {}", e))?;

    let scheduler = Scheduler::new(graph, cores)
        .map_err(|e| miette!("{}", e))?
        .with_tie_break(options.tie_break.into());

    let schedule = scheduler
        .run()
        .map_err(|e| miette!("Scheduling failed: {}", e))?;

    let report = if options.by_group {
        Report::by_group(&schedule)
    } else if options.compact {
        Report::compact(&schedule)
    } else {
        Report::new(&schedule)
    };

    match options.format {
        OutputFormat::Table => {
            print!("{}", report.table());
            output::summary(
                &report.summary(),
                pipeline.len(),
                schedule.cores,
                schedule.utilization(),
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonOutput {
                schedule: &schedule,
                report: &report,
            })
            .into_diagnostic()?;
            println!("{}", json);
        }
    }

    Ok(())
}
