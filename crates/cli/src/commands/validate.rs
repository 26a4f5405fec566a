//! Validate command implementation.

use std::path::Path;

use makespan_engine::{Scheduler, TaskGraph};
use miette::{Result, miette};

use crate::commands::schedule::resolve_cores;
use crate::output;

/// Validates the pipeline file: syntax, dependencies, and a dry run of the
/// scheduler to catch barrier deadlocks.
pub fn execute(pipeline_path: &Path, cores: Option<i64>) -> Result<()> {
    output::info(&format!("Validating {}...", pipeline_path.display()));

    let content = std::fs::read_to_string(pipeline_path)
        .map_err(|e| miette!("Failed to read {}: {}", pipeline_path.display(), e))?;

    // Parse pipeline, keeping the source for a labelled diagnostic
    let pipeline = match makespan_parser::parse_pipeline(&content, pipeline_path) {
        Ok(p) => p,
        Err(e) => {
            output::error(&format!("Syntax error on line {}", e.line));
            return Err(miette::Report::new(e));
        }
    };

    // Check for unknown dependencies and cycles
    let graph = match TaskGraph::from_pipeline(&pipeline) {
        Ok(graph) => graph,
        Err(e) => {
            output::error(&format!("Dependency error: {}", e));
            return Err(miette!("Validation failed: {}", e));
        }
    };

    let critical_path = graph.critical_path();
    let groups = graph.groups().len();
    let cores = resolve_cores(cores)?;

    let scheduler = Scheduler::new(graph, cores).map_err(|e| miette!("{}", e))?;
    if let Err(e) = scheduler.run() {
        output::error(&format!("Scheduling error: {}", e));
        return Err(miette!("Validation failed: {}", e));
    }

    output::success(&format!(
        "Pipeline is valid ({} tasks, {} groups, critical path {} minutes)",
        pipeline.len(),
        groups,
        critical_path
    ));

    Ok(())
}
