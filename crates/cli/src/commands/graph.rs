//! Graph command implementation.

use std::path::Path;

use makespan_core::Pipeline;
use makespan_engine::TaskGraph;
use miette::{Result, miette};

/// Shows the dependency graph.
pub fn execute(pipeline_path: &Path, format: &str) -> Result<()> {
    let pipeline = makespan_parser::parse_file(pipeline_path)
        .map_err(|e| miette!("Failed to parse pipeline: {}", e))?;

    let dag = TaskGraph::from_pipeline(&pipeline)
        .map_err(|e| miette!("Failed to build dependency graph: {}", e))?;

    match format {
        "ascii" => print!("{}", render_ascii(&dag)),
        "dot" => print!("{}", render_dot(&pipeline)),
        _ => return Err(miette!("Unknown format: {}. Use 'ascii' or 'dot'", format)),
    }

    Ok(())
}

/// Renders tasks level by level with their direct dependencies.
fn render_ascii(dag: &TaskGraph) -> String {
    let mut out = String::from("Dependency Graph:\n\n");

    for (depth, level) in dag.parallel_levels().iter().enumerate() {
        out.push_str(&format!("Level {}:\n", depth));

        for id in level {
            let Some(idx) = dag.index_of(id) else {
                continue;
            };
            let task = dag.task(idx);
            let group = task.group().map(|g| format!(" [{}]", g)).unwrap_or_default();
            out.push_str(&format!("  ● {}{} ({} min)\n", id, group, task.duration));

            for dep in &task.dependencies {
                out.push_str(&format!("    └─ {}\n", dep));
            }
        }
    }

    out
}

/// Renders a DOT graph for Graphviz, one cluster per group.
fn render_dot(pipeline: &Pipeline) -> String {
    let mut out = String::from("digraph pipeline {\n  rankdir=LR;\n  node [shape=box];\n\n");

    for (i, group) in pipeline.group_names().into_iter().enumerate() {
        out.push_str(&format!("  subgraph cluster_{} {{\n", i));
        out.push_str(&format!("    label=\"{}\";\n", group));
        for task in pipeline.tasks.iter().filter(|t| t.group() == Some(group)) {
            out.push_str(&format!(
                "    \"{}\" [label=\"{}\\n{} min\"];\n",
                task.id, task.id, task.duration
            ));
        }
        out.push_str("  }\n");
    }

    for task in pipeline.tasks.iter().filter(|t| t.is_ungrouped()) {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\\n{} min\"];\n",
            task.id, task.id, task.duration
        ));
    }

    out.push('\n');
    for task in &pipeline.tasks {
        for dep in &task.dependencies {
            out.push_str(&format!("  \"{}\" -> \"{}\";\n", dep, task.id));
        }
    }

    out.push_str("}\n");
    out
}
