//! List command implementation.

use std::path::Path;

use console::style;
use makespan_core::Task;
use miette::{Result, miette};

use crate::output;

/// Lists all tasks, grouped by group in first-appearance order.
pub fn execute(pipeline_path: &Path, detailed: bool) -> Result<()> {
    let pipeline = makespan_parser::parse_file(pipeline_path)
        .map_err(|e| miette!("Failed to parse pipeline: {}", e))?;

    for group in pipeline.group_names() {
        output::section_header(group);
        for task in pipeline.tasks.iter().filter(|t| t.group() == Some(group)) {
            print_task(task, detailed);
        }
    }

    let ungrouped: Vec<&Task> = pipeline.tasks.iter().filter(|t| t.is_ungrouped()).collect();
    if !ungrouped.is_empty() {
        output::section_header("ungrouped");
        for task in ungrouped {
            print_task(task, detailed);
        }
    }

    println!();
    output::key_value("Tasks", &pipeline.len().to_string());
    output::key_value("Total work", &format!("{} minutes", pipeline.total_work()));

    Ok(())
}

fn print_task(task: &Task, detailed: bool) {
    if !detailed {
        output::list_item(&format!(
            "{} {}",
            task.id,
            style(format!("({} min)", task.duration)).dim()
        ));
        return;
    }

    println!("  {}", style(&task.id).cyan().bold());
    output::key_value("  Duration", &format!("{} minutes", task.duration));
    if !task.dependencies.is_empty() {
        output::key_value("  Dependencies", &task.dependencies.join(", "));
    }
}
