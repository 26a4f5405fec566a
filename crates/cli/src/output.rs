//! Terminal output formatting.

use console::style;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), message);
}

/// Prints the schedule summary line with run statistics.
pub fn summary(line: &str, tasks: usize, cores: usize, utilization: f64) {
    println!();
    println!("{}", style(line).green().bold());
    println!(
        "{}",
        style(format!(
            "{} tasks on {} cores, {:.0}% core utilization",
            tasks,
            cores,
            utilization * 100.0
        ))
        .dim()
    );
}

/// Prints a header for a section.
pub fn section_header(title: &str) {
    println!("\n{}", style(format!("── {} ──", title)).bold());
}

/// Prints a list item.
pub fn list_item(text: &str) {
    println!("  {} {}", style("•").dim(), text);
}

/// Prints a key-value pair.
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}
