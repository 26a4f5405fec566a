//! Display table built from a schedule trace.
//!
//! Three row layouts: one row per minute, runs of identical minutes merged,
//! or runs of minutes with the same group label merged.

use std::fmt;

use serde::Serialize;

use crate::scheduler::{Schedule, TraceRecord};

const TASKS_HEADER: &str = "Tasks being Executed";

/// A row of the schedule table covering minutes `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub start: u64,
    pub end: u64,
    pub tasks: Vec<String>,
    pub group: Option<String>,
}

/// Display-ready view of a [`Schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total_time: u64,
    pub rows: Vec<ReportRow>,
}

impl ReportRow {
    fn from_record(record: &TraceRecord) -> Self {
        Self {
            start: record.time,
            end: record.time,
            tasks: record.tasks().into_iter().map(str::to_string).collect(),
            group: record.group().map(str::to_string),
        }
    }

    /// `3` for a single minute, `3-5` for a range.
    pub fn time_label(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}-{}", self.start, self.end)
        }
    }

    fn tasks_label(&self) -> String {
        self.tasks.join(", ")
    }
}

impl Report {
    /// One row per minute.
    pub fn new(schedule: &Schedule) -> Self {
        Self {
            total_time: schedule.total_time,
            rows: schedule.trace.iter().map(ReportRow::from_record).collect(),
        }
    }

    /// Merges consecutive minutes that run the same tasks in the same group.
    pub fn compact(schedule: &Schedule) -> Self {
        let mut rows: Vec<ReportRow> = Vec::new();

        for record in &schedule.trace {
            let row = ReportRow::from_record(record);
            match rows.last_mut() {
                Some(last) if last.tasks == row.tasks && last.group == row.group => {
                    last.end = row.end;
                }
                _ => rows.push(row),
            }
        }

        Self {
            total_time: schedule.total_time,
            rows,
        }
    }

    /// Merges consecutive minutes with the same group label. A merged row
    /// lists every task that ran in its range once, in order of first
    /// appearance.
    pub fn by_group(schedule: &Schedule) -> Self {
        let mut rows: Vec<ReportRow> = Vec::new();

        for record in &schedule.trace {
            let row = ReportRow::from_record(record);
            match rows.last_mut() {
                Some(last) if last.group == row.group => {
                    last.end = row.end;
                    for task in row.tasks {
                        if !last.tasks.contains(&task) {
                            last.tasks.push(task);
                        }
                    }
                }
                _ => rows.push(row),
            }
        }

        Self {
            total_time: schedule.total_time,
            rows,
        }
    }

    pub fn summary(&self) -> String {
        format!("Minimum Execution Time = {} minutes.", self.total_time)
    }

    /// Renders the rows as a pipe table.
    pub fn table(&self) -> String {
        let tasks_width = self
            .rows
            .iter()
            .map(|row| row.tasks_label().len())
            .max()
            .unwrap_or(0)
            .max(TASKS_HEADER.len());
        let time_width = self
            .rows
            .iter()
            .map(|row| row.time_label().len())
            .max()
            .unwrap_or(0)
            // column width of the classic table
            .max(7);

        let mut out = String::new();
        out.push_str(&format!(
            "| {:<time_width$} | {:<tasks_width$} | Group Name\n",
            "Time", TASKS_HEADER
        ));
        out.push_str(&format!(
            "| {} | {} | ----------\n",
            "-".repeat(time_width),
            "-".repeat(tasks_width)
        ));

        for row in &self.rows {
            out.push_str(&format!(
                "| {:<time_width$} | {:<tasks_width$} | {}\n",
                row.time_label(),
                row.tasks_label(),
                row.group.as_deref().unwrap_or("")
            ));
        }

        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())?;
        writeln!(f)?;
        writeln!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Slot;

    fn slot(core: usize, task: &str, group: Option<&str>) -> Slot {
        Slot {
            core,
            task: task.to_string(),
            group: group.map(str::to_string),
        }
    }

    fn sample() -> Schedule {
        let records = vec![
            vec![slot(0, "load", Some("prep")), slot(1, "fetch", None)],
            vec![slot(0, "load", Some("prep")), slot(1, "fetch", None)],
            vec![slot(0, "fit", Some("train"))],
            vec![slot(1, "fetch", None)],
        ];

        Schedule {
            total_time: 4,
            cores: 2,
            trace: records
                .into_iter()
                .enumerate()
                .map(|(i, slots)| TraceRecord {
                    time: i as u64 + 1,
                    slots,
                })
                .collect(),
        }
    }

    #[test]
    fn test_one_row_per_minute() {
        let report = Report::new(&sample());

        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.rows[0].tasks, vec!["load", "fetch"]);
        assert_eq!(report.rows[0].group.as_deref(), Some("prep"));
        assert_eq!(report.rows[3].group, None);
    }

    #[test]
    fn test_compact_merges_identical_minutes() {
        let report = Report::compact(&sample());

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].time_label(), "1-2");
        assert_eq!(report.rows[1].time_label(), "3");
        assert_eq!(report.total_time, 4);
    }

    #[test]
    fn test_by_group_merges_runs_of_the_same_group() {
        let report = Report::by_group(&sample());

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].time_label(), "1-2");
        assert_eq!(report.rows[0].tasks, vec!["load", "fetch"]);
        assert_eq!(report.rows[1].group.as_deref(), Some("train"));
        assert_eq!(report.rows[2].time_label(), "4");
        assert_eq!(report.rows[2].group, None);
    }

    #[test]
    fn test_by_group_collects_every_task_of_the_run() {
        let mut schedule = sample();
        schedule.trace[1].slots = vec![slot(0, "split", Some("prep")), slot(1, "fetch", None)];

        let compact = Report::compact(&schedule);
        let grouped = Report::by_group(&schedule);

        assert_eq!(compact.rows.len(), 4);
        assert_eq!(grouped.rows[0].time_label(), "1-2");
        assert_eq!(grouped.rows[0].tasks, vec!["load", "fetch", "split"]);
    }

    #[test]
    fn test_table_layout() {
        let table = Report::new(&sample()).table();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "| Time    | Tasks being Executed | Group Name");
        assert_eq!(lines[1], "| ------- | -------------------- | ----------");
        assert_eq!(lines[2], "| 1       | load, fetch          | prep");
        assert_eq!(lines[5], "| 4       | fetch                | ");
    }

    #[test]
    fn test_display_ends_with_summary() {
        let rendered = Report::new(&sample()).to_string();
        assert!(rendered.ends_with("\nMinimum Execution Time = 4 minutes.\n"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(Report::compact(&sample())).unwrap();
        assert_eq!(json["total_time"], 4);
        assert_eq!(json["rows"][0]["start"], 1);
        assert_eq!(json["rows"][0]["end"], 2);
    }
}
