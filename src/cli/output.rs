// Output formatting for migration results

use chrono::NaiveDate;
use crate::tasks::{MigrationReport, MoveOutcome};

/// One line describing a single move attempt
pub fn format_outcome(outcome: &MoveOutcome, to: NaiveDate) -> String {
    let day = to.format("%Y-%m-%d");
    match &outcome.result {
        Ok(()) => format!("Moved Task: {} ({}) to {}", outcome.title, outcome.task_id, day),
        Err(e) => format!(
            "Failed to move task: {} ({}) to {} with error: {}",
            outcome.title, outcome.task_id, day, e
        ),
    }
}

/// Status note for a run that matched nothing; goes to stderr
pub fn format_empty_notice(report: &MigrationReport) -> Option<String> {
    if !report.outcomes.is_empty() {
        return None;
    }
    Some(format!(
        "No tasks due on {} in \"{}\".",
        report.from.format("%Y-%m-%d"),
        report.list.title
    ))
}

/// All outcome lines, newline-terminated. Empty when nothing was moved.
pub fn format_report(report: &MigrationReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(&format_outcome(outcome, report.to));
        out.push('\n');
    }
    out
}
