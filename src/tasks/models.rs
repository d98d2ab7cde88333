use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::utils::date::{format_due, parse_due, same_day_of_year};

/// Task status as reported by the Tasks API
///
/// Values other than the two documented ones are kept verbatim so a full
/// update writes back exactly what was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    NeedsAction,
    Completed,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::NeedsAction => "needsAction",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "needsAction" => TaskStatus::NeedsAction,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// A named collection of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A single task
///
/// Only the fields this tool reads are modelled; everything else the API
/// sends is kept in `extra` and written back untouched on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: TaskStatus, due: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            due: due.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// Incomplete, has a due date, and that date falls on `from`'s day-of-year
    pub fn is_due_for_move(&self, from: NaiveDate) -> bool {
        if self.status == TaskStatus::Completed {
            return false;
        }
        match self.due.as_deref() {
            Some(due) if !due.is_empty() => match parse_due(due) {
                Some(ts) => same_day_of_year(&ts, from),
                None => {
                    log::warn!("Skipping task {} ({}): unparseable due date '{}'", self.title, self.id, due);
                    false
                }
            },
            _ => false,
        }
    }

    /// Point the due date at `to`, leaving every other field alone
    pub fn set_due(&mut self, to: NaiveDate) {
        self.due = Some(format_due(to));
    }
}
