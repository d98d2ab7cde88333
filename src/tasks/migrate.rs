// Task migration: find the list, select tasks due on `from`, move them to `to`

use chrono::NaiveDate;
use crate::error::MoverError;
use crate::utils::date::TimeTargets;
use super::api::{TasksApi, TASK_LIST_PAGE_SIZE};
use super::models::{Task, TaskList};

/// Result of one attempted move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub task_id: String,
    pub title: String,
    /// `Err` carries the update failure message
    pub result: Result<(), String>,
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a migration run did
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    pub list: TaskList,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub outcomes: Vec<MoveOutcome>,
}

impl MigrationReport {
    pub fn moved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.moved()
    }
}

/// First list whose title is exactly `name`
pub fn find_task_list(api: &dyn TasksApi, name: &str) -> Result<TaskList, MoverError> {
    let lists = api.list_task_lists(TASK_LIST_PAGE_SIZE)?;
    if lists.is_empty() {
        return Err(MoverError::NoTaskLists);
    }
    lists
        .into_iter()
        .find(|list| list.title == name)
        .ok_or_else(|| MoverError::TaskListNotFound(name.to_string()))
}

/// Tasks eligible to move off `from`, in the order the API returned them
pub fn select_tasks(tasks: Vec<Task>, from: NaiveDate) -> Vec<Task> {
    tasks.into_iter().filter(|task| task.is_due_for_move(from)).collect()
}

/// Move every incomplete task due on `targets.from` in list `list_name` to `targets.to`.
///
/// Lookup failures abort. Update failures are recorded per task and the
/// remaining tasks are still processed.
pub fn migrate(api: &dyn TasksApi, list_name: &str, targets: &TimeTargets) -> Result<MigrationReport, MoverError> {
    let list = find_task_list(api, list_name)?;
    log::debug!("Using task list {} ({})", list.title, list.id);

    let tasks = api.list_tasks(&list.id)?;
    let total = tasks.len();
    let selected = select_tasks(tasks, targets.from);
    log::info!("{} of {} tasks in {} are due on {}", selected.len(), total, list.title, targets.from);

    let mut outcomes = Vec::with_capacity(selected.len());
    for mut task in selected {
        task.set_due(targets.to);
        let result = match api.update_task(&list.id, &task) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::warn!("Failed to move task {} ({}): {}", task.title, task.id, e);
                Err(e.to_string())
            }
        };
        outcomes.push(MoveOutcome {
            task_id: task.id,
            title: task.title,
            result,
        });
    }

    Ok(MigrationReport {
        list,
        from: targets.from,
        to: targets.to,
        outcomes,
    })
}
