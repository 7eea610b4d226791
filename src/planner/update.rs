//! Direct edits of a single task.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{enforce_first_independent, realign_in_place};
use crate::error::PlanError;
use crate::models::{ChangeSet, TaskId, TaskList, TaskStatus};

/// Fields to change on a task. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_on_previous: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.task_date = Some(date);
        self
    }

    /// Sets the dependency flag.
    pub fn with_dependent(mut self, dependent: bool) -> Self {
        self.dependent_on_previous = Some(dependent);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether nothing would change.
    pub fn is_empty(&self) -> bool {
        self.task_date.is_none() && self.dependent_on_previous.is_none() && self.status.is_none()
    }
}

/// Plans a direct edit of one task.
///
/// An explicit date is an anchor: on a grouped task it moves the whole
/// group, on an ungrouped task it makes the task independent. Asking for
/// `dependent_on_previous = true` in the same edit wins and the date is
/// recomputed instead.
///
/// # Errors
/// - [`PlanError::TaskNotFound`] for an unknown id
/// - [`PlanError::FirstTaskDependent`] when the first task would become dependent
pub fn plan_update(list: &TaskList, id: TaskId, update: &TaskUpdate) -> Result<ChangeSet, PlanError> {
    let task = list.get(id).ok_or(PlanError::TaskNotFound(id))?;
    let is_first = list.first().is_some_and(|t| t.id == id);
    if is_first && update.dependent_on_previous == Some(true) {
        return Err(PlanError::FirstTaskDependent);
    }

    let mut work = list.clone();
    if let Some(date) = update.task_date {
        match task.linked_task_group {
            Some(group) => {
                for member in list.groups().members(group) {
                    if let Some(t) = work.get_mut(*member) {
                        t.task_date = date;
                    }
                }
            }
            None => {
                if let Some(t) = work.get_mut(id) {
                    t.task_date = date;
                    if update.dependent_on_previous != Some(true) {
                        t.dependent_on_previous = false;
                    }
                }
            }
        }
    }

    if let Some(t) = work.get_mut(id) {
        if let Some(dependent) = update.dependent_on_previous {
            t.dependent_on_previous = dependent;
        }
        if let Some(status) = update.status {
            t.status = status;
        }
    }

    enforce_first_independent(&mut work);
    realign_in_place(&mut work);

    let changes = ChangeSet::between(list, &work);
    tracing::debug!(task = %id, updated = changes.updated.len(), "planned update");
    Ok(changes)
}
