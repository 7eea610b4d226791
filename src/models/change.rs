//! Persistence delta.
//!
//! Planners never mutate the caller's snapshot. They return a [`ChangeSet`]
//! holding only what must be written: the new task, the existing tasks
//! whose scheduling fields changed, and the removed task.

use serde::{Deserialize, Serialize};

use super::{Task, TaskId, TaskList};

/// Changes to persist atomically for one location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    /// Newly created task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Task>,
    /// Existing tasks with changed order, date, dependency, group or status.
    pub updated: Vec<Task>,
    /// Removed task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<TaskId>,
}

impl ChangeSet {
    /// Computes the delta between two snapshots of the same location.
    ///
    /// Tasks present only in `after` are not reported as updates; the
    /// caller records them as `created`.
    pub fn between(before: &TaskList, after: &TaskList) -> Self {
        let updated = after
            .iter()
            .filter(|t| before.get(t.id).is_some_and(|old| old.schedule_differs(t)))
            .cloned()
            .collect();
        Self {
            created: None,
            updated,
            deleted: None,
        }
    }

    /// Sets the created task.
    pub fn with_created(mut self, task: Task) -> Self {
        self.created = Some(task);
        self
    }

    /// Sets the deleted task id.
    pub fn with_deleted(mut self, id: TaskId) -> Self {
        self.deleted = Some(id);
        self
    }

    /// Whether nothing needs to be written.
    pub fn is_empty(&self) -> bool {
        self.created.is_none() && self.updated.is_empty() && self.deleted.is_none()
    }

    /// Updated task by id.
    pub fn updated_task(&self, id: TaskId) -> Option<&Task> {
        self.updated.iter().find(|t| t.id == id)
    }

    /// Applies the delta to a snapshot.
    pub fn apply_to(&self, list: &TaskList) -> TaskList {
        let mut tasks: Vec<Task> = list
            .iter()
            .filter(|t| Some(t.id) != self.deleted)
            .map(|t| self.updated_task(t.id).unwrap_or(t).clone())
            .collect();
        if let Some(created) = &self.created {
            tasks.push(created.clone());
        }
        TaskList::new(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderKey;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_between_reports_only_changes() {
        let before = TaskList::new(vec![
            Task::new(1, OrderKey::from_units(1), d(4)),
            Task::new(2, OrderKey::from_units(2), d(5)).dependent(),
        ]);
        let mut after = before.clone();
        if let Some(t) = after.get_mut(TaskId(2)) {
            t.task_date = d(6);
        }

        let changes = ChangeSet::between(&before, &after);
        assert_eq!(changes.updated.len(), 1);
        assert_eq!(changes.updated[0].id, TaskId(2));
        assert!(changes.created.is_none());
    }

    #[test]
    fn test_apply_to() {
        let before = TaskList::new(vec![
            Task::new(1, OrderKey::from_units(1), d(4)),
            Task::new(2, OrderKey::from_units(2), d(5)),
        ]);
        let changes = ChangeSet::default()
            .with_created(Task::new(3, OrderKey::from_units(3), d(6)))
            .with_deleted(TaskId(1));

        let after = changes.apply_to(&before);
        let ids: Vec<u64> = after.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_empty() {
        assert!(ChangeSet::default().is_empty());
        assert!(!ChangeSet::default().with_deleted(TaskId(1)).is_empty());
    }
}
