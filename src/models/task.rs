//! Task model.
//!
//! A task is one unit of site work inside a location. Its position among
//! siblings is given by an [`OrderKey`]; its date is either explicit
//! (independent task) or derived from the scheduling unit before it
//! (dependent task). Tasks sharing a [`GroupId`] happen on the same date.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::OrderKey;

/// Canonical task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Linked task group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

/// Scheduling state derived from a task's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Explicit date, no group.
    UnlinkedIndependent,
    /// Date follows the previous scheduling unit, no group.
    UnlinkedDependent,
    /// Date driven by its linked group.
    LinkedMember,
}

/// A task within a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier.
    pub id: TaskId,
    /// Human-readable name.
    pub name: String,
    /// Trade or work category (e.g. "framing", "inspection").
    #[serde(default)]
    pub task_type: String,
    /// Sort key among the location's tasks.
    pub order: OrderKey,
    /// Scheduled calendar date.
    pub task_date: NaiveDate,
    /// Whether the date follows the previous scheduling unit.
    pub dependent_on_previous: bool,
    /// Linked group this task belongs to, if any.
    #[serde(default)]
    pub linked_task_group: Option<GroupId>,
    /// Progress state.
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Creates an independent, ungrouped task.
    pub fn new(id: impl Into<TaskId>, order: OrderKey, task_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            task_type: String::new(),
            order,
            task_date,
            dependent_on_previous: false,
            linked_task_group: None,
            status: TaskStatus::NotStarted,
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the task type.
    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    /// Marks the task as dependent on the previous scheduling unit.
    pub fn dependent(mut self) -> Self {
        self.dependent_on_previous = true;
        self
    }

    /// Places the task in a linked group.
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.linked_task_group = Some(group);
        self
    }

    /// Sets the progress state.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the task has been completed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Complete
    }

    /// Whether the task belongs to a linked group.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked_task_group.is_some()
    }

    /// Current scheduling state.
    pub fn state(&self) -> TaskState {
        match (self.linked_task_group, self.dependent_on_previous) {
            (Some(_), _) => TaskState::LinkedMember,
            (None, true) => TaskState::UnlinkedDependent,
            (None, false) => TaskState::UnlinkedIndependent,
        }
    }

    /// Whether any field the planners manage differs from `other`.
    pub(crate) fn schedule_differs(&self, other: &Task) -> bool {
        self.order != other.order
            || self.task_date != other.task_date
            || self.dependent_on_previous != other.dependent_on_previous
            || self.linked_task_group != other.linked_task_group
            || self.status != other.status
    }
}

/// Attributes of a task that does not exist yet.
///
/// The insertion planner decides the final order, date, dependency flag and
/// group; the draft only carries the caller's preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Identifier reserved for the new task.
    pub id: TaskId,
    /// Human-readable name.
    pub name: String,
    /// Trade or work category.
    #[serde(default)]
    pub task_type: String,
    /// Explicit date, required whenever the task ends up independent.
    #[serde(default)]
    pub task_date: Option<NaiveDate>,
    /// Caller's dependency preference.
    #[serde(default)]
    pub dependent_on_previous: bool,
    /// Initial progress state.
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Creates a draft with no date and no dependency.
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_type: String::new(),
            task_date: None,
            dependent_on_previous: false,
            status: TaskStatus::NotStarted,
        }
    }

    /// Sets the task type.
    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    /// Sets the explicit date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.task_date = Some(date);
        self
    }

    /// Requests a date derived from the previous scheduling unit.
    pub fn dependent(mut self) -> Self {
        self.dependent_on_previous = true;
        self
    }

    /// Sets the initial progress state.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Materializes the draft; the planner fills in the scheduling fields.
    pub(crate) fn into_task(self, order: OrderKey, task_date: NaiveDate, dependent: bool) -> Task {
        Task {
            id: self.id,
            name: self.name,
            task_type: self.task_type,
            order,
            task_date,
            dependent_on_previous: dependent,
            linked_task_group: None,
            status: self.status,
        }
    }
}
