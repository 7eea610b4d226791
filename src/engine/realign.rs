//! Dependency realignment.
//!
//! # Algorithm
//!
//! Single left-to-right pass with an anchor-date cursor:
//!
//! 1. First member of a linked group: the group is one unit. Its shared date
//!    is taken as-is and becomes the cursor. Later members are skipped.
//! 2. Ungrouped independent task: its date is authoritative and becomes the
//!    cursor.
//! 3. Ungrouped dependent task: date = first working day after the cursor,
//!    then the cursor moves to it.
//!
//! A dependent task with no cursor yet (only possible when the first-task
//! rule is relaxed) keeps its date and seeds the cursor.
//!
//! # Complexity
//! O(n) in the number of tasks of the location.
//!
//! Realignment is idempotent: a second pass over its own output changes
//! nothing, because only dependent ungrouped dates are written and they are
//! a function of dates the pass does not write.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{following_workday, Task, TaskId, TaskList};

/// Outcome of a realignment pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Realignment {
    /// The corrected list.
    pub list: TaskList,
    /// Tasks whose date changed, in list order.
    pub changed: Vec<TaskId>,
}

impl Realignment {
    /// Tasks whose date changed.
    pub fn changed_tasks(&self) -> impl Iterator<Item = &Task> {
        self.changed.iter().filter_map(|id| self.list.get(*id))
    }

    /// Whether the input was already aligned.
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Recomputes dependent dates over a copy of `list`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_sequence::engine::realign;
/// use u_sequence::models::{OrderKey, Task, TaskId, TaskList};
///
/// let friday = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
/// let list = TaskList::new(vec![
///     Task::new(1, OrderKey::from_units(1), friday),
///     Task::new(2, OrderKey::from_units(2), friday).dependent(),
/// ]);
///
/// let result = realign(&list);
/// assert_eq!(result.changed, vec![TaskId(2)]);
/// assert_eq!(
///     result.list.get(TaskId(2)).unwrap().task_date,
///     NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
/// );
/// ```
pub fn realign(list: &TaskList) -> Realignment {
    let mut out = list.clone();
    let changed = realign_in_place(&mut out);
    Realignment { list: out, changed }
}

/// Recomputes dependent dates in place, returning the ids whose date changed.
pub(crate) fn realign_in_place(list: &mut TaskList) -> Vec<TaskId> {
    let mut cursor: Option<NaiveDate> = None;
    let mut seen_groups = HashSet::new();
    let mut changed = Vec::new();

    for task in list.iter_mut() {
        match task.linked_task_group {
            Some(group) => {
                if seen_groups.insert(group) {
                    cursor = Some(task.task_date);
                }
            }
            None if !task.dependent_on_previous => cursor = Some(task.task_date),
            None => {
                let date = cursor.map(following_workday).unwrap_or(task.task_date);
                if date != task.task_date {
                    task.task_date = date;
                    changed.push(task.id);
                }
                cursor = Some(date);
            }
        }
    }

    if !changed.is_empty() {
        tracing::debug!(changed = changed.len(), "realigned dependent task dates");
    }
    changed
}

/// Forces the first task to be independent. Returns its id if it changed.
pub(crate) fn enforce_first_independent(list: &mut TaskList) -> Option<TaskId> {
    let first = list.iter_mut().next()?;
    if !first.dependent_on_previous {
        return None;
    }
    first.dependent_on_previous = false;
    tracing::debug!(task = %first.id, "first task made independent");
    Some(first.id)
}
