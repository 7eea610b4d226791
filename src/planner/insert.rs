//! Insertion planner.
//!
//! # Algorithm
//!
//! 1. `Beginning`: key before the first task, forced independent, explicit
//!    date. A previously-first independent task becomes dependent.
//! 2. `End`: key after the last task; dependent tasks get their date from
//!    realignment, independent ones need an explicit date.
//! 3. `After(id)`: a grouped reference resolves to the last member of its
//!    group so the group is never split. Unknown references fall back to
//!    `End`.
//! 4. `LinkTo`: the chosen [`LinkSlot`](super::LinkSlot) supplies the anchor
//!    date; the new task is placed after the last target, marked
//!    independent, and linked with every target.
//!
//! The cascade of date shifts for later tasks is the final realignment
//! pass: dependent ungrouped tasks follow the new task, groups keep their
//! shared date and carry the cursor on from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{allocate_after, check_eligible, link_slots};
use crate::config::PlannerConfig;
use crate::engine::{enforce_first_independent, expand_all, link, realign_in_place};
use crate::error::PlanError;
use crate::models::{ChangeSet, OrderKey, Task, TaskDraft, TaskId, TaskList};

/// Where a new task goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionIntent {
    /// Before every other task.
    Beginning,
    /// After every other task.
    End,
    /// Right after a task (or after the last member of its group).
    After(TaskId),
    /// Linked to existing tasks, anchored on the slot at `slot` in
    /// [`link_slots`](super::link_slots) order.
    LinkTo { targets: Vec<TaskId>, slot: usize },
}

/// Plans the creation of a task.
///
/// Returns the new task in `created` and every existing task whose order,
/// date, dependency or group changed in `updated`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_sequence::config::PlannerConfig;
/// use u_sequence::models::{OrderKey, Task, TaskDraft, TaskId, TaskList};
/// use u_sequence::planner::{plan_insert, InsertionIntent};
///
/// let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let list = TaskList::new(vec![Task::new(1, OrderKey::from_units(1), monday)]);
///
/// let changes = plan_insert(
///     &list,
///     TaskDraft::new(2, "Rough-in").dependent(),
///     &InsertionIntent::After(TaskId(1)),
///     &PlannerConfig::default(),
/// )
/// .unwrap();
///
/// let created = changes.created.unwrap();
/// assert_eq!(created.task_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
/// assert_eq!(created.order.to_string(), "2.00");
/// ```
pub fn plan_insert(
    list: &TaskList,
    draft: TaskDraft,
    intent: &InsertionIntent,
    config: &PlannerConfig,
) -> Result<ChangeSet, PlanError> {
    let id = draft.id;
    if list.contains(id) {
        return Err(PlanError::DuplicateTask(id));
    }

    let mut work = list.clone();
    match intent {
        InsertionIntent::Beginning => insert_beginning(&mut work, draft, config)?,
        InsertionIntent::End => insert_end(&mut work, draft, config)?,
        InsertionIntent::After(reference) if work.contains(*reference) => {
            insert_after(&mut work, draft, *reference, config)?
        }
        InsertionIntent::After(reference) => {
            tracing::warn!(task = %id, reference = %reference, "insert reference not found, appending");
            insert_end(&mut work, draft, config)?
        }
        InsertionIntent::LinkTo { targets, slot } => {
            insert_linked(&mut work, draft, targets, *slot, config)?
        }
    }

    enforce_first_independent(&mut work);
    realign_in_place(&mut work);

    let created = work.get(id).cloned().ok_or(PlanError::TaskNotFound(id))?;
    tracing::debug!(
        task = %id,
        order = %created.order,
        date = %created.task_date,
        dependent = created.dependent_on_previous,
        "planned insertion"
    );
    Ok(ChangeSet::between(list, &work).with_created(created))
}

/// Lists the positions a new task may be inserted at.
///
/// `Beginning` is offered only while no task is complete. `After` is offered
/// for the last completed task and every later task, skipping group members
/// other than the last one. The last task is covered by `End`.
pub fn insertion_points(list: &TaskList) -> Vec<InsertionIntent> {
    let mut points = Vec::new();
    let completed_at = list.last_completed_position();
    if completed_at.is_none() {
        points.push(InsertionIntent::Beginning);
    }

    let groups = list.groups();
    let start = completed_at.unwrap_or(0);
    let last = list.len().saturating_sub(1);
    for (position, task) in list.iter().enumerate().skip(start) {
        if position == last {
            break;
        }
        if groups.last_member(task.id).is_some_and(|m| m != task.id) {
            continue;
        }
        points.push(InsertionIntent::After(task.id));
    }

    points.push(InsertionIntent::End);
    points
}

fn insert_beginning(
    work: &mut TaskList,
    draft: TaskDraft,
    config: &PlannerConfig,
) -> Result<(), PlanError> {
    check_eligible(work, None)?;
    let date = draft.task_date.ok_or(PlanError::MissingTaskDate(draft.id))?;
    let order = allocate_after(work, None, config)?;

    if let Some(previous_first) = work.first().map(|t| t.id) {
        if let Some(task) = work.get_mut(previous_first) {
            if !task.is_linked() && !task.dependent_on_previous {
                task.dependent_on_previous = true;
            }
        }
    }

    work.insert(draft.into_task(order, date, false));
    Ok(())
}

fn insert_end(work: &mut TaskList, draft: TaskDraft, config: &PlannerConfig) -> Result<(), PlanError> {
    let Some(last) = work.last().map(|t| (t.id, t.task_date)) else {
        let date = draft.task_date.ok_or(PlanError::MissingTaskDate(draft.id))?;
        let order = allocate_after(work, None, config)?;
        work.insert(draft.into_task(order, date, false));
        return Ok(());
    };
    let order = allocate_after(work, Some(last.0), config)?;
    insert_sequenced(work, draft, order, last.1)
}

fn insert_after(
    work: &mut TaskList,
    draft: TaskDraft,
    reference: TaskId,
    config: &PlannerConfig,
) -> Result<(), PlanError> {
    let anchor = work.groups().last_member(reference).unwrap_or(reference);
    check_eligible(work, Some(anchor))?;
    let anchor_date = work
        .get(anchor)
        .map(|t| t.task_date)
        .ok_or(PlanError::TaskNotFound(anchor))?;
    let order = allocate_after(work, Some(anchor), config)?;
    insert_sequenced(work, draft, order, anchor_date)
}

/// Inserts a dependent task (date left to realignment) or an independent
/// one (explicit date required).
fn insert_sequenced(
    work: &mut TaskList,
    draft: TaskDraft,
    order: OrderKey,
    predecessor_date: NaiveDate,
) -> Result<(), PlanError> {
    let task: Task = if draft.dependent_on_previous {
        let placeholder = draft.task_date.unwrap_or(predecessor_date);
        draft.into_task(order, placeholder, true)
    } else {
        let date = draft.task_date.ok_or(PlanError::MissingTaskDate(draft.id))?;
        draft.into_task(order, date, false)
    };
    work.insert(task);
    Ok(())
}

fn insert_linked(
    work: &mut TaskList,
    draft: TaskDraft,
    targets: &[TaskId],
    slot: usize,
    config: &PlannerConfig,
) -> Result<(), PlanError> {
    let slots = link_slots(work, targets)?;
    let chosen = slots.get(slot).ok_or(PlanError::SlotOutOfRange {
        index: slot,
        available: slots.len(),
    })?;
    let anchor_date = chosen.anchor_date;

    let mut members = expand_all(work, targets)?;
    let last_target = *members.last().ok_or(PlanError::EmptyLinkTargets)?;
    check_eligible(work, Some(last_target))?;
    let order = allocate_after(work, Some(last_target), config)?;

    let id = draft.id;
    work.insert(draft.into_task(order, anchor_date, false));
    members.push(id);
    link(work, &members, anchor_date)?;
    Ok(())
}
