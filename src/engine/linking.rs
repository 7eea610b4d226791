//! Linked group management.
//!
//! A linked group is a set of tasks forced onto one date. Linking never
//! touches a member's own `dependent_on_previous`; only the sole survivor
//! of a dissolved group has its flag recomputed from its position.

use chrono::NaiveDate;

use crate::error::PlanError;
use crate::models::{GroupId, TaskId, TaskList};

/// Expands `id` to every member of its group, in task order.
///
/// Ungrouped tasks expand to themselves; unknown ids expand to nothing.
pub fn expand_selection(list: &TaskList, id: TaskId) -> Vec<TaskId> {
    if !list.contains(id) {
        return Vec::new();
    }
    match list.groups().peers(id) {
        Some(members) => members.to_vec(),
        None => vec![id],
    }
}

/// Expands a selection to whole groups and sorts it by position.
pub fn expand_all(list: &TaskList, ids: &[TaskId]) -> Result<Vec<TaskId>, PlanError> {
    if let Some(missing) = ids.iter().find(|id| !list.contains(**id)) {
        return Err(PlanError::TaskNotFound(*missing));
    }
    let mut expanded: Vec<TaskId> = list.groups().closure(ids).into_iter().collect();
    expanded.sort_by_key(|id| list.position(*id));
    Ok(expanded)
}

/// Links `ids` (expanded to whole groups) onto `anchor`.
///
/// Reuses the group of the earliest member that already has one, absorbing
/// any other groups touched by the selection; otherwise mints a new id.
pub fn link(list: &mut TaskList, ids: &[TaskId], anchor: NaiveDate) -> Result<GroupId, PlanError> {
    if ids.is_empty() {
        return Err(PlanError::EmptyLinkTargets);
    }
    let members = expand_all(list, ids)?;
    let group = members
        .iter()
        .find_map(|id| list.get(*id).and_then(|t| t.linked_task_group))
        .unwrap_or_else(|| list.next_group_id());

    for id in &members {
        if let Some(task) = list.get_mut(*id) {
            task.linked_task_group = Some(group);
            task.task_date = anchor;
        }
    }
    tracing::debug!(%group, members = members.len(), %anchor, "linked tasks");
    Ok(group)
}

/// Removes `id` from its group.
///
/// When one member remains, its group is cleared and it becomes dependent
/// unless it is now the first task. Returns that survivor.
pub fn unlink(list: &mut TaskList, id: TaskId) -> Result<Option<TaskId>, PlanError> {
    detach(list, id, false)
}

/// Like [`unlink`], but treats `id` as about to be removed when deciding
/// whether the survivor is first.
pub(crate) fn detach(
    list: &mut TaskList,
    id: TaskId,
    removing: bool,
) -> Result<Option<TaskId>, PlanError> {
    let task = list.get(id).ok_or(PlanError::TaskNotFound(id))?;
    let group = task.linked_task_group.ok_or(PlanError::NotLinked(id))?;
    let groups = list.groups();
    let remaining: Vec<TaskId> = groups
        .members(group)
        .iter()
        .copied()
        .filter(|m| *m != id)
        .collect();

    if let Some(task) = list.get_mut(id) {
        task.linked_task_group = None;
    }

    let [survivor] = remaining.as_slice() else {
        return Ok(None);
    };
    let first = list
        .iter()
        .map(|t| t.id)
        .find(|t| !(removing && *t == id));
    let is_first = first == Some(*survivor);
    if let Some(task) = list.get_mut(*survivor) {
        task.linked_task_group = None;
        task.dependent_on_previous = !is_first;
    }
    tracing::debug!(%group, survivor = %survivor, is_first, "dissolved linked group");
    Ok(Some(*survivor))
}
