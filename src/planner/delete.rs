//! Deletion planner.
//!
//! Removing a task never changes another task's order key; gaps in the key
//! space are fine.

use crate::engine::{detach, enforce_first_independent, realign_in_place};
use crate::error::PlanError;
use crate::models::{ChangeSet, TaskId, TaskList};

/// Plans the removal of a task.
///
/// 1. A grouped task leaves its group first; a sole survivor is ungrouped
///    and its dependency recomputed from its position.
/// 2. The task is removed and the new first task made independent.
/// 3. Dates are realigned and only the changed tasks reported.
pub fn plan_delete(list: &TaskList, id: TaskId) -> Result<ChangeSet, PlanError> {
    let task = list.get(id).ok_or(PlanError::TaskNotFound(id))?;

    let mut work = list.clone();
    if task.is_linked() {
        detach(&mut work, id, true)?;
    }
    work.remove(id);
    enforce_first_independent(&mut work);
    realign_in_place(&mut work);

    let changes = ChangeSet::between(list, &work).with_deleted(id);
    tracing::debug!(task = %id, updated = changes.updated.len(), "planned deletion");
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, OrderKey, Task};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn task(id: u64, date: NaiveDate) -> Task {
        Task::new(id, OrderKey::from_units(id as i64), date)
    }

    #[test]
    fn test_delete_linked_partner_after_independent() {
        // A(independent), B+C linked; delete B
        let list = TaskList::new(vec![
            task(1, d(4)),
            task(2, d(6)).with_group(GroupId(1)),
            task(3, d(6)).with_group(GroupId(1)),
        ]);
        let changes = plan_delete(&list, TaskId(2)).unwrap();

        assert_eq!(changes.deleted, Some(TaskId(2)));
        let c = changes.updated_task(TaskId(3)).unwrap();
        assert_eq!(c.linked_task_group, None);
        assert!(c.dependent_on_previous);
        assert_eq!(c.task_date, d(5));
    }

    #[test]
    fn test_delete_linked_partner_at_front() {
        // B+C linked at the front; delete B, C becomes first and independent
        let list = TaskList::new(vec![
            task(2, d(6)).with_group(GroupId(1)),
            task(3, d(6)).dependent().with_group(GroupId(1)),
            task(4, d(7)).dependent(),
        ]);
        let changes = plan_delete(&list, TaskId(2)).unwrap();

        let c = changes.updated_task(TaskId(3)).unwrap();
        assert_eq!(c.linked_task_group, None);
        assert!(!c.dependent_on_previous);
        assert_eq!(c.task_date, d(6));
        assert!(changes.updated_task(TaskId(4)).is_none());
    }

    #[test]
    fn test_delete_realigns_followers() {
        let list = TaskList::new(vec![
            task(1, d(4)),
            task(2, d(5)).dependent(),
            task(3, d(6)).dependent(),
            task(4, d(7)).dependent(),
        ]);
        let changes = plan_delete(&list, TaskId(2)).unwrap();

        assert_eq!(changes.updated_task(TaskId(3)).unwrap().task_date, d(5));
        assert_eq!(changes.updated_task(TaskId(4)).unwrap().task_date, d(6));
        // Orders are left alone
        assert!(changes.updated.iter().all(|t| t.order == list.get(t.id).unwrap().order));
    }

    #[test]
    fn test_delete_first_promotes_next() {
        let list = TaskList::new(vec![task(1, d(4)), task(2, d(5)).dependent()]);
        let changes = plan_delete(&list, TaskId(1)).unwrap();

        let t2 = changes.updated_task(TaskId(2)).unwrap();
        assert!(!t2.dependent_on_previous);
        assert_eq!(t2.task_date, d(5));
    }

    #[test]
    fn test_delete_from_larger_group_keeps_group() {
        let list = TaskList::new(vec![
            task(1, d(6)).with_group(GroupId(1)),
            task(2, d(6)).with_group(GroupId(1)),
            task(3, d(6)).with_group(GroupId(1)),
        ]);
        let changes = plan_delete(&list, TaskId(3)).unwrap();
        assert!(changes.updated.is_empty());
    }

    #[test]
    fn test_delete_unknown() {
        let list = TaskList::new(vec![task(1, d(4))]);
        assert_eq!(
            plan_delete(&list, TaskId(9)),
            Err(PlanError::TaskNotFound(TaskId(9)))
        );
    }
}
