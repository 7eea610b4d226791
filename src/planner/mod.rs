//! Planners.
//!
//! Each planner takes an immutable snapshot of one location, works on a
//! private copy, finishes with a realignment pass, and returns the
//! [`ChangeSet`](crate::models::ChangeSet) to persist. A failed plan leaves
//! the snapshot untouched.
//!
//! # Operations
//!
//! - [`plan_insert`]: new task at the beginning, the end, after a task, or
//!   linked to existing tasks through a [`LinkSlot`]
//! - [`plan_delete`]: remove a task, dissolving a group left with one member
//! - [`plan_link`] / [`plan_unlink`]: group or ungroup existing tasks
//! - [`plan_move`]: reorder a task (drag and drop)
//! - [`plan_update`]: edit date, dependency or status
//! - [`plan_renumber`]: respace every order key

mod delete;
mod insert;
mod link;
mod reorder;
mod slots;
mod update;

pub use delete::plan_delete;
pub use insert::{insertion_points, plan_insert, InsertionIntent};
pub use link::{plan_link, plan_unlink};
pub use reorder::{plan_move, plan_renumber, MoveTarget};
pub use slots::{link_slots, LinkSlot, SlotKind};
pub use update::{plan_update, TaskUpdate};

use crate::config::PlannerConfig;
use crate::engine::{allocate, renumber};
use crate::error::{OrderKeyError, PlanError};
use crate::models::{OrderKey, TaskId, TaskList};

/// Allocates a key right after `after`, or before the first task when `None`.
///
/// On exhaustion the location is renumbered once and allocation retried,
/// unless `auto_renumber` is off.
pub(crate) fn allocate_after(
    list: &mut TaskList,
    after: Option<TaskId>,
    config: &PlannerConfig,
) -> Result<OrderKey, PlanError> {
    let bounds = |list: &TaskList| match after {
        Some(id) => (list.get(id).map(|t| t.order), list.next_order_after(id)),
        None => (None, list.first().map(|t| t.order)),
    };

    let (prev, next) = bounds(&*list);
    match allocate(prev, next) {
        Ok(key) => Ok(key),
        Err(err @ (OrderKeyError::Exhausted { .. } | OrderKeyError::OutOfSequence { .. }))
            if config.auto_renumber =>
        {
            tracing::warn!(error = %err, tasks = list.len(), "renumbering location");
            renumber(list, config.step())?;
            let (prev, next) = bounds(&*list);
            Ok(allocate(prev, next)?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Completed-task eligibility: nothing may land before the last completed task.
///
/// `after` is the task the new position follows, `None` for the beginning.
pub(crate) fn check_eligible(list: &TaskList, after: Option<TaskId>) -> Result<(), PlanError> {
    let Some((completed_at, completed)) = list
        .last_completed_position()
        .and_then(|p| list.at(p).map(|t| (p, t.id)))
    else {
        return Ok(());
    };
    let allowed = after
        .and_then(|id| list.position(id))
        .is_some_and(|p| p >= completed_at);
    if allowed {
        return Ok(());
    }
    Err(PlanError::BeforeCompletedTask { completed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::realign;
    use crate::models::{ChangeSet, Task, TaskDraft, TaskStatus};
    use crate::validation::validate_schedule;
    use chrono::NaiveDate;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn task(id: u64, hundredths: i64) -> Task {
        Task::new(
            id,
            OrderKey::from_hundredths(hundredths),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        )
    }

    #[test]
    fn test_allocate_after_renumbers_on_exhaustion() {
        let mut list = TaskList::new(vec![task(1, 100), task(2, 101)]);
        let key = allocate_after(&mut list, Some(TaskId(1)), &PlannerConfig::default()).unwrap();

        assert_eq!(list.get(TaskId(1)).unwrap().order, OrderKey::from_units(1));
        assert_eq!(list.get(TaskId(2)).unwrap().order, OrderKey::from_units(2));
        assert_eq!(key, OrderKey::from_hundredths(150));
    }

    #[test]
    fn test_allocate_after_without_renumber() {
        let mut list = TaskList::new(vec![task(1, 100), task(2, 101)]);
        let config = PlannerConfig::new().with_auto_renumber(false);
        let err = allocate_after(&mut list, Some(TaskId(1)), &config).unwrap_err();

        assert!(matches!(err, PlanError::OrderKey(OrderKeyError::Exhausted { .. })));
        assert_eq!(list.get(TaskId(2)).unwrap().order, OrderKey::from_hundredths(101));
    }

    #[test]
    fn test_allocate_after_renumbers_duplicate_keys() {
        // Loaded data with two tasks on the same key
        let mut list = TaskList::new(vec![task(1, 100), task(2, 100)]);
        let key = allocate_after(&mut list, Some(TaskId(1)), &PlannerConfig::default()).unwrap();

        assert_eq!(list.get(TaskId(2)).unwrap().order, OrderKey::from_units(2));
        assert_eq!(key, OrderKey::from_hundredths(150));

        let mut list = TaskList::new(vec![task(1, 100), task(2, 100)]);
        let config = PlannerConfig::new().with_auto_renumber(false);
        let err = allocate_after(&mut list, Some(TaskId(1)), &config).unwrap_err();
        assert!(matches!(err, PlanError::OrderKey(OrderKeyError::OutOfSequence { .. })));
    }

    #[test]
    fn test_allocate_before_zero_key() {
        let mut list = TaskList::new(vec![task(1, 0)]);
        let key = allocate_after(&mut list, None, &PlannerConfig::default()).unwrap();
        assert_eq!(key, OrderKey::ZERO);
        assert_eq!(list.get(TaskId(1)).unwrap().order, OrderKey::ONE);
    }

    #[test]
    fn test_check_eligible() {
        let list = TaskList::new(vec![
            task(1, 100),
            task(2, 200).with_status(TaskStatus::Complete),
            task(3, 300),
        ]);
        assert!(check_eligible(&list, Some(TaskId(2))).is_ok());
        assert!(check_eligible(&list, Some(TaskId(3))).is_ok());
        assert_eq!(
            check_eligible(&list, Some(TaskId(1))),
            Err(PlanError::BeforeCompletedTask { completed: TaskId(2) })
        );
        assert!(check_eligible(&list, None).is_err());
        assert!(check_eligible(&TaskList::new(vec![task(1, 100)]), None).is_ok());
    }

    fn pick(ids: &[TaskId], rng: &mut SmallRng) -> TaskId {
        ids[rng.random_range(0..ids.len())]
    }

    /// One random operation against `list`. Rejected plans are part of the mix.
    fn random_plan(list: &TaskList, rng: &mut SmallRng, next_id: &mut u64) -> Result<ChangeSet, PlanError> {
        let config = PlannerConfig::default();
        let ids: Vec<TaskId> = list.iter().map(|t| t.id).collect();
        let date = NaiveDate::from_ymd_opt(2024, 3, rng.random_range(1..=28)).unwrap();

        *next_id += 1;
        let mut draft = TaskDraft::new(*next_id, "task").with_date(date);
        if rng.random_bool(0.6) {
            draft = draft.dependent();
        }
        if ids.is_empty() {
            return plan_insert(list, draft, &InsertionIntent::End, &config);
        }

        match rng.random_range(0..10) {
            0 | 1 => plan_insert(list, draft, &InsertionIntent::End, &config),
            2 => plan_insert(list, draft, &InsertionIntent::After(pick(&ids, rng)), &config),
            3 => plan_insert(list, draft, &InsertionIntent::Beginning, &config),
            4 => {
                let targets = vec![pick(&ids, rng), pick(&ids, rng)];
                plan_insert(list, draft, &InsertionIntent::LinkTo { targets, slot: 0 }, &config)
            }
            5 => plan_delete(list, pick(&ids, rng)),
            6 => plan_link(list, &[pick(&ids, rng), pick(&ids, rng)], 0),
            7 => plan_unlink(list, pick(&ids, rng)),
            8 => {
                let target = if rng.random_bool(0.2) {
                    MoveTarget::Beginning
                } else {
                    MoveTarget::After(pick(&ids, rng))
                };
                plan_move(list, pick(&ids, rng), target, &config)
            }
            _ => {
                let update = match rng.random_range(0..4) {
                    0 => TaskUpdate::new().with_status(TaskStatus::Complete),
                    1 => TaskUpdate::new().with_dependent(rng.random_bool(0.5)),
                    _ => TaskUpdate::new().with_date(date),
                };
                plan_update(list, pick(&ids, rng), &update)
            }
        }
    }

    #[test]
    fn test_random_operations_preserve_invariants() {
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut list = TaskList::empty();
            let mut next_id = 0;

            for step in 0..80 {
                let Ok(changes) = random_plan(&list, &mut rng, &mut next_id) else {
                    continue;
                };
                list = changes.apply_to(&list);

                if let Err(errors) = validate_schedule(&list) {
                    panic!("seed {seed} step {step}: {errors:?}");
                }
                assert!(realign(&list).is_noop());
                assert!(list.tasks().windows(2).all(|w| w[0].order < w[1].order));
            }
        }
    }

    #[test]
    fn test_random_key_churn_stays_ordered() {
        // Repeated inserts at one spot exhaust the key space and force renumbering
        let mut rng = SmallRng::seed_from_u64(42);
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut list = TaskList::new(vec![Task::new(1, OrderKey::ONE, date)]);
        let config = PlannerConfig::default();

        for id in 2..60u64 {
            let ids: Vec<TaskId> = list.iter().map(|t| t.id).collect();
            let anchor = if rng.random_bool(0.7) { ids[0] } else { pick(&ids, &mut rng) };
            let draft = TaskDraft::new(id, "task").dependent();
            let changes =
                plan_insert(&list, draft, &InsertionIntent::After(anchor), &config).unwrap();
            list = changes.apply_to(&list);
            assert_eq!(list.position(TaskId(id)), list.position(anchor).map(|p| p + 1));
        }
        assert_eq!(list.len(), 59);
        assert!(validate_schedule(&list).is_ok());
    }
}
