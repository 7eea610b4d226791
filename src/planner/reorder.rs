//! Reordering and renumbering.
//!
//! A move gives the moved task a fresh key between its new neighbours and
//! leaves every other key alone. The moved task keeps its own flags and
//! group; only its computed date may change.

use serde::{Deserialize, Serialize};

use super::{allocate_after, check_eligible};
use crate::config::{FirstTaskPolicy, PlannerConfig};
use crate::engine::{enforce_first_independent, realign_in_place, renumber};
use crate::error::PlanError;
use crate::models::{ChangeSet, TaskId, TaskList};

/// Destination of a moved task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    /// Before every other task.
    Beginning,
    /// Right after a task (or after the last member of its group).
    After(TaskId),
}

/// Plans moving a task to a new position (drag and drop).
///
/// Under [`FirstTaskPolicy::PreserveOnDrag`] a dependent task dropped at
/// the front keeps its flag; any other task that becomes first is still
/// made independent.
pub fn plan_move(
    list: &TaskList,
    id: TaskId,
    target: MoveTarget,
    config: &PlannerConfig,
) -> Result<ChangeSet, PlanError> {
    if !list.contains(id) {
        return Err(PlanError::TaskNotFound(id));
    }

    let mut work = list.clone();
    let mut moving = work.remove(id).ok_or(PlanError::TaskNotFound(id))?;

    let after = match target {
        MoveTarget::Beginning => None,
        MoveTarget::After(reference) if reference == id => {
            return Err(PlanError::SelfReference(id));
        }
        MoveTarget::After(reference) => {
            if !work.contains(reference) {
                return Err(PlanError::TaskNotFound(reference));
            }
            Some(work.groups().last_member(reference).unwrap_or(reference))
        }
    };
    check_eligible(&work, after)?;

    moving.order = allocate_after(&mut work, after, config)?;
    work.insert(moving);

    let moved_first = work.first().is_some_and(|t| t.id == id);
    let exempt = moved_first && config.first_task_policy == FirstTaskPolicy::PreserveOnDrag;
    if !exempt {
        enforce_first_independent(&mut work);
    }
    realign_in_place(&mut work);

    let changes = ChangeSet::between(list, &work);
    tracing::debug!(task = %id, ?target, updated = changes.updated.len(), "planned move");
    Ok(changes)
}

/// Plans respacing every order key to `step, 2·step, …`.
pub fn plan_renumber(list: &TaskList, config: &PlannerConfig) -> Result<ChangeSet, PlanError> {
    let mut work = list.clone();
    let changed = renumber(&mut work, config.step())?;
    tracing::debug!(changed, "planned renumbering");
    Ok(ChangeSet::between(list, &work))
}
