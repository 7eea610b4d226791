//! Linking and unlinking existing tasks.

use super::link_slots;
use crate::engine::{detach, enforce_first_independent, expand_all, link, realign_in_place};
use crate::error::PlanError;
use crate::models::{ChangeSet, TaskId, TaskList};

/// Links existing tasks onto the date of the slot at `slot`.
///
/// Targets expand to whole groups; at least two tasks must result.
pub fn plan_link(list: &TaskList, targets: &[TaskId], slot: usize) -> Result<ChangeSet, PlanError> {
    let slots = link_slots(list, targets)?;
    let chosen = slots.get(slot).ok_or(PlanError::SlotOutOfRange {
        index: slot,
        available: slots.len(),
    })?;
    let members = expand_all(list, targets)?;
    if members.len() < 2 {
        return Err(PlanError::TooFewLinkTargets);
    }

    let mut work = list.clone();
    link(&mut work, &members, chosen.anchor_date)?;
    enforce_first_independent(&mut work);
    realign_in_place(&mut work);
    Ok(ChangeSet::between(list, &work))
}

/// Removes a task from its linked group and realigns.
///
/// The task keeps its own dependency flag; a group left with one member is
/// dissolved.
pub fn plan_unlink(list: &TaskList, id: TaskId) -> Result<ChangeSet, PlanError> {
    let mut work = list.clone();
    detach(&mut work, id, false)?;
    enforce_first_independent(&mut work);
    realign_in_place(&mut work);
    Ok(ChangeSet::between(list, &work))
}
