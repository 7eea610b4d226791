//! Link slot enumeration.
//!
//! Before a task is linked to existing tasks, the targets are collapsed
//! into slots describing where they currently sit. The caller picks one;
//! its date becomes the anchor of the linked group.
//!
//! # Collapsing rules (targets scanned in task order)
//!
//! 1. Targets already in a linked group form one `LinkedGroup` slot.
//! 2. A run of adjacent dependent targets forms one `SequentialGroup` slot.
//! 3. An independent target, not first in the location, followed directly
//!    by exactly one dependent target forms a `SpecialUnsequentialPair`.
//! 4. Anything else is its own `Sequential` or `Unsequential` slot.
//!
//! "Adjacent" and "directly" refer to positions in the location.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::expand_all;
use crate::error::PlanError;
use crate::models::{Task, TaskId, TaskList};

/// Shape of a link slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Members of an existing linked group.
    LinkedGroup,
    /// Two or more adjacent dependent tasks.
    SequentialGroup,
    /// An independent task and the single dependent task right after it.
    SpecialUnsequentialPair,
    /// One dependent task.
    Sequential,
    /// One independent task.
    Unsequential,
}

/// A candidate anchor for linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSlot {
    /// Slot shape.
    pub kind: SlotKind,
    /// Targets covered by the slot, in task order.
    pub tasks: Vec<TaskId>,
    /// Date the linked group takes if this slot is chosen.
    pub anchor_date: NaiveDate,
}

impl LinkSlot {
    fn new(kind: SlotKind, tasks: Vec<TaskId>, anchor_date: NaiveDate) -> Self {
        Self {
            kind,
            tasks,
            anchor_date,
        }
    }
}

/// Enumerates the slots for linking to `targets`.
///
/// Targets are expanded to whole groups first, so a group is never split.
pub fn link_slots(list: &TaskList, targets: &[TaskId]) -> Result<Vec<LinkSlot>, PlanError> {
    if targets.is_empty() {
        return Err(PlanError::EmptyLinkTargets);
    }
    let ordered = expand_all(list, targets)?;
    let tasks: Vec<&Task> = ordered.iter().filter_map(|id| list.get(*id)).collect();
    if tasks.iter().all(|t| t.is_complete()) {
        return Err(PlanError::AllTargetsComplete);
    }

    let groups = list.groups();
    let adjacent = |a: &Task, b: &Task| match (list.position(a.id), list.position(b.id)) {
        (Some(pa), Some(pb)) => pb == pa + 1,
        _ => false,
    };
    let free_dependent = |t: &Task| t.dependent_on_previous && !t.is_linked();

    let mut slots = Vec::new();
    let mut consumed: HashSet<TaskId> = HashSet::new();
    let mut i = 0;

    while i < tasks.len() {
        let task = tasks[i];
        if consumed.contains(&task.id) {
            i += 1;
            continue;
        }

        if let Some(group) = task.linked_task_group {
            let members = groups.members(group).to_vec();
            consumed.extend(members.iter().copied());
            slots.push(LinkSlot::new(SlotKind::LinkedGroup, members, task.task_date));
            i += 1;
            continue;
        }

        if task.dependent_on_previous {
            let mut end = i;
            while end + 1 < tasks.len()
                && free_dependent(tasks[end + 1])
                && adjacent(tasks[end], tasks[end + 1])
            {
                end += 1;
            }
            let run: Vec<TaskId> = tasks[i..=end].iter().map(|t| t.id).collect();
            let kind = if run.len() > 1 {
                SlotKind::SequentialGroup
            } else {
                SlotKind::Sequential
            };
            slots.push(LinkSlot::new(kind, run, task.task_date));
            i = end + 1;
            continue;
        }

        let pair_partner = tasks.get(i + 1).copied().filter(|&next| {
            list.position(task.id) != Some(0)
                && free_dependent(next)
                && adjacent(task, next)
                && !tasks
                    .get(i + 2)
                    .is_some_and(|&after| free_dependent(after) && adjacent(next, after))
        });
        match pair_partner {
            Some(next) => {
                slots.push(LinkSlot::new(
                    SlotKind::SpecialUnsequentialPair,
                    vec![task.id, next.id],
                    task.task_date,
                ));
                i += 2;
            }
            None => {
                slots.push(LinkSlot::new(
                    SlotKind::Unsequential,
                    vec![task.id],
                    task.task_date,
                ));
                i += 1;
            }
        }
    }

    Ok(slots)
}
