//! Linked group index.
//!
//! Groups are stored on tasks as a shared tag; this index turns the tag into
//! an explicit group → members map so membership and selection closure are
//! single lookups.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{GroupId, Task, TaskId};

/// Group membership for one location.
///
/// Members of each group are listed in task order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedGroups {
    members: BTreeMap<GroupId, Vec<TaskId>>,
    by_task: HashMap<TaskId, GroupId>,
}

impl LinkedGroups {
    /// Indexes the groups of an ordered task slice.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut groups = Self::default();
        for task in tasks {
            if let Some(group) = task.linked_task_group {
                groups.members.entry(group).or_default().push(task.id);
                groups.by_task.insert(task.id, group);
            }
        }
        groups
    }

    /// Group a task belongs to.
    pub fn group_of(&self, id: TaskId) -> Option<GroupId> {
        self.by_task.get(&id).copied()
    }

    /// Members of a group in task order.
    pub fn members(&self, group: GroupId) -> &[TaskId] {
        self.members.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Members of the group `id` belongs to, or `None` if ungrouped.
    pub fn peers(&self, id: TaskId) -> Option<&[TaskId]> {
        self.group_of(id).map(|g| self.members(g))
    }

    /// Last member (by order) of the group containing `id`.
    pub fn last_member(&self, id: TaskId) -> Option<TaskId> {
        self.peers(id).and_then(|m| m.last().copied())
    }

    /// Expands a selection so that every touched group is fully included.
    pub fn closure(&self, ids: &[TaskId]) -> BTreeSet<TaskId> {
        let mut out = BTreeSet::new();
        for &id in ids {
            match self.peers(id) {
                Some(members) => out.extend(members.iter().copied()),
                None => {
                    out.insert(id);
                }
            }
        }
        out
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates `(group, members)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[TaskId])> {
        self.members.iter().map(|(g, m)| (*g, m.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderKey;
    use chrono::NaiveDate;

    fn task(id: u64, group: Option<u64>) -> Task {
        let t = Task::new(
            id,
            OrderKey::from_units(id as i64),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        );
        match group {
            Some(g) => t.with_group(GroupId(g)),
            None => t,
        }
    }

    #[test]
    fn test_membership() {
        let tasks = vec![task(1, None), task(2, Some(7)), task(3, None), task(4, Some(7))];
        let groups = LinkedGroups::from_tasks(&tasks);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.group_of(TaskId(2)), Some(GroupId(7)));
        assert_eq!(groups.group_of(TaskId(1)), None);
        assert_eq!(groups.members(GroupId(7)), &[TaskId(2), TaskId(4)]);
        assert_eq!(groups.last_member(TaskId(2)), Some(TaskId(4)));
        assert!(groups.members(GroupId(99)).is_empty());
    }

    #[test]
    fn test_closure_pulls_whole_group() {
        let tasks = vec![task(1, None), task(2, Some(1)), task(3, Some(1))];
        let groups = LinkedGroups::from_tasks(&tasks);

        let expanded: Vec<TaskId> = groups.closure(&[TaskId(1), TaskId(3)]).into_iter().collect();
        assert_eq!(expanded, vec![TaskId(1), TaskId(2), TaskId(3)]);
    }
}
