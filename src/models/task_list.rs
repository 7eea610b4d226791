//! Ordered snapshot of one location's tasks.
//!
//! Tasks are held in an arena sorted by `(order, id)` with an id → index
//! map, so planners address tasks by id and never by a position captured
//! before a mutation.

use std::collections::HashMap;

use super::{GroupId, LinkedGroups, OrderKey, Task, TaskId};

/// All tasks of a location, sorted by order key ascending.
///
/// Ties on `order` are broken by id; they do not occur in a valid list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl TaskList {
    /// Builds a snapshot from tasks in any order.
    pub fn new(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        let mut list = Self {
            tasks,
            index: HashMap::new(),
        };
        list.reindex();
        list
    }

    /// Creates an empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the location has no tasks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterates tasks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Looks up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).map(|&i| &self.tasks[i])
    }

    /// Whether a task with this id exists.
    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Zero-based position of a task.
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Task at a position.
    pub fn at(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    /// First task.
    pub fn first(&self) -> Option<&Task> {
        self.tasks.first()
    }

    /// Last task.
    pub fn last(&self) -> Option<&Task> {
        self.tasks.last()
    }

    /// Position of the most recently completed task, scanning from the end.
    pub fn last_completed_position(&self) -> Option<usize> {
        self.tasks.iter().rposition(Task::is_complete)
    }

    /// Whether any task is complete.
    pub fn any_complete(&self) -> bool {
        self.last_completed_position().is_some()
    }

    /// Order key of the task right after `id`, if any.
    pub fn next_order_after(&self, id: TaskId) -> Option<OrderKey> {
        self.position(id)
            .and_then(|p| self.tasks.get(p + 1))
            .map(|t| t.order)
    }

    /// Builds the linked group index.
    pub fn groups(&self) -> LinkedGroups {
        LinkedGroups::from_tasks(&self.tasks)
    }

    /// A group id not used by any task in this list.
    pub fn next_group_id(&self) -> GroupId {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| t.linked_task_group)
            .map(|g| g.0)
            .max()
            .unwrap_or(0);
        GroupId(max + 1)
    }

    /// Consumes the list, returning tasks in order.
    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        let i = *self.index.get(&id)?;
        Some(&mut self.tasks[i])
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Task> {
        self.tasks.iter_mut()
    }

    /// Inserts a task at the position given by its order key.
    pub(crate) fn insert(&mut self, task: Task) {
        let at = self
            .tasks
            .partition_point(|t| (t.order, t.id) < (task.order, task.id));
        self.tasks.insert(at, task);
        self.reindex();
    }

    /// Removes a task, keeping the rest in order.
    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let i = self.index.get(&id).copied()?;
        let task = self.tasks.remove(i);
        self.reindex();
        Some(task)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, task) in self.tasks.iter().enumerate() {
            self.index.insert(task.id, i);
        }
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use chrono::NaiveDate;

    fn task(id: u64, order: i64) -> Task {
        Task::new(id, OrderKey::from_units(order), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    #[test]
    fn test_sorted_on_build() {
        let list = TaskList::new(vec![task(3, 3), task(1, 1), task(2, 2)]);
        let ids: Vec<u64> = list.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(list.position(TaskId(3)), Some(2));
        assert_eq!(list.first().map(|t| t.id), Some(TaskId(1)));
    }

    #[test]
    fn test_ties_broken_by_id() {
        let list = TaskList::new(vec![task(9, 1), task(4, 1)]);
        assert_eq!(list.at(0).map(|t| t.id), Some(TaskId(4)));
    }

    #[test]
    fn test_insert_remove() {
        let mut list = TaskList::new(vec![task(1, 1), task(2, 2)]);
        list.insert(Task::new(
            3,
            OrderKey::from_hundredths(150),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        ));
        assert_eq!(list.position(TaskId(3)), Some(1));
        assert_eq!(list.next_order_after(TaskId(1)), Some(OrderKey::from_hundredths(150)));

        assert!(list.remove(TaskId(3)).is_some());
        assert_eq!(list.len(), 2);
        assert_eq!(list.position(TaskId(2)), Some(1));
        assert_eq!(list.next_order_after(TaskId(1)), Some(OrderKey::from_units(2)));
        assert!(list.remove(TaskId(3)).is_none());
    }

    #[test]
    fn test_last_completed_position() {
        let list = TaskList::new(vec![
            task(1, 1).with_status(TaskStatus::Complete),
            task(2, 2).with_status(TaskStatus::Complete),
            task(3, 3),
        ]);
        assert_eq!(list.last_completed_position(), Some(1));
        assert!(TaskList::new(vec![task(1, 1)]).last_completed_position().is_none());
    }

    #[test]
    fn test_next_group_id() {
        let list = TaskList::new(vec![
            task(1, 1).with_group(GroupId(4)),
            task(2, 2).with_group(GroupId(4)),
        ]);
        assert_eq!(list.next_group_id(), GroupId(5));
        assert_eq!(TaskList::empty().next_group_id(), GroupId(1));
    }
}
