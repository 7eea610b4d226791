//! Invariant checks for a location's task list.
//!
//! Detects:
//! - Duplicate task IDs
//! - Tasks sharing an order key
//! - A dependent first task
//! - Linked groups whose members disagree on the date
//! - Linked groups with a single member
//! - Dependent dates that a realignment pass would change
//!
//! Planners keep all of these true; the checker exists for data loaded from
//! elsewhere and for tests.

use std::collections::HashSet;

use crate::engine::realign;
use crate::models::{Task, TaskList};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// Two tasks share the same order key.
    DuplicateOrder,
    /// The first task depends on a previous one.
    DependentFirstTask,
    /// Members of a linked group are on different dates.
    GroupDateMismatch,
    /// A linked group has only one member.
    SingletonGroup,
    /// A dependent task is not on the working day after its predecessor.
    DateMisaligned,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a location's task list.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(list: &TaskList) -> ValidationResult {
    let tasks = list.tasks();
    let mut errors = Vec::new();

    check_identity(tasks, &mut errors);

    if let Some(first) = tasks.first() {
        if first.dependent_on_previous {
            errors.push(ValidationError::new(
                ValidationErrorKind::DependentFirstTask,
                format!("First task {} is dependent on a previous task", first.id),
            ));
        }
    }

    for (group, members) in list.groups().iter() {
        if members.len() == 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::SingletonGroup,
                format!("Group {group} has a single member {}", members[0]),
            ));
        }
        let dates: HashSet<_> = members
            .iter()
            .filter_map(|id| list.get(*id))
            .map(|t| t.task_date)
            .collect();
        if dates.len() > 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::GroupDateMismatch,
                format!("Group {group} spans {} different dates", dates.len()),
            ));
        }
    }

    let realigned = realign(list);
    for task in realigned.changed_tasks() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DateMisaligned,
            format!("Task {} should be on {}", task.id, task.task_date),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_identity(tasks: &[Task], errors: &mut Vec<ValidationError>) {
    let mut ids = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    // Tasks are sorted, so equal keys are adjacent
    for pair in tasks.windows(2) {
        if pair[0].order == pair[1].order {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateOrder,
                format!(
                    "Tasks {} and {} share order {}",
                    pair[0].id, pair[1].id, pair[0].order
                ),
            ));
        }
    }
}
