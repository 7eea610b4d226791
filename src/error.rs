//! Error types.
//!
//! Planners report failures as values and never leave a half-applied
//! snapshot behind: on error the caller's list is untouched.

use thiserror::Error;

use crate::models::{OrderKey, TaskId};

/// Order key allocation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderKeyError {
    /// No two-decimal key fits strictly between the neighbours.
    #[error("no order key left between {prev} and {next}; renumber the location")]
    Exhausted { prev: OrderKey, next: OrderKey },

    /// Neighbours are not in ascending order.
    #[error("order keys out of sequence: {prev} is not below {next}")]
    OutOfSequence { prev: OrderKey, next: OrderKey },

    /// Key arithmetic left the representable range.
    #[error("order key overflow")]
    Overflow,
}

/// Planner failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("task already exists: {0}")]
    DuplicateTask(TaskId),

    #[error("task {0} needs an explicit date")]
    MissingTaskDate(TaskId),

    #[error("cannot place a task before completed task {completed}")]
    BeforeCompletedTask { completed: TaskId },

    #[error("link target set is empty")]
    EmptyLinkTargets,

    #[error("linking needs at least two tasks")]
    TooFewLinkTargets,

    #[error("every link target is complete")]
    AllTargetsComplete,

    #[error("link slot {index} out of range ({available} available)")]
    SlotOutOfRange { index: usize, available: usize },

    #[error("task {0} is not in a linked group")]
    NotLinked(TaskId),

    #[error("the first task cannot depend on a previous task")]
    FirstTaskDependent,

    #[error("cannot move task {0} relative to itself")]
    SelfReference(TaskId),

    #[error(transparent)]
    OrderKey(#[from] OrderKeyError),
}

/// Persistence collaborator failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("location not found: {0}")]
    LocationNotFound(u64),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("store conflict: {0}")]
    Conflict(String),

    #[error("store internal error: {0}")]
    Internal(String),
}

/// Crate-level error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

impl From<OrderKeyError> for Error {
    fn from(err: OrderKeyError) -> Self {
        Error::Plan(PlanError::OrderKey(err))
    }
}

/// Result alias for store-backed operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = PlanError::from(OrderKeyError::Exhausted {
            prev: OrderKey::from_hundredths(100),
            next: OrderKey::from_hundredths(101),
        });
        assert_eq!(
            err.to_string(),
            "no order key left between 1.00 and 1.01; renumber the location"
        );
        assert_eq!(
            Error::from(PlanError::TaskNotFound(TaskId(4))).to_string(),
            "planning failed: task not found: 4"
        );
    }

    #[test]
    fn test_order_key_error_lifts_to_crate_error() {
        let err: Error = OrderKeyError::Overflow.into();
        assert!(matches!(err, Error::Plan(PlanError::OrderKey(OrderKeyError::Overflow))));
    }
}
