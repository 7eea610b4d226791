//! Sequencing domain models.
//!
//! Provides the data types shared by the engine and the planners: tasks,
//! order keys, the working-day calendar, the ordered per-location snapshot,
//! the linked group index, and the persistence delta.
//!
//! # Domain Mappings
//!
//! | u-sequence | Construction site | Meaning |
//! |------------|-------------------|---------|
//! | Task | Scope item | One day of work in a location |
//! | TaskList | Location schedule | All tasks of one location, ordered |
//! | LinkedGroups | Same-day crews | Tasks forced onto one date |
//! | ChangeSet | Save batch | Records to write atomically |

mod calendar;
mod change;
mod group;
mod order_key;
mod task;
mod task_list;

pub use calendar::{following_workday, is_workday, next_workday};
pub use change::ChangeSet;
pub use group::LinkedGroups;
pub use order_key::{OrderKey, ParseOrderKeyError};
pub use task::{GroupId, Task, TaskDraft, TaskId, TaskState, TaskStatus};
pub use task_list::TaskList;
