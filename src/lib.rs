//! Task sequencing for construction job sites.
//!
//! Keeps an ordered sequence of tasks per location and maintains its
//! invariants as tasks are inserted, deleted, linked, moved and edited:
//! order keys stay strictly increasing, dependent tasks sit on the working
//! day after their predecessor, and linked tasks share one date.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `OrderKey`, `TaskList`, `LinkedGroups`,
//!   `ChangeSet`, working-day calendar
//! - **`engine`**: Order key allocation, date realignment, group linking
//! - **`planner`**: Pure planners turning an intent into a `ChangeSet`
//! - **`validation`**: Invariant checks over a task list
//! - **`store`**: Storage collaborator and per-location serialization
//! - **`config`**: Planner configuration
//!
//! # Architecture
//!
//! Planners never perform I/O. They read a snapshot, plan on a private copy
//! and return the delta; `store::LocationScheduler` runs read, plan and
//! apply as one serialized transaction per location.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod planner;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
