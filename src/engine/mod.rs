//! Sequencing engine.
//!
//! The three building blocks the planners compose:
//!
//! - **Order keys** ([`allocate`], [`renumber`]): fractional keys for
//!   inserting between neighbours, with an explicit exhaustion failure.
//! - **Realignment** ([`realign`]): one pass that recomputes dependent
//!   dates from the preceding scheduling unit, skipping weekends.
//! - **Linked groups** ([`link`], [`unlink`], [`expand_selection`]): keep
//!   same-day tasks on one shared date.
//!
//! Every function here works on a [`TaskList`](crate::models::TaskList)
//! value; nothing performs I/O.

mod linking;
mod order;
mod realign;

pub use linking::{expand_all, expand_selection, link, unlink};
pub use order::{allocate, renumber};
pub use realign::{realign, Realignment};

pub(crate) use linking::detach;
pub(crate) use realign::{enforce_first_independent, realign_in_place};
