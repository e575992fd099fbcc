//! Skip List Module
//!
//! The ordered in-memory index behind the store.
//!
//! ## Responsibilities
//! - Keep entries ordered by key on level 0
//! - Maintain express lanes on levels 1..=top_level
//! - Draw entry heights from a geometric distribution
//! - Ordered iteration for snapshots
//!
//! ## Layout
//! ```text
//! level 3  head ---------------------------------> 50 -----------------> None
//! level 2  head -----------> 10 ----------------> 50 ---------> 70 ----> None
//! level 1  head -----------> 10 ------> 30 -----> 50 ---------> 70 ----> None
//! level 0  head --> 1 --> 4 --> 10 ---> 30 --> 40 -> 50 -> 60 -> 70 ----> None
//! ```
//!
//! Entries live in an arena owned by the list. Links are slot indices, so the
//! list is the single owner of every entry and dropping it frees them all.

mod entry;
mod iter;
mod level;
mod list;

pub use entry::{Entry, Link};
pub use iter::{Iter, LevelIter};
pub use level::LevelGenerator;
pub use list::SkipList;

/// Result of an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was absent and a new entry was linked in
    Inserted,

    /// The key was already present; nothing changed
    AlreadyExists,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The key was present and its entry was unlinked and dropped
    Deleted,

    /// The key was absent; nothing changed
    NotFound,
}
