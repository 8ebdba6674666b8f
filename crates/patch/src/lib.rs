//! Reversible patch-stack engine for the orrery universe.
//!
//! Named diffs mutate universe regions through ordered, invertible hunks.
//! Applied diffs are tracked on a stack and can be reverted in reverse
//! application order, restoring the pre-diff world state.
//!
//! # Invariants
//! - A hunk either mutates its target region or has no effect.
//! - A diff record's applied journal holds only hunks confirmed to have
//!   mutated the world, in apply order.
//! - Diff names are unique across the stack; re-applying is a no-op.
//! - Per-hunk failures are journal data, never call-level errors.

pub mod hunk;
pub mod loader;
pub mod record;
pub mod resolve;
pub mod stack;

pub use hunk::{ApplyError, Hunk, HunkOp, HunkTarget};
pub use record::{DiffRecord, FailedHunk};
pub use stack::{DiffError, DiffStack};
