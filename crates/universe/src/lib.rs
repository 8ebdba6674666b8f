//! Universe registry: authoritative world state for the patch engine.
//!
//! # Invariants
//! - All state mutations flow through explicit operations that either
//!   succeed completely or leave the region untouched.
//! - Region lookup is by name; iteration order is deterministic (BTreeMap).

pub mod spawner;
pub mod universe;

pub use spawner::{SpawnerDef, SpawnerRegistry};
pub use universe::{Region, SpawnerEntry, Universe, UniverseError};
