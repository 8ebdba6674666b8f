//! Shared identifier and value types used across the orrery workspace.

pub mod types;

pub use types::{Chance, SpawnerId};
