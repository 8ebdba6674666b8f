use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a population spawner definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnerId(pub Uuid);

impl SpawnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpawnerId {
    fn default() -> Self {
        Self::new()
    }
}

/// A percentage chance, always within 0..=100.
///
/// Content data carries chances as free-form integers; `clamped` folds any
/// out-of-range or nonsensical value into the valid range instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Chance(u8);

impl Chance {
    /// Build from a trusted in-range value. Values above 100 saturate.
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// Build from an untrusted integer, clamping into 0..=100.
    pub fn clamped(percent: i64) -> Self {
        Self(percent.clamp(0, 100) as u8)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Chance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
