use crate::resolve::resolve;
use orrery_common::{Chance, SpawnerId};
use orrery_universe::{SpawnerEntry, Universe, UniverseError};

/// Symbolic target of a hunk, resolved to a live region at apply time.
///
/// Only named regions exist today; the enum leaves room for other target
/// kinds without touching the apply path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkTarget {
    Region(String),
}

impl HunkTarget {
    /// The region name this target refers to.
    pub fn region_name(&self) -> &str {
        match self {
            Self::Region(name) => name,
        }
    }
}

/// One atomic, invertible mutation.
///
/// The operation and its payload are a single sum type, so a payload can
/// never disagree with its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkOp {
    /// Add a member site to the target region. Inverse of `SiteRemove`.
    SiteAdd { site: String },
    /// Remove a member site from the target region. Inverse of `SiteAdd`.
    SiteRemove { site: String },
    /// Attach a spawner entry to the target region. Inverse of `SpawnerRemove`.
    SpawnerAdd { spawner: SpawnerId, chance: Chance },
    /// Detach a spawner entry from the target region. Inverse of `SpawnerAdd`.
    SpawnerRemove { spawner: SpawnerId, chance: Chance },
}

impl HunkOp {
    /// The inverse operation. Add and remove pair up as a closed involution:
    /// `op.inverse().inverse() == op`.
    pub fn inverse(&self) -> Self {
        match self {
            Self::SiteAdd { site } => Self::SiteRemove { site: site.clone() },
            Self::SiteRemove { site } => Self::SiteAdd { site: site.clone() },
            Self::SpawnerAdd { spawner, chance } => Self::SpawnerRemove {
                spawner: *spawner,
                chance: *chance,
            },
            Self::SpawnerRemove { spawner, chance } => Self::SpawnerAdd {
                spawner: *spawner,
                chance: *chance,
            },
        }
    }
}

/// Errors from building or applying a single hunk.
///
/// These are per-hunk soft failures: they land in a diff record's failed
/// journal and never abort the rest of the diff.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    World(#[from] UniverseError),
    #[error("unknown action verb '{0}'")]
    UnknownVerb(String),
    #[error("unknown spawner '{0}'")]
    UnknownSpawner(String),
}

/// A single hunk: target plus operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub target: HunkTarget,
    pub op: HunkOp,
}

impl Hunk {
    pub fn new(target: HunkTarget, op: HunkOp) -> Self {
        Self { target, op }
    }

    /// Apply this hunk to the universe.
    ///
    /// Resolves the target, then performs one atomic mutation. On any
    /// failure the universe is left untouched.
    pub fn apply(&self, universe: &mut Universe) -> Result<(), ApplyError> {
        let region = resolve(universe, &self.target)?;
        match &self.op {
            HunkOp::SiteAdd { site } => region.add_site(site)?,
            HunkOp::SiteRemove { site } => region.remove_site(site)?,
            HunkOp::SpawnerAdd { spawner, chance } => region.add_spawner(SpawnerEntry {
                spawner: *spawner,
                chance: *chance,
            })?,
            HunkOp::SpawnerRemove { spawner, chance } => region.remove_spawner(SpawnerEntry {
                spawner: *spawner,
                chance: *chance,
            })?,
        }
        Ok(())
    }

    /// A new hunk that undoes this one. The inverse owns its own copies of
    /// the target and payload strings.
    pub fn inverse(&self) -> Hunk {
        Hunk {
            target: self.target.clone(),
            op: self.op.inverse(),
        }
    }
}
