use orrery_common::{Chance, SpawnerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors from universe mutation operations.
///
/// Every variant names the region and enough context to render a useful
/// diagnostic without further lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("region '{0}' not found")]
    RegionNotFound(String),
    #[error("site '{site}' is already present in region '{region}'")]
    SiteAlreadyPresent { region: String, site: String },
    #[error("site '{site}' is not present in region '{region}'")]
    SiteMissing { region: String, site: String },
    #[error("spawner entry ({chance}) is already present in region '{region}'")]
    SpawnerAlreadyPresent { region: String, chance: Chance },
    #[error("spawner entry ({chance}) is not present in region '{region}'")]
    SpawnerMissing { region: String, chance: Chance },
}

/// One population spawner attached to a region, with its trigger chance.
///
/// Entries are keyed by the full (spawner, chance) pair: the same spawner may
/// appear several times at different chances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerEntry {
    pub spawner: SpawnerId,
    pub chance: Chance,
}

/// A named world location container: an ordered list of member sites plus a
/// population spawner table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    name: String,
    sites: Vec<String>,
    spawners: Vec<SpawnerEntry>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sites: Vec::new(),
            spawners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn spawners(&self) -> &[SpawnerEntry] {
        &self.spawners
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    pub fn has_spawner(&self, entry: SpawnerEntry) -> bool {
        self.spawners.contains(&entry)
    }

    /// Add a member site. Fails if a site of that name is already present.
    pub fn add_site(&mut self, site: &str) -> Result<(), UniverseError> {
        if self.has_site(site) {
            return Err(UniverseError::SiteAlreadyPresent {
                region: self.name.clone(),
                site: site.to_string(),
            });
        }
        self.sites.push(site.to_string());
        Ok(())
    }

    /// Remove a member site. Fails if no site of that name is present.
    pub fn remove_site(&mut self, site: &str) -> Result<(), UniverseError> {
        let Some(idx) = self.sites.iter().position(|s| s == site) else {
            return Err(UniverseError::SiteMissing {
                region: self.name.clone(),
                site: site.to_string(),
            });
        };
        self.sites.remove(idx);
        Ok(())
    }

    /// Attach a spawner entry. Fails if the exact (spawner, chance) pair is
    /// already attached.
    pub fn add_spawner(&mut self, entry: SpawnerEntry) -> Result<(), UniverseError> {
        if self.has_spawner(entry) {
            return Err(UniverseError::SpawnerAlreadyPresent {
                region: self.name.clone(),
                chance: entry.chance,
            });
        }
        self.spawners.push(entry);
        Ok(())
    }

    /// Detach a spawner entry. Fails if the exact pair is not attached.
    pub fn remove_spawner(&mut self, entry: SpawnerEntry) -> Result<(), UniverseError> {
        let Some(idx) = self.spawners.iter().position(|e| *e == entry) else {
            return Err(UniverseError::SpawnerMissing {
                region: self.name.clone(),
                chance: entry.chance,
            });
        };
        self.spawners.remove(idx);
        Ok(())
    }
}

/// The authoritative universe: regions looked up by name.
///
/// The patch engine borrows this mutably per operation; it never owns it.
/// Uses BTreeMap for deterministic iteration order across platforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    regions: BTreeMap<String, Region>,
}

impl Universe {
    /// Create an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a region, replacing any previous region of the same name.
    pub fn insert_region(&mut self, region: Region) {
        self.regions.insert(region.name().to_string(), region);
    }

    /// Look up a region by name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    /// Look up a region by name for mutation.
    pub fn region_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.regions.get_mut(name)
    }

    /// Number of regions in the universe.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Iterate all regions in name order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }
}
