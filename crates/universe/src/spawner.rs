use orrery_common::SpawnerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A population spawner definition from content data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerDef {
    pub id: SpawnerId,
    pub name: String,
}

/// Name-to-spawner lookup for the content-defined spawner pool.
///
/// Catalog entries reference spawners by name; the rest of the engine holds
/// only `SpawnerId` handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnerRegistry {
    spawners: BTreeMap<String, SpawnerDef>,
}

impl SpawnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spawner under a name, returning its handle. Re-registering
    /// a name returns the existing handle.
    pub fn register(&mut self, name: impl Into<String>) -> SpawnerId {
        let name = name.into();
        if let Some(def) = self.spawners.get(&name) {
            return def.id;
        }
        let id = SpawnerId::new();
        self.spawners.insert(name.clone(), SpawnerDef { id, name });
        id
    }

    /// Look up a spawner definition by name.
    pub fn get(&self, name: &str) -> Option<&SpawnerDef> {
        self.spawners.get(name)
    }

    /// Reverse lookup: the name a handle was registered under.
    pub fn name_of(&self, id: SpawnerId) -> Option<&str> {
        self.spawners
            .values()
            .find(|def| def.id == id)
            .map(|def| def.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.spawners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawners.is_empty()
    }
}
