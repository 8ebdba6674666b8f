//! Canonical diff catalog reader.
//!
//! The catalog is the externally maintained source of truth for diff
//! definitions. Diffs are persisted by name only, so the catalog is re-read
//! whenever a diff is applied or a session is restored.
//!
//! Parsing is deliberately tolerant: a structurally sound catalog with
//! malformed entries loads, warns, and leaves the interpretation of raw verb
//! and chance values to the patch loader. Only a missing or empty root is a
//! hard error, which aborts the one call that needed the catalog.

use serde_json::Value;
use std::path::Path;

/// Errors from reading the catalog document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed catalog: {0}")]
    Malformed(String),
}

/// The entity a single action operates on, as written in the catalog.
///
/// Verb and chance are kept raw: the loader decides what an unknown verb or
/// an out-of-range chance means, not the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionBody {
    /// A member site, referenced by name.
    Site { name: String },
    /// A population spawner, referenced by name, with a raw chance value.
    Spawner { name: String, chance: i64 },
}

/// One action node: a raw verb (`"add"` / `"remove"` when well-formed) plus
/// the entity it operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDef {
    pub verb: String,
    pub body: ActionBody,
}

/// All actions a diff declares against one region, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPatchDef {
    pub region: String,
    pub actions: Vec<ActionDef>,
}

/// A named diff definition: region patch groups in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffDef {
    pub name: String,
    pub regions: Vec<RegionPatchDef>,
}

impl DiffDef {
    /// Total number of actions across all region groups.
    pub fn action_count(&self) -> usize {
        self.regions.iter().map(|r| r.actions.len()).sum()
    }
}

/// An in-memory catalog of diff definitions, looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffCatalog {
    diffs: Vec<DiffDef>,
}

impl DiffCatalog {
    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&data)
    }

    /// Parse a catalog from JSON text.
    pub fn parse(data: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(&value)
    }

    /// Build a catalog from a parsed JSON document.
    ///
    /// The root object must carry a non-empty `unidiffs` array; anything else
    /// is `Malformed`. Individual entries missing a name are warned about and
    /// skipped rather than failing the whole document.
    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        let Some(entries) = value.get("unidiffs").and_then(|v| v.as_array()) else {
            return Err(CatalogError::Malformed(
                "missing root element 'unidiffs'".into(),
            ));
        };
        if entries.is_empty() {
            return Err(CatalogError::Malformed(
                "catalog does not contain any diffs".into(),
            ));
        }

        let mut diffs = Vec::new();
        for entry in entries {
            let Some(name) = entry.get("name").and_then(|n| n.as_str()) else {
                tracing::warn!("catalog has a diff entry without a name, skipping");
                continue;
            };
            diffs.push(DiffDef {
                name: name.to_string(),
                regions: parse_regions(name, entry),
            });
        }
        Ok(Self { diffs })
    }

    /// Find a diff definition by name.
    pub fn get(&self, name: &str) -> Option<&DiffDef> {
        self.diffs.iter().find(|d| d.name == name)
    }

    /// All diff names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.diffs.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

fn parse_regions(diff: &str, entry: &Value) -> Vec<RegionPatchDef> {
    let Some(regions) = entry.get("regions").and_then(|r| r.as_array()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for region in regions {
        let Some(region_name) = region.get("name").and_then(|n| n.as_str()) else {
            tracing::warn!(diff, "diff has a region entry without a name, skipping");
            continue;
        };
        let mut actions = Vec::new();
        if let Some(sites) = region.get("sites").and_then(|s| s.as_array()) {
            for site in sites {
                let Some(name) = site.get("name").and_then(|n| n.as_str()) else {
                    tracing::warn!(
                        diff,
                        region = region_name,
                        "site entry without a name, skipping"
                    );
                    continue;
                };
                actions.push(ActionDef {
                    verb: raw_verb(site),
                    body: ActionBody::Site {
                        name: name.to_string(),
                    },
                });
            }
        }
        if let Some(spawners) = region.get("spawners").and_then(|s| s.as_array()) {
            for spawner in spawners {
                let Some(name) = spawner.get("name").and_then(|n| n.as_str()) else {
                    tracing::warn!(
                        diff,
                        region = region_name,
                        "spawner entry without a name, skipping"
                    );
                    continue;
                };
                // Malformed chance values degrade to 0, mirroring a lenient
                // integer parse. The loader clamps into 0..=100.
                let chance = spawner.get("chance").and_then(|c| c.as_i64()).unwrap_or(0);
                actions.push(ActionDef {
                    verb: raw_verb(spawner),
                    body: ActionBody::Spawner {
                        name: name.to_string(),
                        chance,
                    },
                });
            }
        }
        out.push(RegionPatchDef {
            region: region_name.to_string(),
            actions,
        });
    }
    out
}

fn raw_verb(node: &Value) -> String {
    node.get("op")
        .and_then(|o| o.as_str())
        .unwrap_or_default()
        .to_string()
}
