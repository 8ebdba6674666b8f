//! Session persistence for the patch engine.
//!
//! Only diff *identity* is persisted: an ordered list of active diff names.
//! Hunk contents are never serialized; restore re-derives them from the
//! canonical catalog. If the catalog changed between save and load, the
//! restored world follows the current catalog — an accepted limitation, not
//! corruption.

use orrery_catalog::DiffCatalog;
use orrery_patch::DiffStack;
use orrery_universe::{SpawnerRegistry, Universe};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current session file schema version.
const SESSION_SCHEMA_VERSION: u32 = 1;

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
}

/// The persistent identity of a diff stack: active names in stack order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub schema_version: u32,
    pub diffs: Vec<String>,
}

impl SessionState {
    /// Capture the active diff names from a stack.
    pub fn capture(stack: &DiffStack) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            diffs: stack.active_names(),
        }
    }

    /// Rebuild a stack from saved names.
    ///
    /// Clears the stack first (reverting anything active), then re-applies
    /// each saved name in order, re-deriving content from the catalog. A
    /// saved name the catalog no longer knows is logged and skipped.
    pub fn restore(
        &self,
        stack: &mut DiffStack,
        universe: &mut Universe,
        spawners: &SpawnerRegistry,
        catalog: &DiffCatalog,
    ) {
        stack.clear(universe);
        for name in &self.diffs {
            if let Err(error) = stack.apply(universe, spawners, catalog, name) {
                tracing::warn!(diff = %name, %error, "skipping saved diff that failed to re-apply");
            }
        }
    }
}

/// File-backed session store with a fail-closed schema check on load.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// A store backed by the given session file path.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the session state as pretty JSON.
    pub fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let file = std::fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, state)?;
        Ok(())
    }

    /// Read and validate a session state.
    pub fn load(&self) -> Result<SessionState, StoreError> {
        let file = std::fs::File::open(&self.path)?;
        let state: SessionState = serde_json::from_reader(file)?;
        if state.schema_version != SESSION_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: state.schema_version,
                expected_version: SESSION_SCHEMA_VERSION,
            });
        }
        Ok(state)
    }
}
