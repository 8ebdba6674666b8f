use crate::loader;
use crate::record::DiffRecord;
use orrery_catalog::DiffCatalog;
use orrery_universe::{SpawnerRegistry, Universe};

/// Call-level errors from stack operations.
///
/// Per-hunk failures never surface here; they live in the diff record's
/// failed journal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("diff '{0}' not found in catalog")]
    NotInCatalog(String),
}

/// The ordered collection of currently-applied diffs.
///
/// Insertion order is application order, which is also the safe reversal
/// order. The stack is owned by the session and passed by reference to every
/// operation; it holds no global state.
#[derive(Debug, Clone, Default)]
pub struct DiffStack {
    stack: Vec<DiffRecord>,
}

impl DiffStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active diffs.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether a diff of this name is currently applied. Linear scan.
    pub fn is_applied(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up an active diff record by name.
    pub fn get(&self, name: &str) -> Option<&DiffRecord> {
        self.stack.iter().find(|d| d.name() == name)
    }

    /// Active diff names, in application order. This is the full persistent
    /// identity of the stack: hunk contents are re-derived from the catalog.
    pub fn active_names(&self) -> Vec<String> {
        self.stack.iter().map(|d| d.name().to_string()).collect()
    }

    /// Apply a named diff from the catalog.
    ///
    /// Idempotent: applying an already-applied name is a successful no-op.
    /// A diff missing from the catalog is a soft failure that leaves the
    /// stack and universe unchanged. A diff whose hunks partially fail is
    /// still pushed, with the failures journaled on its record.
    pub fn apply(
        &mut self,
        universe: &mut Universe,
        spawners: &SpawnerRegistry,
        catalog: &DiffCatalog,
        name: &str,
    ) -> Result<(), DiffError> {
        if self.is_applied(name) {
            return Ok(());
        }

        let Some(def) = catalog.get(name) else {
            tracing::warn!(diff = name, "diff not found in catalog");
            return Err(DiffError::NotInCatalog(name.to_string()));
        };

        let mut record = DiffRecord::new(name);
        loader::load_and_apply(&mut record, universe, spawners, def);
        self.stack.push(record);
        Ok(())
    }

    /// Revert and remove a named diff. Absent names are a no-op.
    ///
    /// Removal by name can splice out of the middle of the stack; relative
    /// order of the remaining diffs is preserved. Note that mid-stack removal
    /// does not honor last-applied-first-reverted across diffs: if a later
    /// diff touched the same entities, its hunks stay applied on top of the
    /// reverted state.
    pub fn remove(&mut self, universe: &mut Universe, name: &str) {
        let Some(idx) = self.stack.iter().position(|d| d.name() == name) else {
            return;
        };
        let mut record = self.stack.remove(idx);
        record.revert_all(universe);
    }

    /// Revert and remove every diff, most recently applied first. This is
    /// the one operation that enforces strict LIFO ordering.
    pub fn clear(&mut self, universe: &mut Universe) {
        while let Some(mut record) = self.stack.pop() {
            record.revert_all(universe);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_universe::Region;
    use serde_json::json;

    fn fixture() -> (Universe, SpawnerRegistry, DiffCatalog) {
        let mut universe = Universe::new();
        universe.insert_region(Region::new("Gamma"));
        universe.insert_region(Region::new("Delta"));

        let mut spawners = SpawnerRegistry::new();
        spawners.register("raiders");

        let catalog = DiffCatalog::from_value(&json!({
            "unidiffs": [
                {
                    "name": "d1",
                    "regions": [
                        {
                            "name": "Gamma",
                            "sites": [
                                { "name": "Outpost", "op": "add" },
                                { "name": "Outpost", "op": "add" }
                            ]
                        }
                    ]
                },
                {
                    "name": "d2",
                    "regions": [
                        {
                            "name": "Delta",
                            "sites": [ { "name": "Haven", "op": "add" } ],
                            "spawners": [
                                { "name": "raiders", "chance": 40, "op": "add" }
                            ]
                        }
                    ]
                }
            ]
        }))
        .unwrap();

        (universe, spawners, catalog)
    }

    #[test]
    fn apply_pushes_and_mutates() {
        let (mut universe, spawners, catalog) = fixture();
        let mut stack = DiffStack::new();

        stack
            .apply(&mut universe, &spawners, &catalog, "d2")
            .unwrap();
        assert!(stack.is_applied("d2"));
        assert_eq!(stack.len(), 1);
        assert!(universe.region("Delta").unwrap().has_site("Haven"));
        assert_eq!(universe.region("Delta").unwrap().spawners().len(), 1);
    }

    #[test]
    fn apply_is_idempotent() {
        let (mut universe, spawners, catalog) = fixture();
        let mut stack = DiffStack::new();

        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();
        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();

        assert_eq!(stack.len(), 1);
        // One "Outpost", not two: the second apply call was a no-op.
        assert_eq!(universe.region("Gamma").unwrap().sites().len(), 1);
    }

    #[test]
    fn unknown_diff_is_soft_failure() {
        let (mut universe, spawners, catalog) = fixture();
        let before = universe.clone();
        let mut stack = DiffStack::new();

        let err = stack
            .apply(&mut universe, &spawners, &catalog, "missing")
            .unwrap_err();
        assert_eq!(err, DiffError::NotInCatalog("missing".into()));
        assert!(stack.is_empty());
        assert_eq!(universe, before);
    }

    #[test]
    fn duplicate_hunk_scenario_journals_both_outcomes() {
        // d1 adds "Outpost" to Gamma twice: first succeeds, duplicate fails,
        // and the diff is still pushed.
        let (mut universe, spawners, catalog) = fixture();
        let mut stack = DiffStack::new();

        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();

        let record = stack.get("d1").unwrap();
        assert_eq!(record.applied().len(), 1);
        assert_eq!(record.failed().len(), 1);
        assert!(universe.region("Gamma").unwrap().has_site("Outpost"));
    }

    #[test]
    fn remove_reverts_applied_hunks() {
        let (mut universe, spawners, catalog) = fixture();
        let before = universe.clone();
        let mut stack = DiffStack::new();

        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();
        stack.remove(&mut universe, "d1");

        assert!(!stack.is_applied("d1"));
        assert!(!universe.region("Gamma").unwrap().has_site("Outpost"));
        assert_eq!(universe, before);
    }

    #[test]
    fn remove_absent_name_is_noop() {
        let (mut universe, spawners, catalog) = fixture();
        let mut stack = DiffStack::new();
        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();

        stack.remove(&mut universe, "nope");
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn remove_mid_stack_preserves_order() {
        let (mut universe, spawners, catalog) = fixture();
        let mut stack = DiffStack::new();
        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();
        stack
            .apply(&mut universe, &spawners, &catalog, "d2")
            .unwrap();

        stack.remove(&mut universe, "d1");
        assert_eq!(stack.active_names(), vec!["d2".to_string()]);
        // d2's mutations are untouched by d1's removal.
        assert!(universe.region("Delta").unwrap().has_site("Haven"));
    }

    #[test]
    fn clear_reverts_everything() {
        let (mut universe, spawners, catalog) = fixture();
        let before = universe.clone();
        let mut stack = DiffStack::new();

        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();
        stack
            .apply(&mut universe, &spawners, &catalog, "d2")
            .unwrap();

        stack.clear(&mut universe);
        assert!(stack.is_empty());
        assert_eq!(universe, before);
    }

    #[test]
    fn active_names_follow_stack_order() {
        let (mut universe, spawners, catalog) = fixture();
        let mut stack = DiffStack::new();
        stack
            .apply(&mut universe, &spawners, &catalog, "d1")
            .unwrap();
        stack
            .apply(&mut universe, &spawners, &catalog, "d2")
            .unwrap();

        assert_eq!(
            stack.active_names(),
            vec!["d1".to_string(), "d2".to_string()]
        );
    }
}
