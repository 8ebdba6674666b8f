use crate::hunk::{ApplyError, Hunk, HunkOp};
use orrery_universe::Universe;

/// Journal entry for a hunk that did not make it into the world.
///
/// `op` is `Some` for hunks that were built but failed to apply, and `None`
/// for catalog actions that could not even be built into a hunk (unknown
/// verb, unknown spawner name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedHunk {
    /// Name of the region the action targeted.
    pub region: String,
    pub op: Option<HunkOp>,
    pub error: ApplyError,
}

/// The journals for one named, currently-applied diff.
///
/// `applied` holds only hunks confirmed to have mutated the world, in apply
/// order. `failed` holds everything else, in encounter order. A record with
/// failures is still a live, revertible diff.
#[derive(Debug, Clone, Default)]
pub struct DiffRecord {
    name: String,
    applied: Vec<Hunk>,
    failed: Vec<FailedHunk>,
}

impl DiffRecord {
    /// Create an empty record for a named diff.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applied: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hunks confirmed to have mutated the world, in apply order.
    pub fn applied(&self) -> &[Hunk] {
        &self.applied
    }

    /// Failed journal, in encounter order.
    pub fn failed(&self) -> &[FailedHunk] {
        &self.failed
    }

    /// Route a hunk to the matching journal based on its apply outcome.
    pub fn record(&mut self, hunk: Hunk, outcome: Result<(), ApplyError>) {
        match outcome {
            Ok(()) => self.applied.push(hunk),
            Err(error) => self.failed.push(FailedHunk {
                region: hunk.target.region_name().to_string(),
                op: Some(hunk.op),
                error,
            }),
        }
    }

    /// Journal a catalog action that never became a hunk.
    pub fn record_unbuildable(&mut self, region: &str, error: ApplyError) {
        self.failed.push(FailedHunk {
            region: region.to_string(),
            op: None,
            error,
        });
    }

    /// Best-effort rollback of every applied hunk, in reverse application
    /// order (last applied, first reverted). A hunk whose reversion fails is
    /// logged and skipped; the remaining hunks are still reverted.
    ///
    /// Drains the applied journal so a record cannot be reverted twice.
    pub fn revert_all(&mut self, universe: &mut Universe) {
        for hunk in self.applied.drain(..).rev() {
            let inverse = hunk.inverse();
            if let Err(error) = inverse.apply(universe) {
                tracing::warn!(
                    diff = %self.name,
                    region = hunk.target.region_name(),
                    %error,
                    "failed to revert hunk, continuing"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunk::HunkTarget;
    use orrery_universe::{Region, UniverseError};

    fn site_add(site: &str) -> Hunk {
        Hunk::new(
            HunkTarget::Region("Gamma".into()),
            HunkOp::SiteAdd { site: site.into() },
        )
    }

    #[test]
    fn record_routes_by_outcome() {
        let mut rec = DiffRecord::new("d1");
        rec.record(site_add("Outpost"), Ok(()));
        rec.record(
            site_add("Outpost"),
            Err(ApplyError::World(UniverseError::SiteAlreadyPresent {
                region: "Gamma".into(),
                site: "Outpost".into(),
            })),
        );

        assert_eq!(rec.applied().len(), 1);
        assert_eq!(rec.failed().len(), 1);
        assert_eq!(rec.failed()[0].region, "Gamma");
        assert!(rec.failed()[0].op.is_some());
    }

    #[test]
    fn unbuildable_actions_have_no_op() {
        let mut rec = DiffRecord::new("d1");
        rec.record_unbuildable("Gamma", ApplyError::UnknownVerb("toggle".into()));

        assert_eq!(rec.failed().len(), 1);
        assert!(rec.failed()[0].op.is_none());
    }

    #[test]
    fn revert_all_runs_in_reverse_order() {
        let mut u = Universe::new();
        u.insert_region(Region::new("Gamma"));
        let before = u.clone();

        // Add a site, then remove it again: reverting in forward order would
        // try to remove "Waypoint" while it is absent, then re-add it,
        // leaving the site behind. Reverse order restores the original state.
        let add = site_add("Waypoint");
        let remove = Hunk::new(
            HunkTarget::Region("Gamma".into()),
            HunkOp::SiteRemove {
                site: "Waypoint".into(),
            },
        );

        let mut rec = DiffRecord::new("d1");
        let outcome = add.apply(&mut u);
        rec.record(add, outcome);
        let outcome = remove.apply(&mut u);
        rec.record(remove, outcome);
        assert_eq!(rec.applied().len(), 2);

        rec.revert_all(&mut u);
        assert_eq!(u, before);
        assert!(rec.applied().is_empty());
    }

    #[test]
    fn revert_continues_past_failures() {
        let mut u = Universe::new();
        u.insert_region(Region::new("Gamma"));

        let first = site_add("Outpost");
        let second = site_add("Haven");
        let mut rec = DiffRecord::new("d1");
        let outcome = first.apply(&mut u);
        rec.record(first, outcome);
        let outcome = second.apply(&mut u);
        rec.record(second, outcome);

        // Sabotage the revert of "Haven" by removing it out-of-band.
        u.region_mut("Gamma").unwrap().remove_site("Haven").unwrap();

        rec.revert_all(&mut u);
        // "Haven" reversion failed and was skipped; "Outpost" still reverted.
        assert!(!u.region("Gamma").unwrap().has_site("Outpost"));
    }

    #[test]
    fn revert_on_empty_record_is_noop() {
        let mut u = Universe::new();
        let mut rec = DiffRecord::new("d1");
        rec.revert_all(&mut u);
        assert!(rec.applied().is_empty());
    }
}
