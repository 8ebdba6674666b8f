//! Builds hunks from catalog diff definitions and drives their application.
//!
//! The journal contents (what succeeded, what failed, and why) are decided
//! here without any I/O; diagnostic reporting is a separate pass over the
//! finished record.

use crate::hunk::{ApplyError, Hunk, HunkOp, HunkTarget};
use crate::record::{DiffRecord, FailedHunk};
use orrery_catalog::{ActionBody, ActionDef, DiffDef};
use orrery_common::Chance;
use orrery_universe::{SpawnerRegistry, Universe};

/// Build every hunk a diff definition describes and apply it, routing each
/// outcome into the record's journals. Emits one diagnostic line per failure
/// once the whole pass is done.
pub fn load_and_apply(
    record: &mut DiffRecord,
    universe: &mut Universe,
    spawners: &SpawnerRegistry,
    def: &DiffDef,
) {
    for group in &def.regions {
        for action in &group.actions {
            // Each hunk owns its own copy of the shared region name.
            match build_hunk(&group.region, action, spawners) {
                Ok(hunk) => {
                    let outcome = hunk.apply(universe);
                    record.record(hunk, outcome);
                }
                Err(error) => record.record_unbuildable(&group.region, error),
            }
        }
    }
    report_failures(record, spawners);
}

/// Interpret one catalog action as a hunk.
///
/// Unknown verbs and unknown spawner names fail here, before any world
/// mutation is attempted.
pub fn build_hunk(
    region: &str,
    action: &ActionDef,
    spawners: &SpawnerRegistry,
) -> Result<Hunk, ApplyError> {
    let adding = match action.verb.as_str() {
        "add" => true,
        "remove" => false,
        other => return Err(ApplyError::UnknownVerb(other.to_string())),
    };

    let op = match &action.body {
        ActionBody::Site { name } => {
            if adding {
                HunkOp::SiteAdd { site: name.clone() }
            } else {
                HunkOp::SiteRemove { site: name.clone() }
            }
        }
        ActionBody::Spawner { name, chance } => {
            let def = spawners
                .get(name)
                .ok_or_else(|| ApplyError::UnknownSpawner(name.clone()))?;
            let chance = Chance::clamped(*chance);
            if adding {
                HunkOp::SpawnerAdd {
                    spawner: def.id,
                    chance,
                }
            } else {
                HunkOp::SpawnerRemove {
                    spawner: def.id,
                    chance,
                }
            }
        }
    };

    Ok(Hunk::new(HunkTarget::Region(region.to_string()), op))
}

/// Human-readable one-line description of a failed journal entry.
///
/// Pure string formatting, kept apart from the tracing sink so it can be
/// unit-tested without capturing log output.
pub fn describe_failure(failure: &FailedHunk, spawners: &SpawnerRegistry) -> String {
    match &failure.op {
        Some(HunkOp::SiteAdd { site }) => {
            format!("[{}] site add: '{}'", failure.region, site)
        }
        Some(HunkOp::SiteRemove { site }) => {
            format!("[{}] site remove: '{}'", failure.region, site)
        }
        Some(HunkOp::SpawnerAdd { spawner, chance }) => {
            let name = spawners.name_of(*spawner).unwrap_or("?");
            format!(
                "[{}] spawner add: '{}' ({} chance)",
                failure.region, name, chance
            )
        }
        Some(HunkOp::SpawnerRemove { spawner, chance }) => {
            let name = spawners.name_of(*spawner).unwrap_or("?");
            format!(
                "[{}] spawner remove: '{}' ({} chance)",
                failure.region, name, chance
            )
        }
        None => format!("[{}] unusable action: {}", failure.region, failure.error),
    }
}

fn report_failures(record: &DiffRecord, spawners: &SpawnerRegistry) {
    if record.failed().is_empty() {
        return;
    }
    tracing::debug!(
        diff = record.name(),
        failed = record.failed().len(),
        "diff applied with failed hunks"
    );
    for failure in record.failed() {
        tracing::debug!("   {}", describe_failure(failure, spawners));
    }
}
