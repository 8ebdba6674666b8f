use crate::hunk::{ApplyError, HunkTarget};
use orrery_universe::{Region, Universe, UniverseError};

/// Resolve a symbolic hunk target to a live region handle.
///
/// Delegates to the universe registry's name lookup. Resolution happens at
/// apply time, so a target may refer to a region that does not exist yet
/// when the hunk is built.
pub fn resolve<'a>(
    universe: &'a mut Universe,
    target: &HunkTarget,
) -> Result<&'a mut Region, ApplyError> {
    match target {
        HunkTarget::Region(name) => universe
            .region_mut(name)
            .ok_or_else(|| UniverseError::RegionNotFound(name.clone()).into()),
    }
}
