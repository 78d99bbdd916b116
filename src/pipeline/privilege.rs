//! Decides whether commands run through `sudo`.

use tracing::warn;

use crate::ports::Platform;

/// Returns `true` when commands must be elevated on `platform`.
///
/// Only Linux agents need elevation for a global npm install. An
/// undetermined platform elevates, so a detection failure never skips
/// elevation on an agent that needs it.
pub fn requires_elevation<E: std::fmt::Display>(platform: Result<Platform, E>) -> bool {
    match platform {
        Ok(platform) => platform == Platform::Linux,
        Err(err) => {
            warn!(error = %err, "unable to detect agent platform, assuming elevation is required");
            true
        }
    }
}
