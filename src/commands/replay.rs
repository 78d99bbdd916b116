//! `snyk-task replay` command.

use std::path::Path;

use tracing::info;

use crate::cassette::config::CassetteConfig;
use crate::context::ServiceContext;
use crate::pipeline::{run_step, Verdict};

/// Re-run a recorded step from the cassettes in `dir`.
///
/// # Errors
///
/// Returns an error if `dir` holds no cassettes or one cannot be loaded.
pub fn run(dir: &Path, debug: bool) -> Result<Verdict, String> {
    let config = CassetteConfig::from_dir(dir);
    if config.is_empty() {
        return Err(format!("No cassettes found in {}", dir.display()));
    }

    let ctx = ServiceContext::replaying_from(&config)?;
    info!(dir = %dir.display(), "replaying recorded run");
    let verdict = run_step(&ctx, debug);
    info!(%verdict, "replay finished");
    Ok(verdict)
}
