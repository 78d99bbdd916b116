//! Replaying adapter for the `ProcessRunner` port.

use std::path::Path;
use std::sync::Mutex;

use serde_json::json;
use tracing::warn;

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::pipeline::args::redact_secrets;
use crate::ports::{ExecOptions, ProcessRunner};

/// Replays recorded exit codes in execution order.
///
/// Running past the end of the recording is an execution error.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// Creates a replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        _options: &ExecOptions,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let (input, output) = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_interaction("process", "execute")?;
            (interaction.input.clone(), interaction.output.clone())
        };

        let recorded = (input.get("program"), input.get("args"));
        let actual = (json!(program), json!(redact_secrets(args)));
        if recorded.0 != Some(&actual.0) || recorded.1 != Some(&actual.1) {
            warn!(
                recorded = %input,
                program = %program.display(),
                args = ?redact_secrets(args),
                "replay diverged: command differs from recording"
            );
        }
        extract_result(&output, "process::execute")
    }
}
