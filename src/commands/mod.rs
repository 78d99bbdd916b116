//! Command dispatch and handlers.

pub mod replay;
pub mod run;

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::context::ServiceContext;
use crate::pipeline::Verdict;

/// Dispatch a parsed command to its handler.
///
/// When `SNYK_TASK_RECORD` is set to a directory path, every port
/// interaction of a live run is recorded to per-port cassettes below it.
///
/// # Errors
///
/// Returns the failure message when the step fails or cannot be set up.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Run { debug } => {
            let (ctx, session) = if let Ok(path) = env::var("SNYK_TASK_RECORD") {
                let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path))?;
                (ctx, Some(session))
            } else {
                (ServiceContext::live(), None)
            };

            let verdict = run::run(&ctx, *debug);

            // Finish recording after the step completes (even on failure)
            if let Some(session) = session {
                drop(ctx);
                finish_recording(session)?;
            }
            into_result(verdict)
        }
        Command::Replay { dir, debug } => replay::run(dir, *debug).and_then(into_result),
    }
}

fn into_result(verdict: Verdict) -> Result<(), String> {
    match verdict {
        Verdict::Succeeded => Ok(()),
        Verdict::Failed(message) => Err(message),
    }
}

fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    info!(dir = %output_dir.display(), "recording saved");
    Ok(())
}
