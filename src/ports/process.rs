//! Process runner port for launching external commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Options applied to one process execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOptions {
    /// Working directory; the current directory when `None`.
    pub cwd: Option<PathBuf>,
    /// Variables added on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    /// File that receives stdout instead of the console.
    pub output_file: Option<PathBuf>,
    /// Treat any write to stderr as a failure.
    pub fail_on_stderr: bool,
    /// Return nonzero exit codes instead of failing.
    pub ignore_return_code: bool,
}

/// Runs external programs to completion.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args` and returns its exit code.
    ///
    /// A process killed by a signal reports `-1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started, or if the options
    /// turn a nonzero exit or stderr output into a failure.
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>>;
}
