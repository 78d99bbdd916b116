//! Task host port: the pipeline runtime that owns inputs and verdicts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Operating system reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// Linux agents.
    Linux,
    /// Windows agents.
    Windows,
    /// macOS agents.
    MacOS,
}

/// Terminal status handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskResult {
    /// The step passed.
    Succeeded,
    /// The step failed.
    Failed,
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("Succeeded"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// Kind of a build artifact attached to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// Machine-readable (JSON) report.
    JsonReport,
    /// Human-readable (HTML) report.
    HtmlReport,
}

impl AttachmentKind {
    /// Attachment type string understood by the host.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonReport => "JSON_ATTACHMENT_TYPE",
            Self::HtmlReport => "HTML_ATTACHMENT_TYPE",
        }
    }
}

/// The surrounding pipeline runtime.
///
/// Supplies step inputs and executable lookups, and receives the single
/// verdict of the run.
pub trait TaskHost: Send + Sync {
    /// Returns the trimmed value of a string input, or `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns an error when `required` is set and the input is empty.
    fn get_input(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns a boolean input, or `default` when the input is empty.
    fn get_bool_input(&self, name: &str, default: bool) -> bool;

    /// Returns the credential used for `snyk auth`, if configured.
    fn get_auth_token(&self) -> Option<String>;

    /// Resolves an executable by logical name. `None` means not found.
    fn which(&self, tool: &str) -> Option<PathBuf>;

    /// Detects the agent's operating system.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform cannot be determined.
    fn detect_platform(&self) -> Result<Platform, Box<dyn std::error::Error + Send + Sync>>;

    /// Directory commands run in when the step names none.
    fn working_directory(&self) -> PathBuf;

    /// Hands the verdict to the host. Called exactly once per run.
    fn report_result(&self, result: TaskResult, message: &str);

    /// Attaches an existing file to the run.
    fn attach_artifact(&self, kind: AttachmentKind, name: &str, path: &Path);
}
