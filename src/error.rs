//! Fatal conditions that end a run.

use thiserror::Error;

/// Category of a fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing input, detected before any process runs.
    Configuration,
    /// The scanned target violates the configured policy.
    PolicyFailure,
    /// The external tool reported misuse or an internal fault, or could not be started.
    Tool,
    /// A host collaborator failed in a way no fail-safe default covers.
    Environment,
}

/// A fatal condition carrying the single message surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Message reported with the failed verdict.
    pub message: String,
}

impl TaskError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Shorthand for [`ErrorKind::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Shorthand for [`ErrorKind::PolicyFailure`].
    pub fn policy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PolicyFailure, message)
    }

    /// Shorthand for [`ErrorKind::Tool`].
    pub fn tool(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Tool, message)
    }

    /// Shorthand for [`ErrorKind::Environment`].
    pub fn environment(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Environment, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_message_only() {
        let err = TaskError::policy("failing task because `snyk test` found issues");
        assert_eq!(err.to_string(), "failing task because `snyk test` found issues");
        assert_eq!(err.kind, ErrorKind::PolicyFailure);
    }
}
