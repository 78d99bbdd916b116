//! Exit-code taxonomy of the Snyk CLI.

use super::args::CommandKind;
use crate::error::TaskError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ISSUES_FOUND: i32 = 1;
const MONITOR_EXIT_INVALID_FILE_OR_IMAGE: i32 = 2;

/// Message when `snyk test` finds issues and the step fails on them.
pub const TEST_ISSUES_FOUND: &str = "failing task because `snyk test` found issues";
/// Message when `snyk test` reports misuse or an internal error.
pub const TEST_IMPROPER_USE: &str =
    "failing task because `snyk test` was improperly used or had other errors";
/// Message for a generic `snyk monitor` failure.
pub const MONITOR_ERROR: &str = "failing task because `snyk monitor` had an error";
/// Message when `snyk monitor` cannot resolve the file or image.
pub const MONITOR_UNKNOWN_TARGET: &str =
    "failing task because `snyk monitor` had an error - unknown file or image";

/// What an exit code means for a given command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The command succeeded, or its failure is not fatal for this command.
    Success,
    /// The scan found issues.
    PolicyFailure,
    /// The tool was misused or failed internally.
    ToolError(&'static str),
}

/// Classifies `code` for `kind`.
///
/// Install and auth codes are never fatal; a broken install or login
/// surfaces through the test step instead. Report formatting never decides
/// the verdict.
#[must_use]
pub fn classify(kind: CommandKind, code: i32) -> Classification {
    match (kind, code) {
        (CommandKind::Install | CommandKind::Auth | CommandKind::Report, _)
        | (CommandKind::Test | CommandKind::Monitor, EXIT_SUCCESS) => Classification::Success,
        (CommandKind::Test, EXIT_ISSUES_FOUND) => Classification::PolicyFailure,
        (CommandKind::Test, _) => Classification::ToolError(TEST_IMPROPER_USE),
        (CommandKind::Monitor, MONITOR_EXIT_INVALID_FILE_OR_IMAGE) => {
            Classification::ToolError(MONITOR_UNKNOWN_TARGET)
        }
        (CommandKind::Monitor, _) => Classification::ToolError(MONITOR_ERROR),
    }
}

impl Classification {
    /// Turns the classification into a run decision.
    ///
    /// Policy failures are fatal only when `fail_on_issues` is set; tool
    /// errors always are.
    ///
    /// # Errors
    ///
    /// Returns the fatal condition that ends the run.
    pub fn into_result(self, fail_on_issues: bool) -> Result<(), TaskError> {
        match self {
            Self::Success => Ok(()),
            Self::PolicyFailure if fail_on_issues => Err(TaskError::policy(TEST_ISSUES_FOUND)),
            Self::PolicyFailure => Ok(()),
            Self::ToolError(message) => Err(TaskError::tool(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn install_auth_and_report_never_fail() {
        for code in [0, 1, 2, 127, -1] {
            assert_eq!(classify(CommandKind::Install, code), Classification::Success);
            assert_eq!(classify(CommandKind::Auth, code), Classification::Success);
            assert_eq!(classify(CommandKind::Report, code), Classification::Success);
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(classify(CommandKind::Test, 0), Classification::Success);
        assert_eq!(classify(CommandKind::Test, 1), Classification::PolicyFailure);
        assert_eq!(classify(CommandKind::Test, 2), Classification::ToolError(TEST_IMPROPER_USE));
        assert_eq!(classify(CommandKind::Test, 3), Classification::ToolError(TEST_IMPROPER_USE));
        assert_eq!(classify(CommandKind::Test, -1), Classification::ToolError(TEST_IMPROPER_USE));
    }

    #[test]
    fn issues_found_is_gated_by_fail_on_issues() {
        let err = classify(CommandKind::Test, 1).into_result(true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PolicyFailure);
        assert!(err.message.contains("found issues"));

        assert!(classify(CommandKind::Test, 1).into_result(false).is_ok());
    }

    #[test]
    fn improper_use_ignores_fail_on_issues() {
        for fail_on_issues in [true, false] {
            let err = classify(CommandKind::Test, 2).into_result(fail_on_issues).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Tool);
            assert!(err.message.contains("improperly used"));
        }
    }

    #[test]
    fn monitor_codes() {
        assert!(classify(CommandKind::Monitor, 0).into_result(true).is_ok());

        let unknown = classify(CommandKind::Monitor, 2).into_result(false).unwrap_err();
        assert_eq!(unknown.message, MONITOR_UNKNOWN_TARGET);

        for code in [1, 3, 255] {
            let err = classify(CommandKind::Monitor, code).into_result(false).unwrap_err();
            assert_eq!(err.message, MONITOR_ERROR);
        }
    }
}
