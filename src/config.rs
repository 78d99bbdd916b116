//! Step configuration resolved once per run from host inputs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::error::TaskError;
use crate::ports::TaskHost;

const INVALID_THRESHOLD: &str = "If set, severity threshold must be 'high' or 'medium' or 'low' \
     (case insensitive). If not set, the default is 'low'.";

/// Minimum severity that makes `snyk test` report issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityThreshold {
    /// `low`
    Low,
    /// `medium`
    Medium,
    /// `high`
    High,
}

impl SeverityThreshold {
    /// Lowercase literal passed to `--severity-threshold=`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SeverityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityThreshold {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskError::configuration(INVALID_THRESHOLD)),
        }
    }
}

/// Parses an optional raw threshold; empty input means unset.
///
/// # Errors
///
/// Returns a configuration error for any non-empty value other than
/// `low`, `medium` or `high` (case-insensitive).
pub fn parse_severity_threshold(raw: Option<&str>) -> Result<Option<SeverityThreshold>, TaskError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

/// Immutable parameters governing one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepConfiguration {
    /// Manifest file to test, passed as `--file=`.
    pub target_file: Option<String>,
    /// Container image to test with `--docker`.
    pub docker_image_name: Option<String>,
    /// Dockerfile describing `docker_image_name`.
    pub dockerfile_path: Option<String>,
    /// Project name for `snyk monitor`.
    pub project_name: Option<String>,
    /// Organization for `snyk monitor`.
    pub organization: Option<String>,
    /// Upload a monitor snapshot after testing.
    pub monitor_on_build: bool,
    /// Fail the step when `snyk test` finds issues.
    pub fail_on_issues: bool,
    /// Raw extra arguments appended to test and monitor.
    pub additional_arguments: Option<String>,
    /// Working directory for every command.
    pub test_directory: Option<PathBuf>,
    /// Normalized severity threshold.
    pub severity_threshold: Option<SeverityThreshold>,
    /// Where JSON and HTML reports are generated; none when unset.
    pub report_directory: Option<PathBuf>,
    /// Verbose diagnostics: argument dump and directory listing.
    pub debug: bool,
}

impl Default for StepConfiguration {
    fn default() -> Self {
        Self {
            target_file: None,
            docker_image_name: None,
            dockerfile_path: None,
            project_name: None,
            organization: None,
            monitor_on_build: true,
            fail_on_issues: true,
            additional_arguments: None,
            test_directory: None,
            severity_threshold: None,
            report_directory: None,
            debug: false,
        }
    }
}

impl StepConfiguration {
    /// Reads every step input from the host and validates it.
    ///
    /// `debug` forces debug mode on regardless of the `debug-task` input.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid severity threshold or
    /// an input the host refuses to supply.
    pub fn from_host(host: &dyn TaskHost, debug: bool) -> Result<Self, TaskError> {
        let input = |name: &str| -> Result<Option<String>, TaskError> {
            host.get_input(name, false)
                .map(|value| value.filter(|v| !v.trim().is_empty()))
                .map_err(|e| TaskError::configuration(format!("failed to read input {name}: {e}")))
        };

        let config = Self {
            target_file: input("targetFile")?,
            docker_image_name: input("dockerImageName")?,
            dockerfile_path: input("dockerfilePath")?,
            project_name: input("projectName")?,
            organization: input("organization")?,
            monitor_on_build: host.get_bool_input("monitorOnBuild", true),
            fail_on_issues: host.get_bool_input("failOnIssues", true),
            additional_arguments: input("additionalArguments")?,
            test_directory: input("testDirectory")?.map(PathBuf::from),
            severity_threshold: parse_severity_threshold(input("severityThreshold")?.as_deref())?,
            report_directory: input("reportDirectory")?.map(PathBuf::from),
            debug: debug || host.get_bool_input("debug-task", false),
        };

        if config.debug {
            config.log_all();
        }
        Ok(config)
    }

    /// Whether JSON and HTML reports are generated into `report_directory`.
    #[must_use]
    pub fn generates_reports(&self) -> bool {
        self.report_directory.is_some()
    }

    /// Value for `--file=`, if any.
    ///
    /// The Dockerfile wins only when an image is being tested; otherwise the
    /// target file is used.
    #[must_use]
    pub fn file_parameter(&self) -> Option<&str> {
        match (&self.docker_image_name, &self.dockerfile_path) {
            (Some(_), Some(dockerfile)) => Some(dockerfile.as_str()),
            _ => self.target_file.as_deref(),
        }
    }

    fn log_all(&self) {
        info!(target_file = ?self.target_file, "taskArgs.targetFile");
        info!(docker_image_name = ?self.docker_image_name, "taskArgs.dockerImageName");
        info!(dockerfile_path = ?self.dockerfile_path, "taskArgs.dockerfilePath");
        info!(severity_threshold = ?self.severity_threshold, "taskArgs.severityThreshold");
        info!(project_name = ?self.project_name, "taskArgs.projectName");
        info!(organization = ?self.organization, "taskArgs.organization");
        info!(monitor_on_build = self.monitor_on_build, "taskArgs.monitorOnBuild");
        info!(fail_on_issues = self.fail_on_issues, "taskArgs.failOnIssues");
        info!(additional_arguments = ?self.additional_arguments, "taskArgs.additionalArguments");
        info!(test_directory = ?self.test_directory, "taskArgs.testDirectory");
        info!(report_directory = ?self.report_directory, "taskArgs.reportDirectory");
    }
}
