//! Argument lists for each external command.
//!
//! Token order is the wire contract with the Snyk CLI and must not change.

use std::path::Path;

use crate::cassette::recorder::MASK;
use crate::config::StepConfiguration;

/// Package manager used to install the scanner.
pub const NPM: &str = "npm";
/// The scanner CLI.
pub const SNYK: &str = "snyk";
/// Formatter turning a JSON scan result into an HTML report.
pub const SNYK_TO_HTML: &str = "snyk-to-html";
/// Privilege-escalation wrapper.
pub const SUDO: &str = "sudo";

/// The commands a run issues, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `npm install -g snyk`
    Install,
    /// `snyk auth <token>`
    Auth,
    /// `snyk test ...`
    Test,
    /// `snyk monitor ...`
    Monitor,
    /// `snyk-to-html -i <report>`
    Report,
}

impl CommandKind {
    /// Logical name of the executable the command runs.
    #[must_use]
    pub fn tool(self) -> &'static str {
        match self {
            Self::Install => NPM,
            Self::Auth | Self::Test | Self::Monitor => SNYK,
            Self::Report => SNYK_TO_HTML,
        }
    }
}

/// `install -g snyk`, plus the HTML formatter when reports are generated.
#[must_use]
pub fn install_args(config: &StepConfiguration) -> Vec<String> {
    let mut args = vec!["install".to_string(), "-g".into(), SNYK.into()];
    if config.generates_reports() {
        args.push(SNYK_TO_HTML.into());
    }
    args
}

/// `auth <token>`
#[must_use]
pub fn auth_args(token: &str) -> Vec<String> {
    vec!["auth".into(), token.into()]
}

/// `test` followed by threshold, docker image, file and extra arguments.
///
/// `--json` comes last when reports are generated.
#[must_use]
pub fn test_args(config: &StepConfiguration) -> Vec<String> {
    let mut args = vec!["test".to_string()];
    if let Some(threshold) = config.severity_threshold {
        args.push(format!("--severity-threshold={threshold}"));
    }
    push_target(&mut args, config);
    push_some(&mut args, config.additional_arguments.as_deref().map(str::to_string));
    if config.generates_reports() {
        args.push("--json".into());
    }
    args
}

/// `monitor` followed by docker image, file, org, project name and extra arguments.
#[must_use]
pub fn monitor_args(config: &StepConfiguration) -> Vec<String> {
    let mut args = vec!["monitor".to_string()];
    push_target(&mut args, config);
    let org = non_empty(config.organization.as_deref()).map(|org| format!("--org={org}"));
    push_some(&mut args, org);
    push_some(
        &mut args,
        non_empty(config.project_name.as_deref()).map(|name| format!("--project-name={name}")),
    );
    push_some(&mut args, config.additional_arguments.as_deref().map(str::to_string));
    args
}

/// `-i <json report>`
#[must_use]
pub fn report_args(json_report: &Path) -> Vec<String> {
    vec!["-i".into(), json_report.display().to_string()]
}

/// Returns a copy of `args` safe to persist, with any `auth` token masked.
///
/// Works on elevated lists too, where the tool name precedes `auth`.
#[must_use]
pub fn redact_secrets(args: &[String]) -> Vec<String> {
    let mut redacted = args.to_vec();
    if let Some(pos) = redacted.iter().take(2).position(|arg| arg == "auth") {
        if let Some(token) = redacted.get_mut(pos + 1) {
            *token = MASK.to_string();
        }
    }
    redacted
}

fn push_target(args: &mut Vec<String>, config: &StepConfiguration) {
    if let Some(image) = non_empty(config.docker_image_name.as_deref()) {
        args.push("--docker".into());
        args.push(image.into());
    }
    push_some(args, non_empty(config.file_parameter()).map(|file| format!("--file={file}")));
}

fn push_some(args: &mut Vec<String>, arg: Option<String>) {
    if let Some(arg) = arg.filter(|a| !a.is_empty()) {
        args.push(arg);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
