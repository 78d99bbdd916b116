//! Sequences install, auth, test and monitor into one verdict.

use std::fmt;

use tracing::{debug, error, info, warn};

use super::args::{self, CommandKind, SUDO};
use super::classify::{classify, Classification};
use super::executor::{base_options, report_options, snyk_cli_options, Executor};
use super::privilege::requires_elevation;
use super::report::ReportFiles;
use crate::config::StepConfiguration;
use crate::context::ServiceContext;
use crate::error::TaskError;
use crate::ports::{ExecOptions, TaskResult};

const MISSING_TOKEN: &str = "auth token is not set. Setup SnykAuth service connection and \
     specify serviceConnectionEndpoint input parameter.";

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every fatal check passed.
    Succeeded,
    /// The first fatal condition, by message.
    Failed(String),
}

impl Verdict {
    /// Host status for this verdict.
    #[must_use]
    pub fn result(&self) -> TaskResult {
        match self {
            Self::Succeeded => TaskResult::Succeeded,
            Self::Failed(_) => TaskResult::Failed,
        }
    }

    /// Message handed to the host; empty on success.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Succeeded => "",
            Self::Failed(message) => message,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("Succeeded"),
            Self::Failed(message) => write!(f, "Failed: {message}"),
        }
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started.
    Idle,
    /// Running `npm install -g snyk`.
    Installing,
    /// Running `snyk auth`.
    Authenticating,
    /// Running `snyk test`.
    Testing,
    /// Running `snyk-to-html`.
    Reporting,
    /// Running `snyk monitor`.
    Monitoring,
    /// Verdict decided.
    Done,
}

impl From<CommandKind> for RunState {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Install => Self::Installing,
            CommandKind::Auth => Self::Authenticating,
            CommandKind::Test => Self::Testing,
            CommandKind::Monitor => Self::Monitoring,
            CommandKind::Report => Self::Reporting,
        }
    }
}

/// Runs the whole step against `ctx` and reports the verdict to the host.
///
/// Inputs are read and validated, and the report directory created, before
/// any process starts.
pub fn run_step(ctx: &ServiceContext, debug: bool) -> Verdict {
    let verdict = match preflight(ctx, debug) {
        Ok((config, token)) => Pipeline::new(ctx, &config).run(&token),
        Err(err) => Verdict::Failed(err.message),
    };

    if let Verdict::Failed(message) = &verdict {
        error!("** We have a problem! :( ** {message}");
    }
    ctx.host.report_result(verdict.result(), verdict.message());
    verdict
}

fn preflight(ctx: &ServiceContext, debug: bool) -> Result<(StepConfiguration, String), TaskError> {
    let config = StepConfiguration::from_host(ctx.host.as_ref(), debug)?;
    let token = ctx
        .host
        .get_auth_token()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| TaskError::configuration(MISSING_TOKEN))?;
    if let Some(dir) = &config.report_directory {
        ctx.fs.create_dir_all(dir).map_err(|e| {
            TaskError::environment(format!(
                "unable to create report directory {}: {e}",
                dir.display()
            ))
        })?;
    }
    Ok((config, token))
}

/// One linear pass through the commands for a validated configuration.
pub struct Pipeline<'a> {
    ctx: &'a ServiceContext,
    config: &'a StepConfiguration,
    state: RunState,
}

impl<'a> Pipeline<'a> {
    /// Creates an idle pipeline.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a StepConfiguration) -> Self {
        Self { ctx, config, state: RunState::Idle }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs every command in order, stopping at the first fatal condition.
    pub fn run(&mut self, token: &str) -> Verdict {
        let verdict = match self.execute(token) {
            Ok(()) => Verdict::Succeeded,
            Err(err) => {
                error!(state = ?self.state, kind = ?err.kind, "{err}");
                Verdict::Failed(err.message)
            }
        };
        self.transition(RunState::Done);
        verdict
    }

    fn execute(&mut self, token: &str) -> Result<(), TaskError> {
        let cwd = self
            .config
            .test_directory
            .clone()
            .unwrap_or_else(|| self.ctx.host.working_directory());
        info!(cwd = %cwd.display(), "currentWorkingDirectory");
        let base = base_options(cwd);

        if self.config.debug {
            self.show_directory_listing(&base);
        }

        let executor = Executor::new(self.ctx, self.resolve_elevation());
        self.step(&executor, CommandKind::Install, args::install_args(self.config), &base)?;
        self.step(&executor, CommandKind::Auth, args::auth_args(token), &base)?;

        let cli_options = snyk_cli_options(&base);
        let reports = self
            .config
            .report_directory
            .as_deref()
            .map(|dir| ReportFiles::new(dir, self.ctx.clock.now()));
        let test_options = match &reports {
            Some(files) => report_options(&cli_options, files.json.clone()),
            None => cli_options.clone(),
        };

        let test_args = args::test_args(self.config);
        let code = self.launch(&executor, CommandKind::Test, test_args, &test_options)?;
        if let Some(files) = &reports {
            self.generate_html_report(&executor, files, &base);
            files.attach(self.ctx);
        }
        self.settle(CommandKind::Test, code)?;

        if self.config.monitor_on_build {
            let monitor_args = args::monitor_args(self.config);
            self.step(&executor, CommandKind::Monitor, monitor_args, &cli_options)?;
        }
        Ok(())
    }

    fn step(
        &mut self,
        executor: &Executor<'_>,
        kind: CommandKind,
        args: Vec<String>,
        options: &ExecOptions,
    ) -> Result<(), TaskError> {
        let code = self.launch(executor, kind, args, options)?;
        self.settle(kind, code)
    }

    fn launch(
        &mut self,
        executor: &Executor<'_>,
        kind: CommandKind,
        args: Vec<String>,
        options: &ExecOptions,
    ) -> Result<i32, TaskError> {
        self.transition(kind.into());
        let code = executor.execute(kind.tool(), args, options)?;
        info!(command = ?kind, exit_code = code, "exit code");
        Ok(code)
    }

    fn settle(&self, kind: CommandKind, code: i32) -> Result<(), TaskError> {
        let classification = classify(kind, code);
        match (kind, &classification) {
            (CommandKind::Install | CommandKind::Auth | CommandKind::Report, _) if code != 0 => {
                warn!(command = ?kind, exit_code = code, "command failed, continuing");
            }
            (_, Classification::PolicyFailure) if !self.config.fail_on_issues => {
                warn!("`snyk test` found issues, continuing because failOnIssues is false");
            }
            _ => {}
        }
        classification.into_result(self.config.fail_on_issues)
    }

    /// Formats the JSON report as HTML. Never fatal.
    fn generate_html_report(
        &mut self,
        executor: &Executor<'_>,
        files: &ReportFiles,
        base: &ExecOptions,
    ) {
        let options = report_options(base, files.html.clone());
        let args = args::report_args(&files.json);
        if let Err(err) = self.step(executor, CommandKind::Report, args, &options) {
            warn!(error = %err, "unable to generate HTML report, continuing");
        }
    }

    fn resolve_elevation(&self) -> bool {
        let required = requires_elevation(self.ctx.host.detect_platform());
        let use_sudo = required && self.ctx.host.which(SUDO).is_some();
        if required && !use_sudo {
            warn!("elevation required but `sudo` was not found, running unelevated");
        }
        info!(use_sudo, "useSudo");
        use_sudo
    }

    fn show_directory_listing(&self, options: &ExecOptions) {
        let Some(ls) = self.ctx.host.which("ls") else {
            info!("`ls` not found, skipping directory listing");
            return;
        };
        info!(ls_path = %ls.display(), "lsPath");
        match self.ctx.process.execute(&ls, &["-la".to_string()], options) {
            Ok(code) => info!(exit_code = code, "lsExitCode"),
            Err(e) => warn!(error = %e, "directory listing failed"),
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}
