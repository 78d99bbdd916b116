//! Runs one external command, optionally through `sudo`.

use std::path::PathBuf;

use tracing::{debug, info};

use super::args::{redact_secrets, SUDO};
use crate::context::ServiceContext;
use crate::error::TaskError;
use crate::ports::{ExecOptions, TaskHost};

/// Integration name reported to the Snyk CLI.
pub const INTEGRATION_NAME: &str = "AZURE_PIPELINES";
/// Integration version reported to the Snyk CLI.
pub const INTEGRATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options shared by every command of a run.
#[must_use]
pub fn base_options(cwd: PathBuf) -> ExecOptions {
    ExecOptions {
        cwd: Some(cwd),
        fail_on_stderr: false,
        ignore_return_code: true,
        ..ExecOptions::default()
    }
}

/// Options for `snyk test` and `snyk monitor`: the base options plus the
/// integration identification variables.
#[must_use]
pub fn snyk_cli_options(base: &ExecOptions) -> ExecOptions {
    let mut options = base.clone();
    options.env.insert("SNYK_INTEGRATION_NAME".into(), INTEGRATION_NAME.into());
    options.env.insert("SNYK_INTEGRATION_VERSION".into(), INTEGRATION_VERSION.into());
    options
}

/// Options for a report formatter whose stdout is written to `output_file`.
#[must_use]
pub fn report_options(base: &ExecOptions, output_file: PathBuf) -> ExecOptions {
    ExecOptions { output_file: Some(output_file), ..base.clone() }
}

/// A resolved program plus its final argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable actually started.
    pub program: PathBuf,
    /// Arguments passed to `program`.
    pub args: Vec<String>,
}

impl Invocation {
    /// Resolves `tool` through the host.
    ///
    /// When elevated, `sudo` is started instead and the tool name becomes its
    /// first argument.
    ///
    /// # Errors
    ///
    /// Returns a tool error when the executable cannot be located.
    pub fn resolve(
        host: &dyn TaskHost,
        tool: &str,
        args: Vec<String>,
        elevate: bool,
    ) -> Result<Self, TaskError> {
        let lookup = if elevate { SUDO } else { tool };
        let program = host
            .which(lookup)
            .ok_or_else(|| TaskError::tool(format!("unable to locate executable `{lookup}`")))?;

        let args = if elevate {
            std::iter::once(tool.to_string()).chain(args).collect()
        } else {
            args
        };
        Ok(Self { program, args })
    }
}

/// Executes commands for one run with a fixed elevation decision.
pub struct Executor<'a> {
    ctx: &'a ServiceContext,
    elevate: bool,
}

impl<'a> Executor<'a> {
    /// Creates an executor bound to `ctx`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, elevate: bool) -> Self {
        Self { ctx, elevate }
    }

    /// Runs `tool` with `args` and returns its exit code.
    ///
    /// Nonzero exit codes are returned, not raised.
    ///
    /// # Errors
    ///
    /// Returns a tool error if the executable cannot be located or started.
    pub fn execute(
        &self,
        tool: &str,
        args: Vec<String>,
        options: &ExecOptions,
    ) -> Result<i32, TaskError> {
        let invocation = Invocation::resolve(self.ctx.host.as_ref(), tool, args, self.elevate)?;
        info!(tool_path = %invocation.program.display(), "toolPath");
        debug!(args = ?redact_secrets(&invocation.args), "arguments");

        self.ctx
            .process
            .execute(&invocation.program, &invocation.args, options)
            .map_err(|e| TaskError::tool(format!("failed to run `{tool}`: {e}")))
    }
}
