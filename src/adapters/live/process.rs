//! Live process runner using `std::process::Command`.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::ports::process::{ExecOptions, ProcessRunner};

/// Runs programs as real child processes, streaming output to the console.
pub struct LiveProcessRunner;

impl ProcessRunner for LiveProcessRunner {
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let mut cmd = Command::new(program);
        cmd.args(args).envs(&options.env).stdin(Stdio::inherit());
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdout(match &options.output_file {
            Some(path) => Stdio::from(File::create(path)?),
            None => Stdio::inherit(),
        });

        let code = if options.fail_on_stderr {
            cmd.stderr(Stdio::piped());
            let output = cmd.output()?;
            std::io::stderr().write_all(&output.stderr)?;
            if !output.stderr.is_empty() {
                return Err(format!("{} wrote to stderr", program.display()).into());
            }
            output.status.code()
        } else {
            cmd.stderr(Stdio::inherit());
            cmd.status()?.code()
        }
        .unwrap_or(-1);

        if code != 0 && !options.ignore_return_code {
            return Err(format!("{} exited with code {code}", program.display()).into());
        }
        Ok(code)
    }
}
