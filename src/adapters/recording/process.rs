//! Recording adapter for the `ProcessRunner` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::pipeline::args::redact_secrets;
use crate::ports::{ExecOptions, ProcessRunner};

/// Records executions while delegating to an inner runner.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessRunner {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct ExecuteInput<'a> {
    program: &'a Path,
    args: Vec<String>,
    options: &'a ExecOptions,
}

impl ProcessRunner for RecordingProcessRunner {
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.execute(program, args, options);
        let input = ExecuteInput { program, args: redact_secrets(args), options };
        record_result(&self.recorder, "process", "execute", &input, &result);
        result
    }
}
