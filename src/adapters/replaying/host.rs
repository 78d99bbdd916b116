//! Replaying adapter for the `TaskHost` port.
//!
//! Queries are answered by matching the recorded input, so a hand-written
//! cassette only needs the inputs it cares about; anything missing reads as
//! empty. Reported verdicts and attachments are checked against the
//! recording.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::{info, warn};

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{AttachmentKind, Platform, TaskHost, TaskResult};

const PORT: &str = "host";

/// Replays a recorded task host.
pub struct ReplayingTaskHost {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskHost {
    /// Creates a replaying host from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn lookup(&self, method: &str, input: &Value) -> Option<Value> {
        let replayer = self.replayer.lock().expect("replayer lock poisoned");
        replayer.find(PORT, method, input).map(|interaction| interaction.output.clone())
    }

    fn verify(&self, method: &str, input: &Value) {
        if self.lookup(method, input).is_some() {
            info!(method, %input, "matches recording");
        } else {
            warn!(method, %input, "replay diverged: no matching call in recording");
        }
    }
}

impl TaskHost for ReplayingTaskHost {
    fn get_input(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let value: Option<String> = match self.lookup("get_input", &json!({"name": name})) {
            Some(output) => extract_result(&output, "host::get_input")?,
            None => None,
        };
        if required && value.is_none() {
            return Err(format!("Input required: {name}").into());
        }
        Ok(value)
    }

    fn get_bool_input(&self, name: &str, default: bool) -> bool {
        self.lookup("get_bool_input", &json!({"name": name}))
            .and_then(|output| output.as_bool())
            .unwrap_or(default)
    }

    fn get_auth_token(&self) -> Option<String> {
        self.lookup("get_auth_token", &json!({}))
            .and_then(|output| output.as_str().map(str::to_string))
    }

    fn which(&self, tool: &str) -> Option<PathBuf> {
        self.lookup("which", &json!({"tool": tool}))
            .and_then(|output| serde_json::from_value(output).ok())
    }

    fn detect_platform(&self) -> Result<Platform, Box<dyn std::error::Error + Send + Sync>> {
        match self.lookup("detect_platform", &json!({})) {
            Some(output) => extract_result(&output, "host::detect_platform"),
            None => Err("platform not recorded".into()),
        }
    }

    fn working_directory(&self) -> PathBuf {
        self.lookup("working_directory", &json!({}))
            .and_then(|output| serde_json::from_value(output).ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn report_result(&self, result: TaskResult, message: &str) {
        self.verify("report_result", &json!({"result": result, "message": message}));
    }

    fn attach_artifact(&self, kind: AttachmentKind, name: &str, path: &Path) {
        self.verify("attach_artifact", &json!({"kind": kind, "name": name, "path": path}));
    }
}
