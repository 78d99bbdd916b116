//! Recording adapter for the `TaskHost` port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{record_interaction, record_result};
use crate::cassette::recorder::{CassetteRecorder, MASK};
use crate::ports::{AttachmentKind, Platform, TaskHost, TaskResult};

const PORT: &str = "host";

/// Records host interactions while delegating to an inner host.
///
/// The auth token is recorded as `***` and registered with the recorder, so
/// it is masked anywhere else it turns up.
pub struct RecordingTaskHost {
    inner: Box<dyn TaskHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTaskHost {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn TaskHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl TaskHost for RecordingTaskHost {
    fn get_input(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.get_input(name, required);
        record_result(&self.recorder, PORT, "get_input", &json!({"name": name}), &result);
        result
    }

    fn get_bool_input(&self, name: &str, default: bool) -> bool {
        let value = self.inner.get_bool_input(name, default);
        record_interaction(&self.recorder, PORT, "get_bool_input", &json!({"name": name}), &value);
        value
    }

    fn get_auth_token(&self) -> Option<String> {
        let token = self.inner.get_auth_token();
        if let Some(secret) = &token {
            self.recorder.lock().expect("recorder lock poisoned").mask(secret.as_str());
        }
        let masked = token.as_ref().map(|_| MASK);
        record_interaction(&self.recorder, PORT, "get_auth_token", &json!({}), &masked);
        token
    }

    fn which(&self, tool: &str) -> Option<PathBuf> {
        let path = self.inner.which(tool);
        record_interaction(&self.recorder, PORT, "which", &json!({"tool": tool}), &path);
        path
    }

    fn detect_platform(&self) -> Result<Platform, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.detect_platform();
        record_result(&self.recorder, PORT, "detect_platform", &json!({}), &result);
        result
    }

    fn working_directory(&self) -> PathBuf {
        let cwd = self.inner.working_directory();
        record_interaction(&self.recorder, PORT, "working_directory", &json!({}), &cwd);
        cwd
    }

    fn report_result(&self, result: TaskResult, message: &str) {
        self.inner.report_result(result, message);
        record_interaction(
            &self.recorder,
            PORT,
            "report_result",
            &json!({"result": result, "message": message}),
            &(),
        );
    }

    fn attach_artifact(&self, kind: AttachmentKind, name: &str, path: &Path) {
        self.inner.attach_artifact(kind, name, path);
        record_interaction(
            &self.recorder,
            PORT,
            "attach_artifact",
            &json!({"kind": kind, "name": name, "path": path}),
            &(),
        );
    }
}
