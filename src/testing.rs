//! In-memory port doubles shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::ports::{
    AttachmentKind, Clock, ExecOptions, FileSystem, Platform, ProcessRunner, TaskHost, TaskResult,
};

type Attachment = (AttachmentKind, String, PathBuf);

/// Host answering from fixed tables and capturing everything reported to it.
#[derive(Clone, Default)]
pub struct StubHost {
    inputs: HashMap<String, String>,
    tools: HashMap<String, PathBuf>,
    platform: Option<Platform>,
    token: Option<String>,
    cwd: Option<PathBuf>,
    results: Arc<Mutex<Vec<(TaskResult, String)>>>,
    attachments: Arc<Mutex<Vec<Attachment>>>,
}

impl StubHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    pub fn tool(mut self, name: &str, path: &str) -> Self {
        self.tools.insert(name.into(), PathBuf::from(path));
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn platform_error(mut self) -> Self {
        self.platform = None;
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(PathBuf::from(cwd));
        self
    }

    pub fn results(&self) -> Vec<(TaskResult, String)> {
        self.results.lock().unwrap().clone()
    }

    pub fn attachments(&self) -> Vec<Attachment> {
        self.attachments.lock().unwrap().clone()
    }
}

impl TaskHost for StubHost {
    fn get_input(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let value = self.inputs.get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if required && value.is_none() {
            return Err(format!("Input required: {name}").into());
        }
        Ok(value)
    }

    fn get_bool_input(&self, name: &str, default: bool) -> bool {
        self.inputs.get(name).map_or(default, |v| v.eq_ignore_ascii_case("true"))
    }

    fn get_auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn which(&self, tool: &str) -> Option<PathBuf> {
        self.tools.get(tool).cloned()
    }

    fn detect_platform(&self) -> Result<Platform, Box<dyn std::error::Error + Send + Sync>> {
        self.platform.ok_or_else(|| "platform not mocked".into())
    }

    fn working_directory(&self) -> PathBuf {
        self.cwd.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn report_result(&self, result: TaskResult, message: &str) {
        self.results.lock().unwrap().push((result, message.to_string()));
    }

    fn attach_artifact(&self, kind: AttachmentKind, name: &str, path: &Path) {
        self.attachments.lock().unwrap().push((kind, name.to_string(), path.to_path_buf()));
    }
}

/// Runner returning scripted exit codes in order and logging each call.
#[derive(Clone)]
pub struct ScriptedRunner {
    codes: Arc<Mutex<Vec<i32>>>,
    calls: Arc<Mutex<Vec<(String, ExecOptions)>>>,
}

impl ScriptedRunner {
    pub fn new(codes: &[i32]) -> Self {
        let mut codes = codes.to_vec();
        codes.reverse();
        Self { codes: Arc::new(Mutex::new(codes)), calls: Arc::default() }
    }

    /// `program arg1 arg2 ...` for every call, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(line, _)| line.clone()).collect()
    }

    pub fn options(&self) -> Vec<ExecOptions> {
        self.calls.lock().unwrap().iter().map(|(_, options)| options.clone()).collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let line = std::iter::once(program.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push((line.clone(), options.clone()));
        let code = self.codes.lock().unwrap().pop();
        code.ok_or_else(|| format!("unscripted command: {line}").into())
    }
}

/// Filesystem with nothing on it, where directories can always be created.
pub struct NoFiles;

impl FileSystem for NoFiles {
    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// Filesystem holding a fixed set of files and remembering created
/// directories.
#[derive(Clone, Default)]
pub struct FakeFiles {
    files: HashSet<PathBuf>,
    read_only: bool,
    created: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Refuses to create directories.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap().clone()
    }
}

impl FileSystem for FakeFiles {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path) || self.created.lock().unwrap().iter().any(|dir| dir == path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.read_only {
            return Err(format!("permission denied: {}", path.display()).into());
        }
        self.created.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Parses an RFC 3339 timestamp.
pub fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp).unwrap().with_timezone(&Utc)
}

/// Clock stopped at one instant.
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(timestamp: &str) -> Self {
        Self(at(timestamp))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
