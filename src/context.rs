//! Service context bundling all port trait objects.

use std::path::Path;

use tracing::warn;

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveProcessRunner, LiveTaskHost};
use crate::adapters::recording::{
    RecordingClock, RecordingFileSystem, RecordingProcessRunner, RecordingTaskHost,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingFileSystem, ReplayingProcessRunner, ReplayingTaskHost,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::ports::{
    AttachmentKind, Clock, ExecOptions, FileSystem, Platform, ProcessRunner, TaskHost, TaskResult,
};

/// One trait object per external boundary of a run.
pub struct ServiceContext {
    /// Pipeline host supplying inputs and receiving the verdict.
    pub host: Box<dyn TaskHost>,
    /// Launches external commands.
    pub process: Box<dyn ProcessRunner>,
    /// Report directory creation and report lookup.
    pub fs: Box<dyn FileSystem>,
    /// Time source for report file names.
    pub clock: Box<dyn Clock>,
}

impl ServiceContext {
    /// Creates a context from concrete adapters, reading the system clock.
    pub fn new(
        host: impl TaskHost + 'static,
        process: impl ProcessRunner + 'static,
        fs: impl FileSystem + 'static,
    ) -> Self {
        Self {
            host: Box::new(host),
            process: Box::new(process),
            fs: Box::new(fs),
            clock: Box::new(LiveClock),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Creates a live context against the real agent.
    #[must_use]
    pub fn live() -> Self {
        Self::new(LiveTaskHost, LiveProcessRunner, LiveFileSystem)
    }

    /// Creates a live context whose interactions are recorded under `root`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the recording directory cannot be created.
    pub fn recording_at(root: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root)?;
        let ctx = Self::new(
            RecordingTaskHost::new(Box::new(LiveTaskHost), session.host.clone()),
            RecordingProcessRunner::new(Box::new(LiveProcessRunner), session.process.clone()),
            RecordingFileSystem::new(Box::new(LiveFileSystem), session.fs.clone()),
        )
        .with_clock(RecordingClock::new(Box::new(LiveClock), session.clock.clone()));
        Ok((ctx, session))
    }

    /// Creates a replaying context from per-port cassettes.
    ///
    /// Host and filesystem ports without a cassette panic with a clear message
    /// when called. Without a process cassette every execution fails; without
    /// a clock cassette the system clock is used.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            host: match replayers.host {
                Some(r) => Box::new(ReplayingTaskHost::new(r)),
                None => Box::new(PanickingTaskHost),
            },
            process: match replayers.process {
                Some(r) => Box::new(ReplayingProcessRunner::new(r)),
                None => Box::new(UnrecordedProcessRunner),
            },
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => {
                    warn!("no clock cassette, report names use the system clock");
                    Box::new(LiveClock)
                }
            },
        })
    }
}

// --- Panicking adapters for ports without a cassette ---

const NO_HOST: &str = "TaskHost port not configured in CassetteConfig: no cassette loaded for host";

struct PanickingTaskHost;
impl TaskHost for PanickingTaskHost {
    fn get_input(
        &self,
        _name: &str,
        _required: bool,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("{NO_HOST}");
    }
    fn get_bool_input(&self, _name: &str, _default: bool) -> bool {
        panic!("{NO_HOST}");
    }
    fn get_auth_token(&self) -> Option<String> {
        panic!("{NO_HOST}");
    }
    fn which(&self, _tool: &str) -> Option<std::path::PathBuf> {
        panic!("{NO_HOST}");
    }
    fn detect_platform(&self) -> Result<Platform, Box<dyn std::error::Error + Send + Sync>> {
        panic!("{NO_HOST}");
    }
    fn working_directory(&self) -> std::path::PathBuf {
        panic!("{NO_HOST}");
    }
    fn report_result(&self, _result: TaskResult, _message: &str) {
        panic!("{NO_HOST}");
    }
    fn attach_artifact(&self, _kind: AttachmentKind, _name: &str, _path: &Path) {
        panic!("{NO_HOST}");
    }
}

struct UnrecordedProcessRunner;
impl ProcessRunner for UnrecordedProcessRunner {
    fn execute(
        &self,
        program: &Path,
        _args: &[String],
        _options: &ExecOptions,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("no process cassette loaded, cannot replay {}", program.display()).into())
    }
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn exists(&self, _path: &Path) -> bool {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn create_dir_all(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
}
