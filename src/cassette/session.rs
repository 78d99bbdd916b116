//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::config::cassette_file_name;
use super::recorder::CassetteRecorder;

/// Per-port recorders for one recorded run, written under
/// `<root>/<timestamp>/`.
pub struct RecordingSession {
    /// Recorder for task host interactions.
    pub host: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for process executions.
    pub process: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for filesystem queries.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock readings.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session with a fresh timestamped directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let source_version = source_version();
        let make_recorder = |port: &str| {
            Arc::new(Mutex::new(CassetteRecorder::new(
                output_dir.join(cassette_file_name(port)),
                format!("{timestamp}-{port}"),
                &source_version,
            )))
        };

        Ok(Self {
            host: make_recorder("host"),
            process: make_recorder("process"),
            fs: make_recorder("fs"),
            clock: make_recorder("clock"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every cassette and return the output directory.
    ///
    /// The recording adapters must have been dropped first. A secret
    /// registered with any port's recorder is masked in every cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file cannot
    /// be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn take(
            arc: Arc<Mutex<CassetteRecorder>>,
            port: &str,
        ) -> Result<CassetteRecorder, String> {
            Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))
        }

        let recorders = [
            ("host", take(self.host, "host")?),
            ("process", take(self.process, "process")?),
            ("fs", take(self.fs, "fs")?),
            ("clock", take(self.clock, "clock")?),
        ];

        let secrets: Vec<String> =
            recorders.iter().flat_map(|(_, r)| r.secrets().to_vec()).collect();
        for (port, mut recorder) in recorders {
            for secret in &secrets {
                recorder.mask(secret.as_str());
            }
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
        }
        Ok(self.output_dir)
    }
}

/// Source version of the build being scanned, or `unknown`.
fn source_version() -> String {
    match std::env::var("BUILD_SOURCEVERSION") {
        Ok(version) if !version.is_empty() => version,
        _ => {
            warn!("BUILD_SOURCEVERSION not set, recording source version as 'unknown'");
            "unknown".to_string()
        }
    }
}
