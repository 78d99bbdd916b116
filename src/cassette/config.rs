//! Which cassette file serves which port during replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Cassette file name for `port` inside a recording directory.
#[must_use]
pub fn cassette_file_name(port: &str) -> String {
    format!("{port}.cassette.yaml")
}

/// Per-port cassette file paths. Ports without a cassette panic if called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the task host cassette.
    pub host: Option<PathBuf>,
    /// Path to the process runner cassette.
    pub process: Option<PathBuf>,
    /// Path to the filesystem cassette.
    pub fs: Option<PathBuf>,
    /// Path to the clock cassette.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the task host.
    pub host: Option<CassetteReplayer>,
    /// Replayer for the process runner.
    pub process: Option<CassetteReplayer>,
    /// Replayer for the filesystem.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the clock.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Uses whichever per-port cassettes exist in a recording directory.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            Some(dir.join(cassette_file_name(port))).filter(|path| path.is_file())
        };
        Self {
            host: existing("host"),
            process: existing("process"),
            fs: existing("fs"),
            clock: existing("clock"),
        }
    }

    /// Whether no port has a cassette.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.process.is_none() && self.fs.is_none() && self.clock.is_none()
    }

    /// Load one cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_port_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            host: self.host.as_deref().map(Self::load_port_cassette).transpose()?,
            process: self.process.as_deref().map(Self::load_port_cassette).transpose()?,
            fs: self.fs.as_deref().map(Self::load_port_cassette).transpose()?,
            clock: self.clock.as_deref().map(Self::load_port_cassette).transpose()?,
        })
    }
}
