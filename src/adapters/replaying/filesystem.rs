//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use serde_json::json;

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem queries, matched by path.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn lookup(&self, method: &str, path: &Path) -> Option<serde_json::Value> {
        let replayer = self.replayer.lock().expect("replayer lock poisoned");
        replayer.find("fs", method, &json!({"path": path})).map(|i| i.output.clone())
    }
}

impl FileSystem for ReplayingFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lookup("exists", path).and_then(|output| output.as_bool()).unwrap_or(false)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self.lookup("create_dir_all", path) {
            Some(output) => extract_result(&output, "fs::create_dir_all"),
            None => Err(format!("no directory creation recorded for {}", path.display()).into()),
        }
    }
}
