//! Accumulates port interactions and writes them as one cassette.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use super::format::{Cassette, Interaction};

/// Stand-in written wherever a secret would appear in a cassette.
pub const MASK: &str = "***";

/// Collects interactions for a single port during a live run.
///
/// Secrets registered with [`mask`](Self::mask) never reach disk: every
/// string value containing one has it replaced by [`MASK`] when the cassette
/// is written.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    source_version: String,
    interactions: Vec<Interaction>,
    secrets: Vec<String>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        source_version: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            source_version: source_version.into(),
            interactions: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Append an interaction; its `seq` is its position.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: Value,
        output: Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Register a value that must not be written in clear.
    ///
    /// Empty values and the mask itself are ignored.
    pub fn mask(&mut self, secret: impl Into<String>) {
        let secret = secret.into();
        if !secret.is_empty() && secret != MASK && !self.secrets.contains(&secret) {
            self.secrets.push(secret);
        }
    }

    /// Secrets registered so far.
    #[must_use]
    pub fn secrets(&self) -> &[String] {
        &self.secrets
    }

    /// Write the cassette YAML file and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(mut self) -> Result<PathBuf, std::io::Error> {
        let leaks: usize = self
            .interactions
            .iter_mut()
            .map(|i| scrub(&mut i.input, &self.secrets) + scrub(&mut i.output, &self.secrets))
            .sum();
        if leaks > 0 {
            warn!(cassette = %self.name, leaks, "masked secrets that reached the recording");
        }

        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            source_version: self.source_version,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

/// Masks every secret found in a string of `value`; returns how many strings
/// changed.
fn scrub(value: &mut Value, secrets: &[String]) -> usize {
    match value {
        Value::String(text) => {
            let masked = secrets
                .iter()
                .fold(text.clone(), |acc, secret| acc.replace(secret.as_str(), MASK));
            if masked == *text {
                0
            } else {
                *text = masked;
                1
            }
        }
        Value::Array(items) => items.iter_mut().map(|item| scrub(item, secrets)).sum(),
        Value::Object(fields) => fields.values_mut().map(|field| scrub(field, secrets)).sum(),
        _ => 0,
    }
}
