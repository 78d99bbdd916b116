//! Report files generated from `snyk test --json` and their attachment.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::context::ServiceContext;
use crate::ports::AttachmentKind;

/// JSON and HTML report paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    /// `snyk test --json` output.
    pub json: PathBuf,
    /// `snyk-to-html` output.
    pub html: PathBuf,
}

impl ReportFiles {
    /// Paths under `dir`, stamped with `at`.
    #[must_use]
    pub fn new(dir: &Path, at: DateTime<Utc>) -> Self {
        let stamp = file_stamp(at);
        Self {
            json: dir.join(format!("report-{stamp}.json")),
            html: dir.join(format!("report-{stamp}.html")),
        }
    }

    /// Attaches whichever of the two reports exist. Returns how many were
    /// attached.
    pub fn attach(&self, ctx: &ServiceContext) -> usize {
        [(&self.json, AttachmentKind::JsonReport), (&self.html, AttachmentKind::HtmlReport)]
            .into_iter()
            .filter(|(path, kind)| attach_report(ctx, path, *kind))
            .count()
    }
}

/// ISO-8601 timestamp to the second, with `:` replaced so it is usable in a
/// file name.
#[must_use]
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Attaches `path` if it exists. Returns whether it was attached.
pub fn attach_report(ctx: &ServiceContext, path: &Path, kind: AttachmentKind) -> bool {
    if !ctx.fs.exists(path) {
        info!(path = %path.display(), "report does not exist, cannot attach");
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        warn!(path = %path.display(), "report has no usable file name, cannot attach");
        return false;
    };
    info!(path = %path.display(), kind = kind.as_str(), "report exists, attaching file");
    ctx.host.attach_artifact(kind, name, path);
    true
}
