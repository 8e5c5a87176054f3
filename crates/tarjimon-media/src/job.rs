use std::path::{Path, PathBuf};
use tarjimon_core::Modality;
use tracing::warn;

/// One accepted unit of media work. The local file is a per-request
/// temporary; whoever runs the job owns its cleanup through [`TempGuard`].
#[derive(Debug, Clone)]
pub struct MediaJob {
    pub file_id: String,
    pub local_path: PathBuf,
    pub modality: Modality,
    /// Declared source language of the session's direction (ISO-639-1).
    pub source_lang: String,
}

/// Removes its tracked files when dropped, so temporary media artifacts
/// disappear on success, failure, and early-return paths alike.
pub struct TempGuard {
    paths: Vec<PathBuf>,
}

impl TempGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    /// Track an additional artifact produced mid-job (e.g. a decoded
    /// waveform next to the input).
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                }
            }
        }
    }
}

/// Defensive cleanup before a path is reused: stale leftovers from a
/// crashed run must not be mistaken for this request's download.
pub fn remove_stale(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove stale file");
        }
    }
}
