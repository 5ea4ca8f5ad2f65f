//! Lifecycle of generated report archives.
//!
//! The store owns the archive bytes; everyone else only ever sees an opaque
//! [`ArtifactHandle`]. At most one handle is live at a time and every handle
//! is released explicitly, either when superseded or when the session ends.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;

/// Base name of the downloaded archive
pub const DEFAULT_ARCHIVE_BASENAME: &str = "pdf_reports";

/// Extension of the downloaded archive, dot included
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Opaque reference to a live archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(u64);

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "artifact-{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("no generated report is available")]
    NoResult,

    #[error("{0} has already been released")]
    NotLive(ArtifactHandle),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counters used to check that nothing leaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactStats {
    pub created: u64,
    pub released: u64,
}

impl ArtifactStats {
    pub fn live(&self) -> u64 {
        self.created - self.released
    }
}

/// Per-session owner of archive bytes
#[derive(Debug, Default)]
pub struct ArtifactStore {
    live: HashMap<ArtifactHandle, Bytes>,
    next_id: u64,
    stats: ArtifactStats,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new archive, releasing whatever was live before.
    pub fn create(&mut self, bytes: Bytes) -> ArtifactHandle {
        self.release_all();

        self.next_id += 1;
        let handle = ArtifactHandle(self.next_id);
        tracing::debug!(%handle, bytes = bytes.len(), "Artifact created");
        self.live.insert(handle, bytes);
        self.stats.created += 1;
        handle
    }

    /// Release a handle. Unknown or already released handles are ignored.
    ///
    /// Returns true if this call actually freed something.
    pub fn release(&mut self, handle: ArtifactHandle) -> bool {
        if self.live.remove(&handle).is_some() {
            self.stats.released += 1;
            tracing::debug!(%handle, "Artifact released");
            true
        } else {
            false
        }
    }

    /// Release every live handle (session teardown)
    pub fn release_all(&mut self) {
        let handles: Vec<ArtifactHandle> = self.live.keys().copied().collect();
        for handle in handles {
            self.release(handle);
        }
    }

    pub fn is_live(&self, handle: ArtifactHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn bytes(&self, handle: ArtifactHandle) -> Option<&Bytes> {
        self.live.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn stats(&self) -> ArtifactStats {
        self.stats
    }

    /// Write a live archive into `dir` under the suggested file name.
    ///
    /// The handle stays live so the archive can be downloaded again.
    pub fn download(&self, handle: ArtifactHandle, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let bytes = self.bytes(handle).ok_or(ArtifactError::NotLive(handle))?;
        let path = dir.join(suggested_file_name());

        std::fs::create_dir_all(dir).map_err(|source| ArtifactError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        std::fs::write(&path, bytes).map_err(|source| ArtifactError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(%handle, path = %path.display(), bytes = bytes.len(), "Archive downloaded");
        Ok(path)
    }
}

impl Drop for ArtifactStore {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            tracing::warn!(
                live = self.live.len(),
                "Artifact store dropped with live handles; session was not closed"
            );
        }
    }
}

/// File name offered for the downloaded archive
pub fn suggested_file_name() -> String {
    format!("{}{}", DEFAULT_ARCHIVE_BASENAME, ARCHIVE_EXTENSION)
}
