//! Read-only status probes for resolved data paths.
//!
//! A probe only looks at filesystem metadata. It never opens the vector store
//! or parses the CSV; those belong to the systems that consume the paths.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::DataDirError;
use crate::resolver::{EnvSource, PathOrigin, PathResolver, ResolvedPath};
use crate::resource::{DataResource, ResourceKind};

/// Report sources above this size are flagged as too large to keep in
/// version control.
pub const LARGE_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// What was actually found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

impl EntryKind {
    fn of(metadata: &fs::Metadata) -> Self {
        if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    fn matches(self, expected: ResourceKind) -> bool {
        matches!(
            (self, expected),
            (EntryKind::Directory, ResourceKind::Directory) | (EntryKind::File, ResourceKind::File)
        )
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => write!(f, "directory"),
            EntryKind::File => write!(f, "file"),
            EntryKind::Other => write!(f, "other"),
        }
    }
}

/// Outcome of probing a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PathState {
    Missing,
    Present,
    WrongKind { found: EntryKind },
}

/// Status of one resolved resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStatus {
    pub resource: DataResource,
    /// Path as probed, with `~` expanded.
    pub path: PathBuf,
    #[serde(flatten)]
    pub origin: PathOrigin,
    pub expected: ResourceKind,
    #[serde(flatten)]
    pub state: PathState,
    /// File size, or total size of regular files under a directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub large: bool,
}

impl PathStatus {
    pub fn is_available(&self) -> bool {
        self.state == PathState::Present
    }
}

/// Probe a resolved path.
pub fn probe(resolved: &ResolvedPath) -> Result<PathStatus, DataDirError> {
    let path = resolved.expanded();
    let expected = resolved.kind();

    let (state, size_bytes) = match fs::metadata(&path) {
        Ok(metadata) => {
            let found = EntryKind::of(&metadata);
            if !found.matches(expected) {
                (PathState::WrongKind { found }, None)
            } else if metadata.is_dir() {
                (PathState::Present, Some(directory_size(&path)?))
            } else {
                (PathState::Present, Some(metadata.len()))
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => (PathState::Missing, None),
        Err(source) => return Err(DataDirError::Io { path, source }),
    };

    let large =
        expected == ResourceKind::File && size_bytes.is_some_and(|n| n > LARGE_FILE_BYTES);
    if large {
        warn!(
            "{} at {} is {} bytes; keep it out of version control",
            resolved.resource.label(),
            path.display(),
            size_bytes.unwrap_or_default()
        );
    }
    debug!(resource = %resolved.resource, state = ?state, "Probed data path");

    Ok(PathStatus {
        resource: resolved.resource,
        path,
        origin: resolved.origin.clone(),
        expected,
        state,
        size_bytes,
        large,
    })
}

fn directory_size(dir: &Path) -> Result<u64, DataDirError> {
    let mut total = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            DataDirError::Io {
                path,
                source: e.into(),
            }
        })?;
        if entry.file_type().is_file() {
            let metadata = entry.metadata().map_err(|e| DataDirError::Io {
                path: entry.path().to_path_buf(),
                source: e.into(),
            })?;
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Status of every data directory resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataDirReport {
    pub entries: Vec<PathStatus>,
}

impl DataDirReport {
    /// Resolve and probe every resource.
    pub fn collect<E: EnvSource>(resolver: &PathResolver<E>) -> Result<Self, DataDirError> {
        let entries = resolver
            .resolve_all()
            .iter()
            .map(probe)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn all_available(&self) -> bool {
        self.entries.iter().all(PathStatus::is_available)
    }

    pub fn get(&self, resource: DataResource) -> Option<&PathStatus> {
        self.entries.iter().find(|entry| entry.resource == resource)
    }

    /// Resources that are missing or of the wrong kind.
    pub fn unavailable(&self) -> impl Iterator<Item = &PathStatus> {
        self.entries.iter().filter(|entry| !entry.is_available())
    }
}
