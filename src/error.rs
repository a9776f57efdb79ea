//! Error types for scanning and record construction.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors produced while building records or running a diff pass.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitored directory is missing or cannot be read.
    #[error("Cannot access monitored directory {path}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The monitored path exists but is not a directory.
    #[error("Monitored path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A listed entry is not a regular file.
    #[error("Not a regular file: {path}")]
    NotARegularFile { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path vanished between listing and access.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking filesystem call did not finish in time.
    #[error("Timed out after {limit:?} at {path}")]
    Timeout { path: PathBuf, limit: Duration },
}

/// A failure confined to one directory entry during a scan.
///
/// The tracked set is left as it was for that entry: an existing record is
/// kept, a new one is not inserted.
#[derive(Debug, Error)]
#[error("{}: {error}", display_name(.path))]
pub struct EntryError {
    /// Entry the failure belongs to
    pub path: PathBuf,
    /// What went wrong
    #[source]
    pub error: MonitorError,
}

impl EntryError {
    /// Wraps `error` for the entry at its own path.
    #[must_use]
    pub fn new(error: MonitorError) -> Self {
        Self {
            path: error.path().to_path_buf(),
            error,
        }
    }

    /// Base name of the entry for user-facing messages
    #[must_use]
    pub fn filename(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

impl MonitorError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a timeout error for `path`.
    pub fn timeout(path: impl Into<PathBuf>, limit: Duration) -> Self {
        Self::Timeout {
            path: path.into(),
            limit,
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootUnavailable { path, .. }
            | Self::NotADirectory { path }
            | Self::NotARegularFile { path }
            | Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::Timeout { path, .. } => path,
        }
    }

    /// Whether the error concerns the monitored directory itself rather than
    /// one of its entries.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RootUnavailable { .. } | Self::NotADirectory { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_is_categorized() {
        let err = MonitorError::io("a.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, MonitorError::NotFound { .. }));

        let err = MonitorError::io("a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, MonitorError::PermissionDenied { .. }));

        let err = MonitorError::io("a.txt", io::Error::other("disk on fire"));
        assert!(matches!(err, MonitorError::Io { .. }));
        assert_eq!(err.path(), Path::new("a.txt"));
    }

    #[test]
    fn test_entry_error_uses_file_name() {
        let err = EntryError::new(MonitorError::io(
            "dir/notes.txt",
            io::Error::from(io::ErrorKind::PermissionDenied),
        ));
        assert_eq!(err.filename(), "notes.txt");
        assert_eq!(err.to_string(), "notes.txt: Permission denied: dir/notes.txt");
    }

    #[test]
    fn test_fatal_classification() {
        let root = MonitorError::NotADirectory {
            path: PathBuf::from("dir"),
        };
        assert!(root.is_fatal());
        assert!(!MonitorError::timeout("x", Duration::from_secs(1)).is_fatal());
    }
}
