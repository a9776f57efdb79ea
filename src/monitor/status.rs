use crate::error::EntryError;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a file differs from the tracked set.
///
/// Renames are not detected: a renamed file shows up as one `Deleted` and
/// one `Added`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Path appeared since the previous pass
    Added(PathBuf),
    /// Path was modified after the snapshot time
    Modified(PathBuf),
    /// Path is gone from the directory
    Deleted(PathBuf),
}

impl FileStatus {
    /// Returns the path associated with the file status.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Added(p) | Self::Modified(p) | Self::Deleted(p) => p,
        }
    }

    /// Base name of the path
    #[must_use]
    pub fn filename(&self) -> String {
        let path = self.path();
        path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    /// The user-facing status line, e.g. `notes.txt is a new file.`
    #[must_use]
    pub fn message(&self) -> String {
        let name = self.filename();
        match self {
            Self::Added(_) => format!("{name} is a new file."),
            Self::Modified(_) => format!("{name} has changed."),
            Self::Deleted(_) => format!("{name} was deleted."),
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of one diff pass
#[derive(Debug, Default)]
pub struct StatusReport {
    /// Reported differences: deletions first, then additions and
    /// modifications in path order
    pub changes: Vec<FileStatus>,
    /// Entries skipped in this pass; the tracked set is unchanged for them
    pub errors: Vec<EntryError>,
}

impl StatusReport {
    /// No changes and no errors
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty() && self.errors.is_empty()
    }

    /// Paths reported as added
    pub fn added(&self) -> impl Iterator<Item = &Path> {
        self.changes
            .iter()
            .filter(|c| matches!(c, FileStatus::Added(_)))
            .map(FileStatus::path)
    }

    /// Paths reported as modified
    pub fn modified(&self) -> impl Iterator<Item = &Path> {
        self.changes
            .iter()
            .filter(|c| matches!(c, FileStatus::Modified(_)))
            .map(FileStatus::path)
    }

    /// Paths reported as deleted
    pub fn deleted(&self) -> impl Iterator<Item = &Path> {
        self.changes
            .iter()
            .filter(|c| matches!(c, FileStatus::Deleted(_)))
            .map(FileStatus::path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;

    #[test]
    fn test_messages() {
        let added = FileStatus::Added(PathBuf::from("dir/new.txt"));
        let modified = FileStatus::Modified(PathBuf::from("dir/main.cpp"));
        let deleted = FileStatus::Deleted(PathBuf::from("dir/old.png"));

        assert_eq!(added.to_string(), "new.txt is a new file.");
        assert_eq!(modified.to_string(), "main.cpp has changed.");
        assert_eq!(deleted.to_string(), "old.png was deleted.");
    }

    #[test]
    fn test_report_filters() {
        let report = StatusReport {
            changes: vec![
                FileStatus::Deleted(PathBuf::from("a")),
                FileStatus::Added(PathBuf::from("b")),
                FileStatus::Added(PathBuf::from("c")),
            ],
            errors: Vec::new(),
        };

        assert_eq!(report.added().count(), 2);
        assert_eq!(report.deleted().collect::<Vec<_>>(), [Path::new("a")]);
        assert_eq!(report.modified().count(), 0);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_errors_make_report_unclean() {
        let report = StatusReport {
            changes: Vec::new(),
            errors: vec![EntryError::new(MonitorError::NotARegularFile {
                path: PathBuf::from("x"),
            })],
        };
        assert!(!report.is_clean());
        assert!(StatusReport::default().is_clean());
    }
}
