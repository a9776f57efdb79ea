//! File records and their type-specific metrics.
//!
//! A [`FileRecord`] is built once per tracked path. Its [`FileKind`] is picked
//! from the extension at that moment, and text and source files are read a
//! single time to compute their metrics. Later changes to the file only move
//! its last-update time; the metrics stay as they were unless the monitor
//! rebuilds the record.
//!
//! # Example
//!
//! ```no_run
//! use foldmon::record::{FileRecord, RecordOptions, analyzer::HeuristicAnalyzer};
//! use foldmon::utils::formatters::TimestampFormat;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let record = FileRecord::open(
//!     Path::new("test_folder/notes.txt"),
//!     &RecordOptions::default(),
//!     &HeuristicAnalyzer,
//! )?;
//! print!("{}", record.describe(TimestampFormat::Unix));
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod kind;
pub mod metrics;
mod report;

pub use analyzer::{CodeAnalyzer, HeuristicAnalyzer};
pub use kind::FileKind;
pub use metrics::{ProgramMetrics, TextMetrics};
pub use report::Report;

use crate::error::MonitorError;
use crate::utils::formatters::{TimestampFormat, format_timestamp};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Options that affect how a record is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Read the creation time from the filesystem birth time when available.
    ///
    /// When off, creation and last-update time both come from the same
    /// modification-time read.
    pub use_birth_time: bool,
}

/// Variant-specific data of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDetails {
    /// No extra metrics
    Generic,
    /// No extra metrics; image content is never decoded
    Image,
    /// Text metrics
    Text(TextMetrics),
    /// Source code metrics
    Program(ProgramMetrics),
}

impl FileDetails {
    /// The kind this data belongs to
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        match self {
            Self::Generic => FileKind::Generic,
            Self::Image => FileKind::Image,
            Self::Text(_) => FileKind::Text,
            Self::Program(_) => FileKind::Program,
        }
    }

    fn append_to(&self, report: &mut Report) {
        match self {
            Self::Generic | Self::Image => {}
            Self::Text(m) => {
                report.push("Lines", m.lines);
                report.push("Words", m.words);
                report.push("Characters", m.characters);
            }
            Self::Program(m) => {
                report.push("Lines", m.lines);
                report.push("Classes", m.classes);
                report.push("Methods", m.methods);
            }
        }
    }
}

/// A tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    filename: String,
    extension: String,
    created: SystemTime,
    last_updated: SystemTime,
    details: FileDetails,
}

impl FileRecord {
    /// Builds a record for `path`.
    ///
    /// Text and source files are read once, line by line, to compute their
    /// metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be accessed, is not a regular file,
    /// or its content cannot be read. No record is produced in that case.
    pub fn open(
        path: &Path,
        options: &RecordOptions,
        analyzer: &dyn CodeAnalyzer,
    ) -> Result<Self, MonitorError> {
        let metadata = fs::metadata(path).map_err(|e| MonitorError::io(path, e))?;
        if !metadata.is_file() {
            return Err(MonitorError::NotARegularFile {
                path: path.to_path_buf(),
            });
        }

        let last_updated = metadata.modified().map_err(|e| MonitorError::io(path, e))?;
        let created = if options.use_birth_time {
            metadata.created().unwrap_or(last_updated)
        } else {
            last_updated
        };

        let extension = kind::extension_of(path);
        let kind = FileKind::from_extension(&extension);

        let details = match kind {
            FileKind::Generic => FileDetails::Generic,
            FileKind::Image => FileDetails::Image,
            FileKind::Text => {
                let mut reader = open_reader(path)?;
                let metrics =
                    metrics::analyze_text(&mut reader).map_err(|e| MonitorError::io(path, e))?;
                FileDetails::Text(metrics)
            }
            FileKind::Program => {
                let mut reader = open_reader(path)?;
                let metrics = analyzer
                    .analyze(&mut reader)
                    .map_err(|e| MonitorError::io(path, e))?;
                FileDetails::Program(metrics)
            }
        };

        debug!(path = %path.display(), %kind, "built file record");

        Ok(Self {
            path: path.to_path_buf(),
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension,
            created,
            last_updated,
            details,
        })
    }

    /// Full path, the key in the tracked set
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the path
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Extension including the leading dot, possibly empty
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Creation time
    #[must_use]
    pub const fn created(&self) -> SystemTime {
        self.created
    }

    /// Latest known modification time
    #[must_use]
    pub const fn last_updated(&self) -> SystemTime {
        self.last_updated
    }

    /// Variant data
    #[must_use]
    pub const fn details(&self) -> &FileDetails {
        &self.details
    }

    /// Variant
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        self.details.kind()
    }

    /// Whether the file was last updated after `reference`.
    #[must_use]
    pub fn is_changed(&self, reference: SystemTime) -> bool {
        self.last_updated > reference
    }

    /// Records a modification time read from disk.
    ///
    /// Returns `true` if it differs from the stored one. Metrics are left
    /// untouched.
    pub fn observe(&mut self, modified: SystemTime) -> bool {
        if modified == self.last_updated {
            return false;
        }
        self.last_updated = modified;
        true
    }

    /// Takes metrics and last-update time from a record rebuilt for the
    /// same path. Path, name, extension and creation time are kept.
    pub fn update_from(&mut self, fresh: Self) {
        debug_assert_eq!(self.path, fresh.path);
        self.last_updated = fresh.last_updated;
        self.details = fresh.details;
    }

    /// Describes the record, base fields first, then type and metrics.
    #[must_use]
    pub fn describe(&self, format: TimestampFormat) -> Report {
        let mut report = Report::new();
        report.push("Filename", &self.filename);
        report.push("Extension", &self.extension);
        report.push("Creation Time", format_timestamp(self.created, format));
        report.push("Last Updated", format_timestamp(self.last_updated, format));
        if let Some(label) = self.kind().type_label() {
            report.push("Type", label);
        }
        self.details.append_to(&mut report);
        report
    }
}

fn open_reader(path: &Path) -> Result<BufReader<File>, MonitorError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| MonitorError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn open(path: &Path) -> Result<FileRecord, MonitorError> {
        FileRecord::open(path, &RecordOptions::default(), &HeuristicAnalyzer)
    }

    #[test]
    fn test_text_record() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("notes.txt");
        fs::write(&path, "a b\n\nc\n")?;

        let record = open(&path)?;
        assert_eq!(record.filename(), "notes.txt");
        assert_eq!(record.extension(), ".txt");
        assert_eq!(
            record.details(),
            &FileDetails::Text(TextMetrics {
                lines: 3,
                words: 4,
                characters: 4,
            })
        );
        Ok(())
    }

    #[test]
    fn test_program_record_ignores_content_kind() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("readme.cpp");
        fs::write(&path, "just prose, no code\n")?;

        let record = open(&path)?;
        assert_eq!(record.kind(), FileKind::Program);
        assert_eq!(
            record.details(),
            &FileDetails::Program(ProgramMetrics {
                lines: 1,
                classes: 0,
                methods: 0,
            })
        );
        Ok(())
    }

    #[test]
    fn test_image_and_generic_records() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let png = dir.path().join("logo.png");
        let bmp = dir.path().join("logo.bmp");
        fs::write(&png, [0x89, b'P', b'N', b'G'])?;
        fs::write(&bmp, b"BM")?;

        assert_eq!(open(&png)?.details(), &FileDetails::Image);
        assert_eq!(open(&bmp)?.details(), &FileDetails::Generic);
        Ok(())
    }

    #[test]
    fn test_timestamps_share_modification_time() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.bin");
        fs::write(&path, b"x")?;
        set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000, 0))?;

        let record = open(&path)?;
        let expected = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(record.created(), expected);
        assert_eq!(record.last_updated(), expected);
        Ok(())
    }

    #[test]
    fn test_birth_time_used_when_requested() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.bin");
        fs::write(&path, b"x")?;
        set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000, 0))?;

        let options = RecordOptions {
            use_birth_time: true,
        };
        let record = FileRecord::open(&path, &options, &HeuristicAnalyzer)?;
        let modified = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(record.last_updated(), modified);

        // Filesystems without birth times fall back to the modification time
        match fs::metadata(&path)?.created() {
            Ok(birth) => assert_eq!(record.created(), birth),
            Err(_) => assert_eq!(record.created(), modified),
        }

        let rebuilt = FileRecord::open(&path, &options, &HeuristicAnalyzer)?;
        assert_eq!(rebuilt.created(), record.created());
        Ok(())
    }

    #[test]
    fn test_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let err = open(&dir.path().join("gone.txt")).unwrap_err();
        assert!(matches!(err, MonitorError::NotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_a_record() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested.txt");
        fs::create_dir(&sub).unwrap();

        let err = open(&sub).unwrap_err();
        assert!(matches!(err, MonitorError::NotARegularFile { .. }));
    }

    #[test]
    fn test_is_changed_and_observe() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("a.java");
        fs::write(&path, "class A {}\n")?;
        set_file_mtime(&path, FileTime::from_unix_time(1_000, 0))?;

        let mut record = open(&path)?;
        let t = |s| UNIX_EPOCH + Duration::from_secs(s);

        assert!(record.is_changed(t(999)));
        assert!(!record.is_changed(t(1_000)));

        assert!(!record.observe(t(1_000)));
        assert!(record.observe(t(2_000)));
        assert_eq!(record.last_updated(), t(2_000));
        assert_eq!(record.created(), t(1_000));
        Ok(())
    }

    #[test]
    fn test_describe_field_order() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("Main.java");
        fs::write(&path, "public class Main {\n  void run() {}\n}\n")?;
        set_file_mtime(&path, FileTime::from_unix_time(1_234, 0))?;

        let report = open(&path)?.describe(TimestampFormat::Unix);
        assert_eq!(
            report.to_string(),
            "Filename: Main.java\n\
             Extension: .java\n\
             Creation Time: 1234\n\
             Last Updated: 1234\n\
             Type: Program File\n\
             Lines: 3\n\
             Classes: 1\n\
             Methods: 1\n"
        );
        Ok(())
    }

    #[test]
    fn test_describe_generic_has_no_type_line() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("Makefile");
        fs::write(&path, "all:\n")?;

        let report = open(&path)?.describe(TimestampFormat::Unix);
        assert_eq!(report.get("Type"), None);
        assert_eq!(report.get("Extension"), Some(""));
        assert_eq!(report.fields().len(), 4);
        Ok(())
    }
}
