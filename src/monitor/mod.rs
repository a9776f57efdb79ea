//! Directory monitor.
//!
//! [`DirectoryMonitor`] owns the tracked set (path → [`FileRecord`]) and the
//! snapshot time. Each [`DirectoryMonitor::status`] call is one diff pass:
//!
//! 1. list the regular files directly inside the root
//! 2. tracked paths no longer listed are reported deleted and dropped
//! 3. listed paths not yet tracked get a new record and are reported added
//! 4. listed tracked paths have their modification time read again; a file
//!    is reported modified when that time is after the snapshot time
//!
//! [`DirectoryMonitor::commit`] only moves the snapshot time forward.
//!
//! A failure on one entry never aborts the pass. It is reported in
//! [`StatusReport::errors`] and the tracked set keeps whatever it had for
//! that path.

mod status;

pub use status::{FileStatus, StatusReport};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{EntryError, MonitorError};
use crate::record::{CodeAnalyzer, FileRecord, HeuristicAnalyzer, RecordOptions};
use crate::scanner::{self, ScanOptions};
use crate::utils::timeout::run_with_timeout;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{Level, debug, info, span, warn};

/// Behavior switches for a monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    /// Glob patterns for file names that are never tracked
    pub ignore_patterns: Vec<String>,
    /// Track symbolic links to regular files
    pub follow_symlinks: bool,
    /// Use the filesystem birth time as creation time when available
    pub use_birth_time: bool,
    /// Rebuild a record (recomputing metrics) when its file changes
    pub refresh_on_change: bool,
    /// Report a modified file on every pass until the next commit instead
    /// of once per modification
    pub sticky_changes: bool,
    /// Upper bound for each listing, stat and record build
    pub timeout: Option<Duration>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            follow_symlinks: true,
            use_birth_time: false,
            refresh_on_change: false,
            sticky_changes: false,
            timeout: None,
        }
    }
}

impl MonitorOptions {
    /// Options described by a loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            ignore_patterns: config.monitor.ignore_patterns.clone(),
            follow_symlinks: config.monitor.follow_symlinks,
            use_birth_time: config.monitor.use_birth_time,
            refresh_on_change: config.monitor.refresh_on_change,
            sticky_changes: config.monitor.sticky_changes,
            timeout: config.io.timeout(),
        }
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            ignore_patterns: self.ignore_patterns.clone(),
            follow_symlinks: self.follow_symlinks,
            timeout: self.timeout,
        }
    }

    const fn record_options(&self) -> RecordOptions {
        RecordOptions {
            use_birth_time: self.use_birth_time,
        }
    }
}

/// Tracks one directory and reports differences against it.
#[derive(Debug)]
pub struct DirectoryMonitor<C = SystemClock> {
    root: PathBuf,
    snapshot_time: SystemTime,
    tracked: BTreeMap<PathBuf, FileRecord>,
    // Tracked at start with a modification time already past the snapshot
    unreported: BTreeSet<PathBuf>,
    clock: C,
    options: MonitorOptions,
    analyzer: Arc<dyn CodeAnalyzer>,
    initial_errors: Vec<EntryError>,
}

impl DirectoryMonitor<SystemClock> {
    /// Creates a monitor on wall-clock time and scans `root` once.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is missing, not a directory, or cannot be
    /// listed.
    pub fn new(root: impl Into<PathBuf>, options: MonitorOptions) -> Result<Self, MonitorError> {
        Self::with_clock(root, options, SystemClock)
    }
}

impl<C: Clock> DirectoryMonitor<C> {
    /// Creates a monitor with an explicit clock.
    ///
    /// # Errors
    ///
    /// Same as [`DirectoryMonitor::new`].
    pub fn with_clock(
        root: impl Into<PathBuf>,
        options: MonitorOptions,
        clock: C,
    ) -> Result<Self, MonitorError> {
        Self::with_analyzer(root, options, clock, Arc::new(HeuristicAnalyzer))
    }

    /// Creates a monitor with an explicit clock and source code analyzer.
    ///
    /// The snapshot time is read from the clock before the directory is
    /// listed, so a file written while the scan runs is reported modified on
    /// the first pass. Entries that
    /// cannot be opened during the first scan are left untracked and kept in
    /// [`initial_errors`](Self::initial_errors); a later pass picks them up
    /// as new once they are readable.
    ///
    /// # Errors
    ///
    /// Same as [`DirectoryMonitor::new`].
    pub fn with_analyzer(
        root: impl Into<PathBuf>,
        options: MonitorOptions,
        clock: C,
        analyzer: Arc<dyn CodeAnalyzer>,
    ) -> Result<Self, MonitorError> {
        let root = root.into();
        let span = span!(Level::DEBUG, "initial_scan", root = %root.display());
        let _guard = span.enter();

        let snapshot_time = clock.now();
        let listing = scanner::list_files(&root, &options.scan_options())?;

        let mut monitor = Self {
            root,
            snapshot_time,
            tracked: BTreeMap::new(),
            unreported: BTreeSet::new(),
            clock,
            options,
            analyzer,
            initial_errors: listing.errors,
        };

        for path in listing.files {
            match monitor.open_record(&path) {
                Ok(record) => {
                    if record.is_changed(monitor.snapshot_time) {
                        monitor.unreported.insert(path.clone());
                    }
                    monitor.tracked.insert(path, record);
                }
                Err(e) => {
                    warn!(error = %e, "skipping entry in initial scan");
                    monitor.initial_errors.push(EntryError::new(e));
                }
            }
        }

        info!(
            root = %monitor.root.display(),
            tracked = monitor.tracked.len(),
            "monitor initialized"
        );
        Ok(monitor)
    }

    /// Runs one diff pass against the directory.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself can no longer be
    /// listed; the tracked set is untouched in that case.
    pub fn status(&mut self) -> Result<StatusReport, MonitorError> {
        let span = span!(Level::DEBUG, "diff_pass", root = %self.root.display());
        let _guard = span.enter();

        let listing = scanner::list_files(&self.root, &self.options.scan_options())?;
        let mut report = StatusReport {
            changes: Vec::new(),
            errors: listing.errors,
        };

        // Unreadable entries still exist, so they must not count as deleted
        let present: BTreeSet<&Path> = listing
            .files
            .iter()
            .map(PathBuf::as_path)
            .chain(report.errors.iter().map(|e| e.path.as_path()))
            .collect();

        let gone: Vec<PathBuf> = self
            .tracked
            .keys()
            .filter(|path| !present.contains(path.as_path()))
            .cloned()
            .collect();
        drop(present);

        for path in gone {
            debug!(path = %path.display(), "deleted");
            self.tracked.remove(&path);
            self.unreported.remove(&path);
            report.changes.push(FileStatus::Deleted(path));
        }

        for path in listing.files {
            if self.tracked.contains_key(&path) {
                self.reconcile(path, &mut report);
                continue;
            }

            match self.open_record(&path) {
                Ok(record) => {
                    debug!(path = %path.display(), "added");
                    self.tracked.insert(path.clone(), record);
                    report.changes.push(FileStatus::Added(path));
                }
                Err(e) => {
                    warn!(error = %e, "cannot track new entry");
                    report.errors.push(EntryError::new(e));
                }
            }
        }

        debug!(
            changes = report.changes.len(),
            errors = report.errors.len(),
            "diff pass complete"
        );
        Ok(report)
    }

    fn reconcile(&mut self, path: PathBuf, report: &mut StatusReport) {
        let modified = match stat_modified(&path, self.options.timeout) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(error = %e, "cannot read modification time");
                report.errors.push(EntryError::new(e));
                return;
            }
        };

        let Some(previous) = self.tracked.get(&path).map(FileRecord::last_updated) else {
            return;
        };
        let observed = previous != modified;

        // A failed rebuild leaves the record as it was so the next pass retries
        let fresh = if observed && self.options.refresh_on_change {
            match self.open_record(&path) {
                Ok(fresh) => Some(fresh),
                Err(e) => {
                    warn!(error = %e, "cannot refresh record");
                    report.errors.push(EntryError::new(e));
                    return;
                }
            }
        } else {
            None
        };

        let pending = self.unreported.remove(&path);
        let Some(record) = self.tracked.get_mut(&path) else {
            return;
        };
        match fresh {
            Some(fresh) => record.update_from(fresh),
            None => {
                record.observe(modified);
            }
        }

        if record.is_changed(self.snapshot_time)
            && (observed || pending || self.options.sticky_changes)
        {
            debug!(path = %path.display(), "modified");
            report.changes.push(FileStatus::Modified(path));
        }
    }

    /// Moves the snapshot time to now and returns it.
    ///
    /// The tracked set is not touched. Files not modified after this point
    /// are no longer reported as changed.
    pub fn commit(&mut self) -> SystemTime {
        self.snapshot_time = self.clock.now();
        debug!(snapshot = ?self.snapshot_time, "snapshot committed");
        self.snapshot_time
    }

    /// First tracked record whose file name is `filename`, in path order.
    #[must_use]
    pub fn info(&self, filename: &str) -> Option<&FileRecord> {
        self.tracked.values().find(|r| r.filename() == filename)
    }

    /// All tracked records in path order
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.tracked.values()
    }

    /// Number of tracked files
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Whether nothing is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Directory under observation
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reference time for change detection
    #[must_use]
    pub const fn snapshot_time(&self) -> SystemTime {
        self.snapshot_time
    }

    /// Options the monitor was built with
    #[must_use]
    pub const fn options(&self) -> &MonitorOptions {
        &self.options
    }

    /// Entries skipped during the first scan
    #[must_use]
    pub fn initial_errors(&self) -> &[EntryError] {
        &self.initial_errors
    }

    fn open_record(&self, path: &Path) -> Result<FileRecord, MonitorError> {
        let owned = path.to_path_buf();
        let options = self.options.record_options();
        let analyzer = Arc::clone(&self.analyzer);
        run_with_timeout(self.options.timeout, move || {
            FileRecord::open(&owned, &options, analyzer.as_ref())
        })
        .map_err(|elapsed| MonitorError::timeout(path, elapsed.0))?
    }
}

fn stat_modified(path: &Path, timeout: Option<Duration>) -> Result<SystemTime, MonitorError> {
    let owned = path.to_path_buf();
    run_with_timeout(timeout, move || {
        fs::metadata(&owned)
            .and_then(|m| m.modified())
            .map_err(|e| MonitorError::io(&owned, e))
    })
    .map_err(|elapsed| MonitorError::timeout(path, elapsed.0))?
}
