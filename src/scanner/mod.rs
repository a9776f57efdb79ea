//! Directory listing for the monitored folder.
//!
//! Only direct children are listed; the monitor never descends into
//! subdirectories. Directories themselves are excluded, and so are symbolic
//! links unless `follow_symlinks` is set (in which case a link to a regular
//! file is listed under the link's own path).

use crate::error::{EntryError, MonitorError};
use crate::utils::should_ignore;
use crate::utils::timeout::run_with_timeout;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, debug, span};
use walkdir::WalkDir;

/// Settings for listing the monitored directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Glob patterns matched against file names
    pub ignore_patterns: Vec<String>,
    /// Whether to resolve symbolic links
    pub follow_symlinks: bool,
    /// Upper bound for one listing
    pub timeout: Option<Duration>,
}

/// Result of listing the monitored directory
#[derive(Debug, Default)]
pub struct Listing {
    /// Regular files found, sorted by path
    pub files: Vec<PathBuf>,
    /// Entries that could not be inspected
    pub errors: Vec<EntryError>,
}

/// Checks that `root` exists and is a directory.
///
/// # Errors
///
/// Returns [`MonitorError::RootUnavailable`] or [`MonitorError::NotADirectory`].
pub fn check_root(root: &Path) -> Result<(), MonitorError> {
    let metadata = fs::metadata(root).map_err(|source| MonitorError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(MonitorError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Lists the regular files directly inside `root`.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be read or the listing exceeds
/// the configured timeout. Failures on individual entries are collected in
/// [`Listing::errors`] instead.
pub fn list_files(root: &Path, options: &ScanOptions) -> Result<Listing, MonitorError> {
    let span = span!(Level::DEBUG, "list_files", root = %root.display());
    let _guard = span.enter();

    let owned_root = root.to_path_buf();
    let owned_options = options.clone();
    run_with_timeout(options.timeout, move || {
        list_files_blocking(&owned_root, &owned_options)
    })
    .map_err(|elapsed| MonitorError::timeout(root, elapsed.0))?
}

fn list_files_blocking(root: &Path, options: &ScanOptions) -> Result<Listing, MonitorError> {
    check_root(root)?;

    let mut listing = Listing::default();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(options.follow_symlinks)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                let fatal = err.depth() == 0;
                let source = std::io::Error::from(err);
                if fatal {
                    return Err(MonitorError::RootUnavailable { path, source });
                }
                listing
                    .errors
                    .push(EntryError::new(MonitorError::io(path, source)));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }

        if should_ignore(entry.path(), &options.ignore_patterns) {
            debug!(path = %entry.path().display(), "ignored by pattern");
            continue;
        }

        listing.files.push(entry.into_path());
    }

    listing.files.sort();
    debug!(
        files = listing.files.len(),
        errors = listing.errors.len(),
        "listing complete"
    );
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    fn create_test_structure(root: &Path) -> Result<()> {
        // root/
        //   a.txt
        //   b.cpp
        //   swap.swp
        //   nested/
        //     deep.txt
        fs::write(root.join("a.txt"), "a")?;
        fs::write(root.join("b.cpp"), "int main() {}")?;
        fs::write(root.join("swap.swp"), "")?;
        fs::create_dir(root.join("nested"))?;
        fs::write(root.join("nested/deep.txt"), "deep")?;
        Ok(())
    }

    fn names(listing: &Listing) -> Vec<String> {
        listing
            .files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_lists_direct_files_only() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;

        let listing = list_files(temp_dir.path(), &ScanOptions::default())?;

        assert_eq!(names(&listing), ["a.txt", "b.cpp", "swap.swp"]);
        assert!(listing.errors.is_empty());
        Ok(())
    }

    #[test]
    fn test_ignore_patterns() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;

        let options = ScanOptions {
            ignore_patterns: vec!["*.swp".to_string()],
            ..ScanOptions::default()
        };
        let listing = list_files(temp_dir.path(), &options)?;

        assert_eq!(names(&listing), ["a.txt", "b.cpp"]);
        Ok(())
    }

    #[test]
    fn test_paths_are_joined_to_root() -> Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_structure(temp_dir.path())?;

        let listing = list_files(temp_dir.path(), &ScanOptions::default())?;
        assert!(listing.files.iter().all(|p| p.parent() == Some(temp_dir.path())));
        Ok(())
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = list_files(&temp_dir.path().join("nope"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, MonitorError::RootUnavailable { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let err = list_files(&file, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, MonitorError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_follow_setting() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("target.txt");
        fs::write(&target, "x")?;
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.txt"))?;

        let listing = list_files(temp_dir.path(), &ScanOptions::default())?;
        assert_eq!(names(&listing), ["target.txt"]);

        let options = ScanOptions {
            follow_symlinks: true,
            ..ScanOptions::default()
        };
        let listing = list_files(temp_dir.path(), &options)?;
        assert_eq!(names(&listing), ["link.txt", "target.txt"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_entry_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("ok.txt"), "x")?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing"),
            temp_dir.path().join("dangling.txt"),
        )?;

        let options = ScanOptions {
            follow_symlinks: true,
            ..ScanOptions::default()
        };
        let listing = list_files(temp_dir.path(), &options)?;
        assert_eq!(names(&listing), ["ok.txt"]);
        assert_eq!(listing.errors.len(), 1);
        Ok(())
    }
}
