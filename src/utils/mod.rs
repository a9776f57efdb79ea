//! Utility functions and helpers.
//!
//! - Path manipulation (tilde expansion)
//! - Ignore pattern matching
//! - Timestamp formatting
//! - Blocking calls with an optional deadline
//!
//! # Submodules
//!
//! - [`formatters`]: Output formatting
//! - [`timeout`]: Deadline-bounded blocking calls
//!
//! # Examples
//!
//! ```
//! use foldmon::utils::{expand_tilde, should_ignore};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let path = expand_tilde("~/notes")?;
//! assert!(!path.as_os_str().is_empty());
//!
//! assert!(should_ignore(Path::new("draft.swp"), &["*.swp".to_string()]));
//! # Ok(())
//! # }
//! ```

/// Output formatting for timestamps and status lines
pub mod formatters;
/// Deadline-bounded execution of blocking filesystem calls
pub mod timeout;

use anyhow::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        anyhow::bail!("Path cannot be empty");
    }
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}

/// Determines if a path should be ignored based on glob patterns.
///
/// Patterns are matched against the file name only, since the monitor never
/// descends into subdirectories. Invalid patterns never match; they are
/// rejected earlier by config validation.
#[must_use]
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();

    patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .any(|p| p.matches(&name))
}

/// Returns the first pattern that is not a valid glob, if any.
#[must_use]
pub fn find_invalid_pattern(patterns: &[String]) -> Option<&str> {
    patterns
        .iter()
        .find(|p| Pattern::new(p).is_err())
        .map(String::as_str)
}
