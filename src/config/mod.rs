//! Configuration for foldmon.
//!
//! Loaded from a TOML file; every field has a default, so a missing file or
//! a partial file is fine. The file is never written by foldmon.

pub mod parser;
pub mod validator;

use crate::utils::formatters::TimestampFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound accepted for `io.timeout_ms` (ten minutes).
pub const MAX_TIMEOUT_MS: u64 = 600_000;

/// Every key foldmon reads, as `section.key`
pub const KNOWN_KEYS: [&str; 9] = [
    "monitor.root_path",
    "monitor.ignore_patterns",
    "monitor.follow_symlinks",
    "monitor.use_birth_time",
    "monitor.refresh_on_change",
    "monitor.sticky_changes",
    "io.timeout_ms",
    "display.color",
    "display.timestamp_format",
];

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// What to monitor and how changes are detected
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Filesystem access limits
    #[serde(default)]
    pub io: IoConfig,

    /// Output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[monitor]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Directory to monitor
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,
    /// Glob patterns for file names that are never tracked
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Track symbolic links to regular files
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
    /// Use the filesystem birth time as creation time when available
    #[serde(default)]
    pub use_birth_time: bool,
    /// Recompute metrics of a file when it changes
    #[serde(default)]
    pub refresh_on_change: bool,
    /// Keep reporting a modified file until the next commit
    #[serde(default)]
    pub sticky_changes: bool,
}

/// `[io]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IoConfig {
    /// Milliseconds allowed for one listing, stat or file read; 0 disables
    #[serde(default)]
    pub timeout_ms: u64,
}

/// `[display]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Colorize terminal output
    #[serde(default = "default_color")]
    pub color: bool,
    /// How report timestamps are rendered
    #[serde(default)]
    pub timestamp_format: TimestampFormat,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            ignore_patterns: Vec::new(),
            follow_symlinks: default_follow_symlinks(),
            use_birth_time: false,
            refresh_on_change: false,
            sticky_changes: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl IoConfig {
    /// Configured timeout, `None` when disabled
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Get a configuration value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return None;
        }

        match (parts[0], parts[1]) {
            ("monitor", "root_path") => Some(self.monitor.root_path.display().to_string()),
            ("monitor", "ignore_patterns") => Some(self.monitor.ignore_patterns.join(",")),
            ("monitor", "follow_symlinks") => Some(self.monitor.follow_symlinks.to_string()),
            ("monitor", "use_birth_time") => Some(self.monitor.use_birth_time.to_string()),
            ("monitor", "refresh_on_change") => Some(self.monitor.refresh_on_change.to_string()),
            ("monitor", "sticky_changes") => Some(self.monitor.sticky_changes.to_string()),
            ("io", "timeout_ms") => Some(self.io.timeout_ms.to_string()),
            ("display", "color") => Some(self.display.color.to_string()),
            ("display", "timestamp_format") => Some(self.display.timestamp_format.to_string()),
            _ => None,
        }
    }
}

// Default functions for serde
fn default_root_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_ROOT)
}

const fn default_follow_symlinks() -> bool {
    true
}

const fn default_color() -> bool {
    true
}
