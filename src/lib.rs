#![warn(missing_docs)]
#![allow(clippy::arithmetic_side_effects)] // Line and word counters cannot realistically overflow

//! # Foldmon - Directory Snapshot Monitor
//!
//! Foldmon watches a single directory, classifies every file it finds by
//! extension, extracts a few type-specific metrics, and reports which files
//! were added, removed, or modified since the last committed snapshot.
//!
//! ## Architecture
//!
//! - [`record`]: File records, type classification and metric extraction
//! - [`monitor`]: Tracked set, snapshot time and the diff pass
//! - [`scanner`]: Non-recursive listing of the monitored directory
//! - [`clock`]: Injectable time source
//! - [`session`]: Textual command loop (`commit`, `status`, `info`, `exit`)
//! - [`config`]: Configuration parsing and validation
//! - [`output`]: Colored user-facing messages
//! - [`utils`]: Formatting, ignore patterns and timeouts
//!
//! ## Example Usage
//!
//! ```no_run
//! use foldmon::monitor::{DirectoryMonitor, MonitorOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut monitor = DirectoryMonitor::new("./test_folder", MonitorOptions::default())?;
//!
//! let report = monitor.status()?;
//! for change in &report.changes {
//!     println!("{}", change.message());
//! }
//!
//! monitor.commit();
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Injectable clock used for snapshot timestamps.
pub mod clock;

/// Configuration parsing, validation, and management.
pub mod config;

/// Error types shared by the record model and the monitor.
pub mod error;

/// Directory monitor: tracked set, snapshot time and diff pass.
pub mod monitor;

/// Output formatting and verbosity control.
pub mod output;

/// File record model and metric extraction.
pub mod record;

/// Non-recursive directory listing.
pub mod scanner;

/// Interactive command loop.
pub mod session;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use error::{EntryError, MonitorError};

/// Current version of the foldmon binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory monitored when nothing else is configured.
pub const DEFAULT_ROOT: &str = "./test_folder";

/// Default configuration file path relative to home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/foldmon/config.toml";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "FOLDMON_CONFIG_PATH";

/// Environment variable overriding the monitored directory.
pub const ROOT_ENV: &str = "FOLDMON_ROOT";

/// Central context for a foldmon run.
///
/// Holds the resolved directory to monitor together with the loaded
/// configuration. The root is resolved in this order: explicit override,
/// `FOLDMON_ROOT`, `monitor.root_path` from the config file.
#[derive(Debug, Clone)]
pub struct MonitorContext {
    /// Directory under observation.
    pub root: PathBuf,

    /// Path the configuration was loaded from.
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl MonitorContext {
    /// Creates a context from the default configuration location.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or the
    /// configuration file exists but cannot be parsed.
    pub fn new(root_override: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        Self::with_config_path(config_path, root_override)
    }

    /// Creates a context from an explicit configuration file.
    ///
    /// # Errors
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn with_config_path(config_path: PathBuf, root_override: Option<PathBuf>) -> Result<Self> {
        let config = config::Config::load(&config_path)?;

        let validator = config::validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_file(&config_path) {
            output::warning(&format!("Warning: Configuration validation failed: {e}"));
        }

        let root = match root_override {
            Some(root) => root,
            None => match std::env::var(ROOT_ENV) {
                Ok(path) => PathBuf::from(path),
                Err(_) => utils::expand_tilde(&config.monitor.root_path.to_string_lossy())?,
            },
        };

        Ok(Self {
            root,
            config_path,
            config,
        })
    }

    /// Builds the monitor options described by the loaded configuration.
    #[must_use]
    pub fn monitor_options(&self) -> monitor::MonitorOptions {
        monitor::MonitorOptions::from_config(&self.config)
    }
}
