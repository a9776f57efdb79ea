use super::{Config, MAX_TIMEOUT_MS};
use crate::utils::find_invalid_pattern;
use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;

/// Files at least this large are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 4096;

/// Reads and validates a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, is not valid
/// TOML, or fails validation.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if metadata.len() < MMAP_THRESHOLD {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config_str(&content)
    } else {
        let file = File::open(path)?;
        // SAFETY: read-only mapping, dropped before returning
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let content = simdutf8::basic::from_utf8(&mmap)
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in config file: {}", e))?;

        parse_config_str(content)
    }
}

/// Parses and validates configuration text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or fails validation.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse TOML config")?;

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.io.timeout_ms > MAX_TIMEOUT_MS {
        anyhow::bail!("io.timeout_ms cannot exceed {MAX_TIMEOUT_MS}");
    }

    if let Some(pattern) = find_invalid_pattern(&config.monitor.ignore_patterns) {
        anyhow::bail!("Invalid ignore pattern: {pattern}");
    }

    if config.monitor.root_path.as_os_str().is_empty() {
        anyhow::bail!("monitor.root_path cannot be empty");
    }

    Ok(())
}
