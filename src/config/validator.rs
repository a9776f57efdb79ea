use super::KNOWN_KEYS;
use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Checks a configuration file for keys foldmon does not know about
pub struct ConfigValidator {
    /// Fully qualified keys foldmon reads
    known_fields: HashSet<&'static str>,
    /// Sections that may appear as tables
    known_sections: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = KNOWN_KEYS.into_iter().collect();
        let known_sections = KNOWN_KEYS
            .into_iter()
            .filter_map(|key| key.split_once('.').map(|(section, _)| section))
            .collect();

        Self {
            known_fields,
            known_sections,
        }
    }

    /// Validate a configuration file and print warnings for unknown keys
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)?;
        let unknown = self.unknown_fields(&content)?;

        if !unknown.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for field in &unknown {
                eprintln!("  Unknown configuration field: {}", field.yellow());
            }
            eprintln!();
        }

        Ok(())
    }

    /// Returns the dotted keys in `content` that foldmon does not read
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut unknown = Vec::new();

        if let toml::Value::Table(map) = parsed {
            for (section, value) in map {
                if !self.known_sections.contains(section.as_str()) {
                    unknown.push(section);
                    continue;
                }
                let toml::Value::Table(fields) = value else {
                    unknown.push(section);
                    continue;
                };
                for key in fields.keys() {
                    let full_key = format!("{section}.{key}");
                    if !self.known_fields.contains(full_key.as_str()) {
                        unknown.push(full_key);
                    }
                }
            }
        }

        unknown.sort();
        Ok(unknown)
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
