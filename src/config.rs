use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::StarsyncError;
use crate::lyrics::DEFAULT_SEPARATOR;

/// User settings, read from a YAML file such as:
///
/// ```yaml
/// syllable-separator: "/"
/// output-suffix: _retimed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SyncConfig {
    /// Splits a transcript word into note-sized syllables.
    pub syllable_separator: char,
    /// Appended to the title when naming an edited chart.
    pub output_suffix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            syllable_separator: DEFAULT_SEPARATOR,
            output_suffix: "_adjusted".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, StarsyncError> {
        // an empty document deserializes as unit, not as a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|err| StarsyncError::Config(format!("Could not read configuration {err}")))
    }

    pub fn load(path: &Path) -> Result<Self, StarsyncError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        log::info!("Loaded configuration from {path:?}");
        Ok(config)
    }
}
