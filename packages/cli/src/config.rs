//! TOML configuration for the command-line tool.
//!
//! Resolution order for the dataset path, lowest to highest precedence:
//! built-in default, config file, `TERROR_MAP_DATASET`, `--dataset`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use terror_map_dataset::LoadOptions;

/// Config file read when neither `--config` nor `TERROR_MAP_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "terror_map.toml";

/// How city options are derived from a state selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyMode {
    /// Match states by name in any country.
    #[default]
    ParentName,
    /// Match states only within the selected countries.
    Qualified,
}

/// Settings loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path to the incident CSV.
    pub dataset: PathBuf,
    /// City option derivation mode.
    pub hierarchy_mode: HierarchyMode,
    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("finaldataset.csv"),
            hierarchy_mode: HierarchyMode::default(),
            delimiter: ',',
        }
    }
}

impl DashboardConfig {
    /// CSV reader options derived from this config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Delimiter`] if the delimiter is not a single
    /// ASCII character.
    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        let delimiter =
            u8::try_from(self.delimiter).map_err(|_| ConfigError::Delimiter(self.delimiter))?;
        if !delimiter.is_ascii() {
            return Err(ConfigError::Delimiter(self.delimiter));
        }
        Ok(LoadOptions { delimiter })
    }
}

/// Errors reading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// The delimiter cannot be used as a CSV separator.
    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    Delimiter(char),
}

/// Parses config file contents.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is not a valid config.
pub fn parse(text: &str, path: &str) -> Result<DashboardConfig, ConfigError> {
    toml::de::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.to_string(),
        source: e,
    })
}

/// Reads the config at `path`, falling back to defaults if it does not
/// exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let display = path.display().to_string();

    if !path.exists() {
        log::debug!("No config at {display}, using defaults");
        return Ok(DashboardConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: display.clone(),
        source: e,
    })?;
    parse(&text, &display)
}

/// Loads the config and applies environment and command-line overrides.
///
/// # Errors
///
/// Returns [`ConfigError`] if the config file cannot be read or parsed.
pub fn resolve(
    config_path: Option<&Path>,
    dataset_override: Option<&Path>,
) -> Result<DashboardConfig, ConfigError> {
    let path = config_path.map_or_else(
        || {
            std::env::var("TERROR_MAP_CONFIG")
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    );

    let mut config = load(&path)?;

    if let Ok(dataset) = std::env::var("TERROR_MAP_DATASET") {
        config.dataset = PathBuf::from(dataset);
    }
    if let Some(dataset) = dataset_override {
        config.dataset = dataset.to_path_buf();
    }

    log::debug!("Resolved config: {config:?}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("", "empty.toml").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.load_options().unwrap().delimiter, b',');
    }

    #[test]
    fn parses_all_fields() {
        let config = parse(
            "dataset = \"data/gtd.tsv\"\nhierarchy_mode = \"qualified\"\ndelimiter = \"\\t\"\n",
            "full.toml",
        )
        .unwrap();
        assert_eq!(config.dataset, PathBuf::from("data/gtd.tsv"));
        assert_eq!(config.hierarchy_mode, HierarchyMode::Qualified);
        assert_eq!(config.load_options().unwrap().delimiter, b'\t');
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = parse("hierarchy_mode = \"full_path\"", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "unexpected: {err}");
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let config = DashboardConfig {
            delimiter: '§',
            ..DashboardConfig::default()
        };
        assert!(matches!(
            config.load_options(),
            Err(ConfigError::Delimiter('§'))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load(Path::new("no/such/terror_map.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
