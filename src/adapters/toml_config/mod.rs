// TOML config adapter - Configuration file with [analysis], [output] and [logging] tables

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyzerError, AnalyzerResult};

/// File name looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "complexity.toml";

/// Parsed configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub analysis: AnalysisSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSection {
    pub gop_size: Option<usize>,
    pub b_frames: Option<usize>,
    pub frames: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load and parse a config file
    pub fn load(path: &Path) -> AnalyzerResult<ConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        let config = Self::parse(&content).map_err(|e| AnalyzerError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> AnalyzerResult<ConfigFile> {
        toml::from_str(content).map_err(|e| AnalyzerError::ConfigError {
            message: format!("Failed to parse TOML config: {}", e),
        })
    }

    /// Serialize a config back to TOML text
    pub fn serialize(config: &ConfigFile) -> AnalyzerResult<String> {
        toml::to_string(config).map_err(|e| AnalyzerError::ConfigError {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}
