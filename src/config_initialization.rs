//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI > environment > config file > defaults.

use std::path::PathBuf;

use tracing::debug;

use crate::adapters::toml_config::{ConfigFile, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::output::OutputFormat;
use crate::planner::GopParams;
use crate::utils::logging::LoggingConfig;

/// Environment variables and the setting each one overrides
pub const ENV_GOP_SIZE: &str = "COMPLEXITY_GOP_SIZE";
pub const ENV_B_FRAMES: &str = "COMPLEXITY_B_FRAMES";
pub const ENV_FRAMES: &str = "COMPLEXITY_FRAMES";
pub const ENV_LOG_LEVEL: &str = "COMPLEXITY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "COMPLEXITY_LOG_FORMAT";
pub const ENV_OUTPUT_FORMAT: &str = "COMPLEXITY_OUTPUT_FORMAT";

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub params: GopParams,
    /// Picture dimension when given by flags or the config file
    pub dimension: Option<Dimension>,
    pub format: OutputFormat,
    pub logging: LoggingConfig,
    /// Config file that contributed, if any
    pub config_file: Option<PathBuf>,
}

/// One level of the hierarchy; unset values fall through to the level below
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsLayer {
    pub gop_size: Option<usize>,
    pub b_frames: Option<usize>,
    pub frames: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub format: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl SettingsLayer {
    /// Values from `higher` win where set
    pub fn overlay(self, higher: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            gop_size: higher.gop_size.or(self.gop_size),
            b_frames: higher.b_frames.or(self.b_frames),
            frames: higher.frames.or(self.frames),
            width: higher.width.or(self.width),
            height: higher.height.or(self.height),
            format: higher.format.or(self.format),
            log_level: higher.log_level.or(self.log_level),
            log_format: higher.log_format.or(self.log_format),
        }
    }

    pub fn from_file(config: &ConfigFile) -> SettingsLayer {
        SettingsLayer {
            gop_size: config.analysis.gop_size,
            b_frames: config.analysis.b_frames,
            frames: config.analysis.frames,
            width: config.analysis.width,
            height: config.analysis.height,
            format: config.output.format.clone(),
            log_level: config.logging.level.clone(),
            log_format: config.logging.format.clone(),
        }
    }

    /// Read overrides through `lookup`, normally `std::env::var`
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> AnalyzerResult<SettingsLayer> {
        let number = |name: &str| -> AnalyzerResult<Option<usize>> {
            lookup(name)
                .map(|v| {
                    v.trim().parse::<usize>().map_err(|_| AnalyzerError::ConfigError {
                        message: format!("{} must be a non-negative integer, got {:?}", name, v),
                    })
                })
                .transpose()
        };

        Ok(SettingsLayer {
            gop_size: number(ENV_GOP_SIZE)?,
            b_frames: number(ENV_B_FRAMES)?,
            frames: number(ENV_FRAMES)?,
            width: None,
            height: None,
            format: lookup(ENV_OUTPUT_FORMAT),
            log_level: lookup(ENV_LOG_LEVEL),
            log_format: lookup(ENV_LOG_FORMAT),
        })
    }

    pub fn from_cli(cli: &Cli) -> SettingsLayer {
        let mut layer = SettingsLayer {
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.clone(),
            ..Default::default()
        };
        match &cli.command {
            Commands::Analyze(args) => {
                layer.gop_size = args.gop_size;
                layer.b_frames = args.b_frames;
                layer.frames = args.frames;
                layer.width = args.width;
                layer.height = args.height;
                layer.format = args.format.clone();
            }
            Commands::Inspect(args) => {
                layer.width = args.width;
                layer.height = args.height;
            }
        }
        layer
    }

    /// Fill remaining gaps with defaults and validate
    pub fn resolve(self, config_file: Option<PathBuf>) -> AnalyzerResult<AnalysisSettings> {
        let defaults = GopParams::default();
        let params = GopParams::new(
            self.gop_size.unwrap_or(defaults.gop_size),
            self.b_frames.unwrap_or(defaults.b_frames),
            self.frames.unwrap_or(defaults.frame_budget),
        )?;

        let dimension = match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Dimension::new(w, h)?),
            (None, None) => None,
            _ => {
                return Err(AnalyzerError::invalid(
                    "Width and height must be given together",
                ))
            }
        };

        let format = match self.format {
            Some(f) => f.parse()?,
            None => OutputFormat::default(),
        };

        let mut logging = LoggingConfig::default();
        if let Some(level) = self.log_level {
            logging.level = level.parse()?;
        }
        if let Some(format) = self.log_format {
            logging.format = format.parse()?;
        }

        Ok(AnalysisSettings {
            params,
            dimension,
            format,
            logging,
            config_file,
        })
    }
}

/// Resolve settings following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> AnalyzerResult<AnalysisSettings> {
    resolve_with_env(cli, |name| std::env::var(name).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an explicit environment
pub fn resolve_with_env(
    cli: &Cli,
    lookup: impl Fn(&str) -> Option<String>,
) -> AnalyzerResult<AnalysisSettings> {
    // an explicit --config must exist; the default file is optional
    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => Some(TomlConfigAdapter::default_path()).filter(|p| p.exists()),
    };

    let file_layer = match &config_path {
        Some(path) => SettingsLayer::from_file(&TomlConfigAdapter::load(path)?),
        None => SettingsLayer::default(),
    };
    let env_layer = SettingsLayer::from_env(lookup)?;
    let cli_layer = SettingsLayer::from_cli(cli);

    debug!(
        "Configuration layers: file {:?}, env {:?}, cli {:?}",
        file_layer, env_layer, cli_layer
    );

    file_layer
        .overlay(env_layer)
        .overlay(cli_layer)
        .resolve(config_path)
}
