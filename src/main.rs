//! GOP complexity analyzer
//!
//! Scores every picture of a raw video sequence under a fixed I/P/B GOP
//! structure and writes per-picture prediction error and bit estimates.
//!
//! # Usage
//!
//! ```bash
//! complexity analyze -i foreman.yuv -W 352 -H 288 -g 30 -b 2 -o foreman.csv
//! complexity analyze -i clip.y4m --format json
//! complexity inspect -i clip.y4m
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use complexity_analyzer::cli::{commands, Cli, Commands};
use complexity_analyzer::config_initialization::initialize_configuration_hierarchy;
use complexity_analyzer::error::AnalyzerError;
use complexity_analyzer::utils::logging::LoggingSystem;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match initialize_configuration_hierarchy(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let logging = LoggingSystem::new(settings.logging.clone());
    if let Err(e) = logging.initialize() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    logging.log_system_info();
    if let Some(path) = &settings.config_file {
        info!("Using configuration file {}", path.display());
    }

    let result = match &cli.command {
        Commands::Analyze(args) => commands::analyze(args, &settings),
        Commands::Inspect(args) => commands::inspect(args, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let fatal_allocation = e
                .downcast_ref::<AnalyzerError>()
                .is_some_and(AnalyzerError::is_allocation);
            error!(allocation = fatal_allocation, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}
