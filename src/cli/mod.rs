//! CLI module for the complexity analyzer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{AnalyzeArgs, InspectArgs};

/// GOP complexity analyzer
///
/// Scores every picture of a raw video sequence as it would be coded in a
/// fixed I/P/B GOP structure and reports prediction error and estimated bits.
#[derive(Parser, Debug)]
#[command(name = "complexity")]
#[command(about = "GOP complexity analyzer - per-picture prediction error and bit estimates")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: ./complexity.toml when present)
    #[arg(long, global = true, env = "COMPLEXITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a sequence and write one record per picture
    Analyze(AnalyzeArgs),
    /// Report dimension and frame count of an input
    Inspect(InspectArgs),
}
