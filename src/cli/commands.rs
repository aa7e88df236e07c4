//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{BlockMatchField, FrameBudget};
use crate::cli::args::{AnalyzeArgs, InspectArgs};
use crate::config_initialization::AnalysisSettings;
use crate::domain::model::PictureType;
use crate::engine::{ComplexityAnalyzer, PassTimer};
use crate::output::{OutputTarget, RecordWriter, ReportVerifier};
use crate::probe::{open_source, SourceInfo, SourceInspector, SourceValidator};
use crate::utils::Utils;

/// Execute the analyze command
pub fn analyze(args: &AnalyzeArgs, settings: &AnalysisSettings) -> Result<()> {
    info!("Starting analysis of {}", args.input.display());
    let params = settings.params;

    let source = open_source(&args.input, settings.dimension)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let source = FrameBudget::new(source, params.frame_budget);

    let timer = PassTimer::start();
    let analyzer = ComplexityAnalyzer::<_, BlockMatchField>::new(source, params)
        .context("Failed to set up analyzer")?;
    let report = analyzer.analyze().context("Analysis failed")?;

    let verification = ReportVerifier::verify(&report, &params);
    if !verification.success {
        warn!("Report failed structural verification");
    }

    let target = match &args.output {
        Some(path) => OutputTarget::File(path.clone()),
        None => OutputTarget::Stdout,
    };
    RecordWriter::new(settings.format)
        .write_to(&report, &target)
        .context("Failed to write report")?;

    info!(
        "Analyzed {} pictures (I: {}, P: {}, B: {}) in {}, total bits {}",
        report.records.len(),
        report.count_of(PictureType::I),
        report.count_of(PictureType::P),
        report.count_of(PictureType::B),
        Utils::format_throughput(report.records.len(), timer.elapsed()),
        report.total_bits()
    );
    Ok(())
}

/// Execute the inspect command
pub fn inspect(args: &InspectArgs, settings: &AnalysisSettings) -> Result<()> {
    info!("Starting inspect operation");

    let info = SourceInspector::new()
        .inspect(&args.input, settings.dimension)
        .context("Failed to inspect input file")?;
    if let Err(e) = SourceValidator::validate(&info, &settings.params) {
        warn!("{}", e);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&info)
            .context("Failed to serialize source info to JSON")?;
        println!("{}", json);
    } else {
        display_source_info(&info);
    }

    info!("Inspect operation completed successfully");
    Ok(())
}

/// Display source information in human-readable format
fn display_source_info(info: &SourceInfo) {
    println!("Source Information");
    println!("==================");
    println!("File: {}", info.path);
    println!("Format: {:?}", info.format);
    println!("Dimension: {}", info.dimension);
    println!("Frame Size: {} bytes", info.frame_bytes);
    println!("File Size: {}", Utils::format_file_size(info.file_size));
    println!("Frames: {}", info.frame_count);
    if info.trailing_bytes > 0 {
        println!("Trailing Bytes: {}", info.trailing_bytes);
    }
}
