//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file (.yuv raw I420 or .y4m)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Picture width, required for raw YUV
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Picture height, required for raw YUV
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Pictures per GOP [default: 150]
    #[arg(short, long)]
    pub gop_size: Option<usize>,

    /// B pictures between anchors [default: 2]
    #[arg(short, long)]
    pub b_frames: Option<usize>,

    /// Pictures to analyze, 0 for all [default: 0]
    #[arg(short = 'n', long)]
    pub frames: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format: csv or json [default: csv]
    #[arg(long)]
    pub format: Option<String>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input file (.yuv raw I420 or .y4m)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Picture width, required for raw YUV
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Picture height, required for raw YUV
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
