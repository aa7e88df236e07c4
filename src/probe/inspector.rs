//! Source inspection implementation

use std::path::Path;

use tracing::info;

use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::frame::FrameBuffer;
use crate::ports::ReadOutcome;
use crate::probe::{open_source, SourceFormat, SourceInfo};

/// Reports dimension, frame size and frame count of an input
pub struct SourceInspector;

impl SourceInspector {
    pub fn new() -> Self {
        Self
    }

    /// Inspect an input file
    pub fn inspect(&self, path: &Path, dim: Option<Dimension>) -> AnalyzerResult<SourceInfo> {
        info!("Inspecting source: {}", path.display());

        if !path.exists() {
            return Err(AnalyzerError::InputFileNotFound {
                path: path.display().to_string(),
            });
        }
        let file_size = std::fs::metadata(path)?.len();
        let format = SourceFormat::from_path(path)?;
        let mut source = open_source(path, dim)?;
        let dimension = source.dim();
        let frame_bytes = dimension.frame_bytes();

        let (frame_count, trailing_bytes) = match format {
            SourceFormat::RawYuv => (
                (file_size / frame_bytes as u64) as usize,
                file_size % frame_bytes as u64,
            ),
            SourceFormat::Y4m => {
                // frame headers may carry parameters, so decode to count
                let mut frame = FrameBuffer::new(dimension)?;
                while source.read(&mut frame)? == ReadOutcome::Frame {}
                (source.count(), 0)
            }
        };

        let info = SourceInfo {
            path: path.display().to_string(),
            format,
            dimension,
            frame_bytes,
            file_size,
            frame_count,
            trailing_bytes,
        };
        info!("Source inspection completed: {} frames", info.frame_count);
        Ok(info)
    }
}

impl Default for SourceInspector {
    fn default() -> Self {
        Self::new()
    }
}
