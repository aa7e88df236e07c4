//! Source inspection: format detection, opening and stream facts

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::{RawYuvSource, Y4mSource};
use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::ports::FrameSource;

pub mod inspector;
pub mod validator;

pub use inspector::SourceInspector;
pub use validator::SourceValidator;

/// Input container, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Headerless planar 8-bit 4:2:0
    RawYuv,
    /// YUV4MPEG2
    Y4m,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> AnalyzerResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yuv" | "i420" | "raw" => Ok(SourceFormat::RawYuv),
            "y4m" => Ok(SourceFormat::Y4m),
            _ => Err(AnalyzerError::UnsupportedFormat {
                message: format!(
                    "Cannot tell the format of {} (expected .yuv or .y4m)",
                    path.display()
                ),
            }),
        }
    }
}

/// Facts about an input, gathered without analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File path
    pub path: String,
    /// Container format
    pub format: SourceFormat,
    /// Picture dimension
    pub dimension: Dimension,
    /// Bytes of one packed picture
    pub frame_bytes: usize,
    /// File size in bytes
    pub file_size: u64,
    /// Complete pictures in the file
    pub frame_count: usize,
    /// Bytes after the last complete raw picture
    pub trailing_bytes: u64,
}

/// Open `path` as a frame source. Raw YUV requires `dim`; for Y4M a given
/// `dim` must match the stream header.
pub fn open_source(path: &Path, dim: Option<Dimension>) -> AnalyzerResult<Box<dyn FrameSource>> {
    match SourceFormat::from_path(path)? {
        SourceFormat::RawYuv => {
            let dim = dim.ok_or_else(|| {
                AnalyzerError::invalid(format!(
                    "Raw YUV input {} needs --width and --height",
                    path.display()
                ))
            })?;
            Ok(Box::new(RawYuvSource::open(path, dim)?))
        }
        SourceFormat::Y4m => {
            let source = Y4mSource::open(path)?;
            if let Some(dim) = dim {
                if dim != source.dim() {
                    return Err(AnalyzerError::invalid(format!(
                        "Requested {} but {} is {}",
                        dim,
                        path.display(),
                        source.dim()
                    )));
                }
            }
            Ok(Box::new(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.yuv")).unwrap(), SourceFormat::RawYuv);
        assert_eq!(SourceFormat::from_path(Path::new("A.Y4M")).unwrap(), SourceFormat::Y4m);
        assert!(SourceFormat::from_path(Path::new("clip.mp4")).is_err());
        assert!(SourceFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_raw_needs_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.yuv");
        std::fs::write(&path, [0u8; 24]).unwrap();

        assert!(open_source(&path, None).is_err());
        let source = open_source(&path, Some(Dimension::new(4, 2).unwrap())).unwrap();
        assert_eq!(source.dim(), Dimension::new(4, 2).unwrap());
    }
}
