//! Source validation against analysis parameters

use tracing::warn;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::planner::GopParams;
use crate::probe::SourceInfo;

/// Checks an inspected source before a pass
pub struct SourceValidator;

impl SourceValidator {
    /// Reject empty inputs; warn about inputs the pass will only partly cover
    pub fn validate(info: &SourceInfo, params: &GopParams) -> AnalyzerResult<()> {
        if info.frame_count == 0 {
            return Err(AnalyzerError::invalid(format!(
                "{} contains no complete {} picture",
                info.path, info.dimension
            )));
        }

        if info.trailing_bytes > 0 {
            warn!(
                "{} ends with {} bytes that do not form a picture",
                info.path, info.trailing_bytes
            );
        }

        let frames = if params.is_unbounded() {
            info.frame_count
        } else {
            info.frame_count.min(params.frame_budget)
        };
        if frames < params.gop_size {
            warn!(
                "Only {} pictures available, shorter than one GOP of {}",
                frames, params.gop_size
            );
        }
        Ok(())
    }
}
