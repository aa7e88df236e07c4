//! GOP structure planning and presentation-order reconstruction

use serde::{Deserialize, Serialize};

use crate::domain::rules::GopRules;
use crate::error::AnalyzerResult;

pub mod gop;
pub mod reorder;

pub use gop::GopCursor;
pub use reorder::ReorderBuffer;

/// GOP structure and frame budget for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GopParams {
    /// Pictures per GOP, each GOP opening with an I picture
    pub gop_size: usize,
    /// B pictures between successive anchors
    pub b_frames: usize,
    /// Pictures to analyze, 0 for the whole source
    pub frame_budget: usize,
}

impl GopParams {
    /// Create validated parameters
    pub fn new(gop_size: usize, b_frames: usize, frame_budget: usize) -> AnalyzerResult<Self> {
        GopRules::validate(gop_size, b_frames)?;
        Ok(Self {
            gop_size,
            b_frames,
            frame_budget,
        })
    }

    /// B pictures plus the closing anchor
    pub fn sub_gop_size(&self) -> usize {
        GopRules::sub_gop_size(self.b_frames)
    }

    /// Frame buffers in the ring
    pub fn pool_size(&self) -> usize {
        GopRules::pool_size(self.b_frames)
    }

    pub fn is_unbounded(&self) -> bool {
        self.frame_budget == 0
    }
}

impl Default for GopParams {
    fn default() -> Self {
        Self {
            gop_size: 150,
            b_frames: 2,
            frame_budget: 0,
        }
    }
}
