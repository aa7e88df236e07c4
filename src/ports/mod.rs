// Ports - Interface definitions (contracts)

use crate::domain::model::*;
use crate::error::AnalyzerResult;
use crate::frame::{FrameBuffer, PredictionScratch};

/// Outcome of a successful read call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The frame was filled and `count()` advanced by one
    Frame,
    /// Not enough data remained; the frame is unchanged
    EndOfStream,
}

/// Port for sequential picture sources
///
/// `read` is tri-state: `Ok(Frame)`, `Ok(EndOfStream)` or `Err` for an I/O
/// failure.
pub trait FrameSource {
    /// Fixed visible dimension of every picture
    fn dim(&self) -> Dimension;

    /// Pictures consumed so far (0-based index of the next picture)
    fn count(&self) -> usize;

    /// Whether the source has no further pictures
    fn eof(&mut self) -> bool;

    /// Fill the interior planes of `frame` with the next picture
    fn read(&mut self, frame: &mut FrameBuffer) -> AnalyzerResult<ReadOutcome>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn dim(&self) -> Dimension {
        (**self).dim()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn eof(&mut self) -> bool {
        (**self).eof()
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> AnalyzerResult<ReadOutcome> {
        (**self).read(frame)
    }
}

/// Port for motion-field state and the prediction calls driven through it
///
/// The analyzer owns three fields: a persistent one used for every
/// prediction call, and two helpers passed to bidirectional prediction. All
/// three are reset at each GOP boundary.
pub trait MotionField: Sized {
    /// Create a field for pictures of `dim`
    fn with_dimension(dim: Dimension) -> AnalyzerResult<Self>;

    /// Clear per-GOP state
    fn reset(&mut self);

    /// Intra prediction of `frame`; returns aggregate squared error
    fn predict_spatial(&mut self, frame: &FrameBuffer, scratch: &mut PredictionScratch) -> u64;

    /// Forward prediction of `frame` from `reference`
    fn predict_temporal(
        &mut self,
        frame: &FrameBuffer,
        reference: &FrameBuffer,
        scratch: &mut PredictionScratch,
    ) -> u64;

    /// Bidirectional prediction of `frame` from both anchors
    fn predict_bidirectional(
        &mut self,
        frame: &FrameBuffer,
        forward_ref: &FrameBuffer,
        backward_ref: &FrameBuffer,
        forward_state: &mut Self,
        backward_state: &mut Self,
        scratch: &mut PredictionScratch,
    ) -> u64;

    /// Raw bit estimate for the most recent prediction call
    fn bits(&self) -> u64;

    /// Macroblock mode tallies for the most recent prediction call
    fn counts(&self) -> ModeCounts;
}
