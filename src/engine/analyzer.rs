//! GOP/sub-GOP frame scheduler
//!
//! Decides the role of every picture, feeds reference pictures to the motion
//! field in dependency order, recycles a ring of `sub_gop_size + 1` frame
//! buffers by exchanging storage, and restores presentation order before
//! records reach the report.

use tracing::{debug, info, trace};

use crate::domain::model::*;
use crate::domain::rules::{BitWeighting, GopRules};
use crate::engine::progress::{GopAccumulator, PassTimer};
use crate::error::AnalyzerResult;
use crate::frame::{FrameBuffer, PredictionScratch};
use crate::planner::{GopCursor, GopParams, ReorderBuffer};
use crate::ports::{FrameSource, MotionField, ReadOutcome};

/// Single-pass complexity analyzer over a frame source
pub struct ComplexityAnalyzer<S: FrameSource, F: MotionField> {
    source: S,
    params: GopParams,
    /// Slot 0 holds the forward anchor, slots 1..=n the look-ahead
    pics: Vec<FrameBuffer>,
    /// Slot of the last picture loaded by the previous fill
    last_slot: Option<usize>,
    scratch: PredictionScratch,
    p_field: F,
    b_forward: F,
    b_backward: F,
    cursor: GopCursor,
    gop: GopAccumulator,
    reorder: ReorderBuffer,
    report: AnalysisReport,
}

impl<S: FrameSource, F: MotionField> ComplexityAnalyzer<S, F> {
    /// Allocate the buffer ring, scratch grids and motion fields.
    ///
    /// Any allocation failure is returned as a fatal error.
    pub fn new(source: S, params: GopParams) -> AnalyzerResult<Self> {
        GopRules::validate(params.gop_size, params.b_frames)?;
        let dim = source.dim();

        let pics = (0..params.pool_size())
            .map(|_| FrameBuffer::new(dim))
            .collect::<AnalyzerResult<Vec<_>>>()?;

        info!(
            dimension = %dim,
            gop_size = params.gop_size,
            b_frames = params.b_frames,
            frame_budget = params.frame_budget,
            buffers = pics.len(),
            "Analyzer initialized"
        );

        Ok(Self {
            scratch: PredictionScratch::new(dim)?,
            p_field: F::with_dimension(dim)?,
            b_forward: F::with_dimension(dim)?,
            b_backward: F::with_dimension(dim)?,
            cursor: GopCursor::new(params.gop_size, params.sub_gop_size()),
            gop: GopAccumulator::new(),
            reorder: ReorderBuffer::new(),
            report: AnalysisReport::default(),
            last_slot: None,
            source,
            params,
            pics,
        })
    }

    /// Run the pass to end of stream and return records in presentation order
    pub fn analyze(mut self) -> AnalyzerResult<AnalysisReport> {
        let timer = PassTimer::start();

        while !self.budget_reached() && !self.source.eof() {
            let count = self.source.count();
            debug!("Picture count: {}", count);

            if GopRules::is_gop_start(count, self.params.gop_size) || self.last_slot.is_none() {
                if let Some(summary) = self.gop.close(self.params.gop_size) {
                    self.report.gops.push(summary);
                }
                self.reset_gop_start();
                self.cursor.start_gop();

                self.pics[0].set_pos(count);
                if self.source.read(&mut self.pics[0])? == ReadOutcome::EndOfStream {
                    break;
                }
                self.gop.start(count);
                self.process_i_picture();
            } else if let Some(last) = self.last_slot {
                let (anchor, lookahead) = self.pics.split_at_mut(1);
                anchor[0].exchange(&mut lookahead[last - 1]);
            }

            // a budget cut closes the sub-GOP early on a P picture
            let wanted = self.cursor.lookahead_len().min(self.budget_left());
            let filled = self.fill_lookahead(wanted)?;
            if filled < wanted {
                self.report.frames_discarded = filled;
                info!(
                    discarded = filled,
                    "End of stream during look-ahead, dropping partial sub-GOP"
                );
                break;
            }
            self.cursor.advance(filled);

            if filled == 0 {
                // single-picture GOP: nothing beyond the I picture
                self.last_slot = None;
                continue;
            }
            self.last_slot = Some(filled);

            self.process_p_picture(filled);
            for slot in 1..filled {
                self.process_b_picture(slot, filled);
            }
        }

        if let Some(record) = self.reorder.finish() {
            self.report.records.push(record);
        }
        if let Some(summary) = self.gop.close(self.params.gop_size) {
            self.report.gops.push(summary);
        }

        self.report.frames_read = self.source.count();
        info!(
            records = self.report.records.len(),
            elapsed_ms = timer.elapsed().as_millis() as u64,
            fps = timer.throughput(self.report.frames_read),
            "Processed frames: {}",
            self.report.frames_read
        );
        Ok(self.report)
    }

    fn budget_reached(&self) -> bool {
        self.params.frame_budget > 0 && self.source.count() >= self.params.frame_budget
    }

    fn budget_left(&self) -> usize {
        match self.params.frame_budget {
            0 => usize::MAX,
            budget => budget.saturating_sub(self.source.count()),
        }
    }

    /// Read up to `wanted` pictures into slots 1..=wanted; stops at end of stream
    fn fill_lookahead(&mut self, wanted: usize) -> AnalyzerResult<usize> {
        for slot in 1..=wanted {
            let pos = self.source.count();
            self.pics[slot].set_pos(pos);
            if self.source.read(&mut self.pics[slot])? == ReadOutcome::EndOfStream {
                return Ok(slot - 1);
            }
        }
        Ok(wanted)
    }

    fn reset_gop_start(&mut self) {
        self.p_field.reset();
        self.b_forward.reset();
        self.b_backward.reset();
    }

    fn process_i_picture(&mut self) {
        self.scratch.clear();
        let error = self.p_field.predict_spatial(&self.pics[0], &mut self.scratch);
        let index = self.pics[0].pos();
        debug_assert_eq!(index + 1, self.source.count());

        self.emit(index, PictureType::I, error);
        self.pics[0].border_extend();
    }

    fn process_p_picture(&mut self, slot: usize) {
        self.scratch.clear();
        let error = self
            .p_field
            .predict_temporal(&self.pics[slot], &self.pics[0], &mut self.scratch);
        let index = self.pics[slot].pos();
        debug_assert_eq!(index + 1, self.source.count());

        self.emit(index, PictureType::P, error);
        self.pics[slot].border_extend();
    }

    fn process_b_picture(&mut self, slot: usize, backward: usize) {
        self.scratch.clear();
        let error = self.p_field.predict_bidirectional(
            &self.pics[slot],
            &self.pics[0],
            &self.pics[backward],
            &mut self.b_forward,
            &mut self.b_backward,
            &mut self.scratch,
        );

        let index = self.pics[slot].pos();
        // read cursor minus the distance back from the backward anchor
        debug_assert_eq!(
            index,
            self.source.count() - (self.pics[backward].pos() - index) - 1
        );

        self.emit(index, PictureType::B, error);
    }

    fn emit(&mut self, index: usize, picture_type: PictureType, error: u64) {
        let bits = BitWeighting::apply(picture_type, self.p_field.bits());
        let record = PictureRecord::new(index, picture_type, error, self.p_field.counts(), bits);
        trace!("{}", record);

        self.gop.add(&record);
        if let Some(ready) = self.reorder.push(record) {
            self.report.records.push(ready);
        }
    }
}
