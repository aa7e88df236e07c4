//! Built-in block-matching motion field
//!
//! Full-pel full search on the luma plane around a per-macroblock predictor
//! that is carried between pictures of the same GOP. Distortion is the sum of
//! squared differences; rate is estimated from a mode header, the vector cost
//! and the magnitude of the residual.

use crate::domain::model::{Dimension, MbMode, ModeCounts};
use crate::error::AnalyzerResult;
use crate::frame::{
    FrameBuffer, MacroblockGrid, Plane, PlaneView, PredictionScratch, HORIZONTAL_PADDING,
    MB_WIDTH, VERTICAL_PADDING,
};
use crate::ports::MotionField;

/// Search window half-width in full pels
pub const SEARCH_RANGE: i16 = 8;

const PADDING: usize = if HORIZONTAL_PADDING < VERTICAL_PADDING {
    HORIZONTAL_PADDING
} else {
    VERTICAL_PADDING
};
/// Largest predictor that keeps the whole window inside the padded border
const MAX_PREDICTOR: i16 = PADDING as i16 - SEARCH_RANGE;

const I_HEADER_BITS: u32 = 1;
const P_INTRA_HEADER_BITS: u32 = 5;
const P_INTER_HEADER_BITS: u32 = 1;
const B_INTRA_HEADER_BITS: u32 = 6;
const B_SINGLE_HEADER_BITS: u32 = 2;
const B_BIDIR_HEADER_BITS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionVector {
    pub x: i16,
    pub y: i16,
}

impl MotionVector {
    pub const ZERO: MotionVector = MotionVector { x: 0, y: 0 };

    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    fn clamp(self, limit: i16) -> Self {
        Self {
            x: self.x.clamp(-limit, limit),
            y: self.y.clamp(-limit, limit),
        }
    }

    /// Estimated bits to code this vector
    pub fn cost(self) -> u32 {
        let xval = u32::from(self.x.unsigned_abs()) * 2 + 1;
        let yval = u32::from(self.y.unsigned_abs()) * 2 + 1;
        (31 - xval.leading_zeros()) * 2 + (31 - yval.leading_zeros()) * 2 + 2
    }
}

/// Luma rectangle of one (possibly partial) macroblock
#[derive(Debug, Clone, Copy)]
struct Block {
    x: isize,
    y: isize,
    w: usize,
    h: usize,
}

impl Block {
    fn pixels(&self) -> u32 {
        (self.w * self.h) as u32
    }
}

fn square(d: i32) -> u32 {
    (d * d) as u32
}

/// Squared error against `reference` displaced by `mv`; stops once past `limit`
fn block_sse(cur: PlaneView, reference: PlaneView, blk: Block, mv: MotionVector, limit: u32) -> u32 {
    let mut dist = 0u32;
    for dy in 0..blk.h as isize {
        let src = cur.span(blk.x, blk.y + dy, blk.w);
        let pred = reference.span(
            blk.x + mv.x as isize,
            blk.y + dy + mv.y as isize,
            blk.w,
        );
        dist += src
            .iter()
            .zip(pred)
            .map(|(&a, &b)| square(i32::from(a) - i32::from(b)))
            .sum::<u32>();
        if dist > limit {
            return dist;
        }
    }
    dist
}

/// Squared error against the rounded average of two displaced references
fn bidir_sse(
    cur: PlaneView,
    forward: PlaneView,
    forward_mv: MotionVector,
    backward: PlaneView,
    backward_mv: MotionVector,
    blk: Block,
) -> u32 {
    let mut dist = 0u32;
    for dy in 0..blk.h as isize {
        let y = blk.y + dy;
        let src = cur.span(blk.x, y, blk.w);
        let fwd = forward.span(blk.x + forward_mv.x as isize, y + forward_mv.y as isize, blk.w);
        let bwd = backward.span(
            blk.x + backward_mv.x as isize,
            y + backward_mv.y as isize,
            blk.w,
        );
        for ((&a, &f), &b) in src.iter().zip(fwd).zip(bwd) {
            let pred = (i32::from(f) + i32::from(b) + 1) >> 1;
            dist += square(i32::from(a) - pred);
        }
    }
    dist
}

/// Squared error of a DC prediction from the row above and the column to the left
fn intra_sse(cur: PlaneView, blk: Block) -> u32 {
    let mut sum = 0u32;
    let mut n = 0u32;
    if blk.y > 0 {
        sum += cur
            .span(blk.x, blk.y - 1, blk.w)
            .iter()
            .map(|&v| u32::from(v))
            .sum::<u32>();
        n += blk.w as u32;
    }
    if blk.x > 0 {
        for dy in 0..blk.h as isize {
            sum += u32::from(cur.at(blk.x - 1, blk.y + dy));
        }
        n += blk.h as u32;
    }
    let dc = if n == 0 { 128 } else { ((sum + n / 2) / n) as i32 };

    (0..blk.h as isize)
        .flat_map(|dy| cur.span(blk.x, blk.y + dy, blk.w).iter())
        .map(|&v| square(i32::from(v) - dc))
        .sum()
}

/// Exhaustive search of the window centred on `predictor`
fn search(cur: PlaneView, reference: PlaneView, blk: Block, predictor: MotionVector) -> (MotionVector, u32) {
    let center = predictor.clamp(MAX_PREDICTOR);
    let mut best = (center, block_sse(cur, reference, blk, center, u32::MAX));

    for dy in -SEARCH_RANGE..=SEARCH_RANGE {
        for dx in -SEARCH_RANGE..=SEARCH_RANGE {
            if best.1 == 0 {
                return best;
            }
            if dx == 0 && dy == 0 {
                continue;
            }
            let mv = MotionVector::new(center.x + dx, center.y + dy);
            let dist = block_sse(cur, reference, blk, mv, best.1);
            if dist < best.1 {
                best = (mv, dist);
            }
        }
    }
    best
}

/// Bits for a residual of `sse` spread over `pixels` samples
fn residual_bits(sse: u32, pixels: u32) -> u32 {
    let mean = sse / pixels.max(1);
    let magnitude = u32::BITS - mean.leading_zeros();
    magnitude * pixels / 4
}

/// Motion field with one vector per macroblock
pub struct BlockMatchField {
    dim: Dimension,
    vectors: MacroblockGrid<MotionVector>,
    bits: u64,
    counts: ModeCounts,
}

impl BlockMatchField {
    /// Vector chosen for macroblock (row, col) by the last call that wrote it
    pub fn vector(&self, row: usize, col: usize) -> MotionVector {
        self.vectors.get(row as isize, col as isize)
    }

    fn blocks(&self) -> impl Iterator<Item = (isize, isize, Block)> {
        let Dimension { width, height } = self.dim;
        let (rows, cols) = (self.vectors.rows(), self.vectors.cols());
        (0..rows).flat_map(move |r| {
            (0..cols).map(move |c| {
                let (x, y) = (c * MB_WIDTH, r * MB_WIDTH);
                let blk = Block {
                    x: x as isize,
                    y: y as isize,
                    w: MB_WIDTH.min(width - x),
                    h: MB_WIDTH.min(height - y),
                };
                (r as isize, c as isize, blk)
            })
        })
    }

    fn finish(&mut self, bits: u64, scratch: &PredictionScratch) -> u64 {
        self.bits = bits;
        self.counts = scratch.mode_counts();
        scratch.total_error()
    }
}

impl MotionField for BlockMatchField {
    fn with_dimension(dim: Dimension) -> AnalyzerResult<Self> {
        Ok(Self {
            dim,
            vectors: MacroblockGrid::for_dimension(dim, "motion vectors")?,
            bits: 0,
            counts: ModeCounts::default(),
        })
    }

    fn reset(&mut self) {
        self.vectors.fill(MotionVector::ZERO);
        self.bits = 0;
        self.counts = ModeCounts::default();
    }

    fn predict_spatial(&mut self, frame: &FrameBuffer, scratch: &mut PredictionScratch) -> u64 {
        let cur = frame.plane(Plane::Y);
        let mut bits = 0u64;
        for (r, c, blk) in self.blocks() {
            let err = intra_sse(cur, blk);
            scratch.errors.set(r, c, err);
            scratch.modes.set(r, c, MbMode::Intra);
            bits += u64::from(I_HEADER_BITS + residual_bits(err, blk.pixels()));
        }
        self.finish(bits, scratch)
    }

    fn predict_temporal(
        &mut self,
        frame: &FrameBuffer,
        reference: &FrameBuffer,
        scratch: &mut PredictionScratch,
    ) -> u64 {
        let cur = frame.plane(Plane::Y);
        let refp = reference.plane(Plane::Y);
        let mut bits = 0u64;

        for (r, c, blk) in self.blocks() {
            let (mv, inter) = search(cur, refp, blk, self.vectors.get(r, c));
            let intra = intra_sse(cur, blk);

            let (mode, err, mb_bits) = if intra < inter {
                self.vectors.set(r, c, MotionVector::ZERO);
                (MbMode::Intra, intra, P_INTRA_HEADER_BITS)
            } else {
                self.vectors.set(r, c, mv);
                (MbMode::Inter, inter, P_INTER_HEADER_BITS + mv.cost())
            };
            scratch.errors.set(r, c, err);
            scratch.modes.set(r, c, mode);
            bits += u64::from(mb_bits + residual_bits(err, blk.pixels()));
        }
        self.finish(bits, scratch)
    }

    fn predict_bidirectional(
        &mut self,
        frame: &FrameBuffer,
        forward_ref: &FrameBuffer,
        backward_ref: &FrameBuffer,
        forward_state: &mut Self,
        backward_state: &mut Self,
        scratch: &mut PredictionScratch,
    ) -> u64 {
        let cur = frame.plane(Plane::Y);
        let fwd = forward_ref.plane(Plane::Y);
        let bwd = backward_ref.plane(Plane::Y);
        let mut bits = 0u64;

        for (r, c, blk) in self.blocks() {
            let (fmv, fwd_err) = search(cur, fwd, blk, forward_state.vectors.get(r, c));
            let (bmv, bwd_err) = search(cur, bwd, blk, backward_state.vectors.get(r, c));
            let bi_err = bidir_sse(cur, fwd, fmv, bwd, bmv, blk);
            let intra = intra_sse(cur, blk);
            forward_state.vectors.set(r, c, fmv);
            backward_state.vectors.set(r, c, bmv);

            let candidates = [
                (MbMode::Inter, fwd_err, B_SINGLE_HEADER_BITS + fmv.cost()),
                (MbMode::Inter, bwd_err, B_SINGLE_HEADER_BITS + bmv.cost()),
                (
                    MbMode::Bidirectional,
                    bi_err,
                    B_BIDIR_HEADER_BITS + fmv.cost() + bmv.cost(),
                ),
                (MbMode::Intra, intra, B_INTRA_HEADER_BITS),
            ];
            let mut chosen = candidates[0];
            for candidate in &candidates[1..] {
                if candidate.1 < chosen.1 {
                    chosen = *candidate;
                }
            }

            let (mode, err, mb_bits) = chosen;
            scratch.errors.set(r, c, err);
            scratch.modes.set(r, c, mode);
            bits += u64::from(mb_bits + residual_bits(err, blk.pixels()));
        }
        self.finish(bits, scratch)
    }

    fn bits(&self) -> u64 {
        self.bits
    }

    fn counts(&self) -> ModeCounts {
        self.counts
    }
}
