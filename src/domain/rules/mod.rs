// Domain rules - Bit weighting and analysis parameter policies

use crate::domain::model::*;
use crate::error::{AnalyzerError, AnalyzerResult};

/// I pictures get roughly 10% more bits (282/256): the encoder QP is lowest for I
pub const I_FRAME_BIT_WEIGHT: u64 = 282;
/// P pictures get roughly 5% more bits (269/256): QP below B but above I
pub const P_FRAME_BIT_WEIGHT: u64 = 269;
/// B pictures are unweighted (256/256): QP is highest for B
pub const B_FRAME_BIT_WEIGHT: u64 = 256;

/// Type-dependent bit weighting applied once per scored picture
pub struct BitWeighting;

impl BitWeighting {
    /// Fixed-point weight (8 fractional bits) for a picture role
    pub fn weight(picture_type: PictureType) -> u64 {
        match picture_type {
            PictureType::I => I_FRAME_BIT_WEIGHT,
            PictureType::P => P_FRAME_BIT_WEIGHT,
            PictureType::B => B_FRAME_BIT_WEIGHT,
        }
    }

    /// floor((w * bits + 128) / 256), round half up
    pub fn apply(picture_type: PictureType, raw_bits: u64) -> u64 {
        (Self::weight(picture_type).saturating_mul(raw_bits).saturating_add(128)) >> 8
    }
}

/// Validation rules for the GOP structure
pub struct GopRules;

impl GopRules {
    /// Check GOP size and B-picture count
    pub fn validate(gop_size: usize, b_frames: usize) -> AnalyzerResult<()> {
        if gop_size == 0 {
            return Err(AnalyzerError::invalid("GOP size must be at least 1"));
        }
        if b_frames >= usize::MAX / 2 {
            return Err(AnalyzerError::invalid(format!(
                "B-picture count {} is out of range",
                b_frames
            )));
        }
        Ok(())
    }

    /// Sub-GOP size: B pictures between anchors plus the closing anchor
    pub fn sub_gop_size(b_frames: usize) -> usize {
        b_frames + 1
    }

    /// Buffers needed to hold one anchor plus a full look-ahead
    pub fn pool_size(b_frames: usize) -> usize {
        Self::sub_gop_size(b_frames) + 1
    }

    /// Whether the picture at `count` opens a new GOP
    pub fn is_gop_start(count: usize, gop_size: usize) -> bool {
        count % gop_size == 0
    }
}

#[cfg(test)]
mod tests;
