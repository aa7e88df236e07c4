// Domain models - Core types and data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Largest accepted width or height; keeps bordered plane sizes within `usize`
pub const MAX_DIMENSION: usize = 32768;

/// Visible frame dimension, fixed for the whole analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: usize,
    pub height: usize,
}

impl Dimension {
    /// Create a validated dimension
    pub fn new(width: usize, height: usize) -> AnalyzerResult<Self> {
        if width == 0 || height == 0 {
            return Err(AnalyzerError::invalid(format!(
                "Frame dimension must be non-zero, got {}x{}",
                width, height
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(AnalyzerError::invalid(format!(
                "Frame dimension {}x{} exceeds the {} pixel limit",
                width, height, MAX_DIMENSION
            )));
        }
        let dim = Self { width, height };
        dim.checked_frame_bytes().ok_or_else(|| {
            AnalyzerError::invalid(format!("Frame size of {}x{} overflows", width, height))
        })?;
        Ok(dim)
    }

    /// Packed frame size, or `None` when it does not fit in `usize`
    pub fn checked_frame_bytes(&self) -> Option<usize> {
        let luma = self.width.checked_mul(self.height)?;
        let chroma = self.chroma_width().checked_mul(self.chroma_height())?;
        chroma.checked_mul(2)?.checked_add(luma)
    }

    /// Width of a 4:2:0 chroma plane
    pub fn chroma_width(&self) -> usize {
        self.width.div_ceil(2)
    }

    /// Height of a 4:2:0 chroma plane
    pub fn chroma_height(&self) -> usize {
        self.height.div_ceil(2)
    }

    /// Number of luma samples
    pub fn luma_size(&self) -> usize {
        self.width * self.height
    }

    /// Number of samples in one chroma plane
    pub fn chroma_size(&self) -> usize {
        self.chroma_width() * self.chroma_height()
    }

    /// Bytes of one packed 8-bit 4:2:0 frame (Y ++ U ++ V)
    pub fn frame_bytes(&self) -> usize {
        self.luma_size() + 2 * self.chroma_size()
    }

    /// Parse "WIDTHxHEIGHT"
    pub fn parse(text: &str) -> AnalyzerResult<Self> {
        let (w, h) = text
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| AnalyzerError::invalid(format!("Invalid dimension: {}", text)))?;
        let width = w
            .parse::<usize>()
            .map_err(|_| AnalyzerError::invalid(format!("Invalid width: {}", w)))?;
        let height = h
            .parse::<usize>()
            .map_err(|_| AnalyzerError::invalid(format!("Invalid height: {}", h)))?;
        Self::new(width, height)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Role a picture plays inside the GOP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PictureType {
    /// Intra picture, starts every GOP
    I,
    /// Forward-predicted anchor
    P,
    /// Bidirectionally predicted picture between two anchors
    B,
}

impl PictureType {
    /// Whether this picture serves as a prediction reference
    pub fn is_anchor(&self) -> bool {
        matches!(self, PictureType::I | PictureType::P)
    }

    /// Single-letter code used in reports
    pub fn as_char(&self) -> char {
        match self {
            PictureType::I => 'I',
            PictureType::P => 'P',
            PictureType::B => 'B',
        }
    }
}

impl fmt::Display for PictureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for PictureType {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "I" | "i" => Ok(PictureType::I),
            "P" | "p" => Ok(PictureType::P),
            "B" | "b" => Ok(PictureType::B),
            other => Err(AnalyzerError::invalid(format!(
                "Invalid picture type: {}. Valid types: I, P, B",
                other
            ))),
        }
    }
}

/// Macroblock coding mode chosen by the prediction engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MbMode {
    /// Not written by the last prediction call (grid halo)
    #[default]
    Unset,
    /// Spatially predicted
    Intra,
    /// Predicted from a single temporal reference
    Inter,
    /// Predicted from the average of forward and backward references
    Bidirectional,
}

/// Macroblock mode tallies for one picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeCounts {
    pub intra: u32,
    pub inter: u32,
    pub bidirectional: u32,
}

impl ModeCounts {
    /// Tally a single macroblock decision
    pub fn record(&mut self, mode: MbMode) {
        match mode {
            MbMode::Intra => self.intra += 1,
            MbMode::Inter => self.inter += 1,
            MbMode::Bidirectional => self.bidirectional += 1,
            MbMode::Unset => {}
        }
    }

    /// Keep only the tallies meaningful for the given picture role
    pub fn for_picture(self, picture_type: PictureType) -> Self {
        match picture_type {
            PictureType::I => Self {
                intra: self.intra,
                inter: 0,
                bidirectional: 0,
            },
            PictureType::P => Self {
                bidirectional: 0,
                ..self
            },
            PictureType::B => self,
        }
    }

    /// Total macroblocks tallied
    pub fn total(&self) -> u32 {
        self.intra + self.inter + self.bidirectional
    }
}

/// Immutable snapshot of one analyzed picture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRecord {
    /// 0-based presentation index
    pub index: usize,
    pub picture_type: PictureType,
    /// Aggregate squared prediction error
    pub error: u64,
    pub counts: ModeCounts,
    /// Type-weighted bit estimate
    pub bits: u64,
}

impl PictureRecord {
    pub fn new(
        index: usize,
        picture_type: PictureType,
        error: u64,
        counts: ModeCounts,
        bits: u64,
    ) -> Self {
        Self {
            index,
            picture_type,
            error,
            counts: counts.for_picture(picture_type),
            bits,
        }
    }
}

impl fmt::Display for PictureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {:6} ({}), I:{:6}, P:{:6}, B:{:6}, MSE = {:9}, bits = {:7}",
            self.index,
            self.picture_type,
            self.counts.intra,
            self.counts.inter,
            self.counts.bidirectional,
            self.error,
            self.bits
        )
    }
}

/// Diagnostic totals for one GOP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GopSummary {
    /// 0-based GOP counter
    pub index: usize,
    /// Presentation index of the GOP's I picture
    pub first_picture: usize,
    /// Pictures scored in this GOP
    pub pictures: usize,
    pub bits: u64,
    pub error: u64,
    /// Whether every picture of the GOP was scored
    pub complete: bool,
}

/// Result of one analysis pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Records in ascending presentation order
    pub records: Vec<PictureRecord>,
    pub gops: Vec<GopSummary>,
    /// Pictures consumed from the source
    pub frames_read: usize,
    /// Look-ahead pictures read but dropped at end of stream
    pub frames_discarded: usize,
}

impl AnalysisReport {
    /// Sum of weighted bits over all records
    pub fn total_bits(&self) -> u64 {
        self.records.iter().map(|r| r.bits).sum()
    }

    /// Sum of prediction error over all records
    pub fn total_error(&self) -> u64 {
        self.records.iter().map(|r| r.error).sum()
    }

    /// Number of records with the given role
    pub fn count_of(&self, picture_type: PictureType) -> usize {
        self.records
            .iter()
            .filter(|r| r.picture_type == picture_type)
            .count()
    }
}
