// In-memory frame source - Packed frames held in memory

use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::frame::FrameBuffer;
use crate::ports::{FrameSource, ReadOutcome};

/// Frame source over packed Y ++ U ++ V frames already in memory
pub struct MemorySource {
    dim: Dimension,
    frames: Vec<Vec<u8>>,
    next: usize,
}

impl MemorySource {
    /// Create a source, checking every frame against `dim`
    pub fn new(dim: Dimension, frames: Vec<Vec<u8>>) -> AnalyzerResult<Self> {
        if let Some((i, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.len() != dim.frame_bytes())
        {
            return Err(AnalyzerError::invalid(format!(
                "Frame {} has {} bytes, expected {} for {}",
                i,
                frame.len(),
                dim.frame_bytes(),
                dim
            )));
        }
        Ok(Self {
            dim,
            frames,
            next: 0,
        })
    }

    /// Generate `count` frames where `sample(frame, offset)` gives each byte
    pub fn synthetic(dim: Dimension, count: usize, sample: impl Fn(usize, usize) -> u8) -> Self {
        let frames = (0..count)
            .map(|f| (0..dim.frame_bytes()).map(|o| sample(f, o)).collect())
            .collect();
        Self {
            dim,
            frames,
            next: 0,
        }
    }

    /// Pictures not yet read
    pub fn remaining(&self) -> usize {
        self.frames.len() - self.next
    }
}

impl FrameSource for MemorySource {
    fn dim(&self) -> Dimension {
        self.dim
    }

    fn count(&self) -> usize {
        self.next
    }

    fn eof(&mut self) -> bool {
        self.next >= self.frames.len()
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> AnalyzerResult<ReadOutcome> {
        let Some(packed) = self.frames.get(self.next) else {
            return Ok(ReadOutcome::EndOfStream);
        };
        frame.fill_from_packed(packed)?;
        self.next += 1;
        Ok(ReadOutcome::Frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Plane;

    #[test]
    fn test_rejects_wrong_frame_size() {
        let dim = Dimension::new(4, 4).unwrap();
        assert!(MemorySource::new(dim, vec![vec![0; 3]]).is_err());
        assert!(MemorySource::new(dim, vec![vec![0; dim.frame_bytes()]]).is_ok());
    }

    #[test]
    fn test_reads_in_order_then_ends() {
        let dim = Dimension::new(4, 4).unwrap();
        let mut source = MemorySource::synthetic(dim, 2, |f, _| f as u8 + 10);
        let mut frame = FrameBuffer::new(dim).unwrap();

        assert!(!source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame);
        assert_eq!(frame.plane(Plane::Y).at(0, 0), 10);
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame);
        assert_eq!(frame.plane(Plane::V).at(1, 1), 11);
        assert_eq!(source.count(), 2);
        assert!(source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::EndOfStream);
        assert_eq!(source.count(), 2);
    }
}
