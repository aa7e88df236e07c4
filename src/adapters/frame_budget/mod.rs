// Frame budget - Source decorator that ends the stream after N pictures

use crate::domain::model::Dimension;
use crate::error::AnalyzerResult;
use crate::frame::FrameBuffer;
use crate::ports::{FrameSource, ReadOutcome};

/// Limits a source to `limit` pictures; a limit of 0 passes everything through
pub struct FrameBudget<S> {
    inner: S,
    limit: usize,
}

impl<S: FrameSource> FrameBudget<S> {
    pub fn new(inner: S, limit: usize) -> Self {
        Self { inner, limit }
    }

    fn exhausted(&self) -> bool {
        self.limit > 0 && self.inner.count() >= self.limit
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: FrameSource> FrameSource for FrameBudget<S> {
    fn dim(&self) -> Dimension {
        self.inner.dim()
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn eof(&mut self) -> bool {
        self.exhausted() || self.inner.eof()
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> AnalyzerResult<ReadOutcome> {
        if self.exhausted() {
            return Ok(ReadOutcome::EndOfStream);
        }
        self.inner.read(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_source::MemorySource;

    #[test]
    fn test_budget_ends_stream() {
        let dim = Dimension::new(4, 4).unwrap();
        let mut source = FrameBudget::new(MemorySource::synthetic(dim, 5, |_, _| 0), 2);
        let mut frame = FrameBuffer::new(dim).unwrap();

        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame);
        assert!(!source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame);
        assert!(source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::EndOfStream);
        assert_eq!(source.into_inner().remaining(), 3);
    }

    #[test]
    fn test_zero_budget_is_unbounded() {
        let dim = Dimension::new(4, 4).unwrap();
        let mut source = FrameBudget::new(MemorySource::synthetic(dim, 3, |_, _| 0), 0);
        let mut frame = FrameBuffer::new(dim).unwrap();
        let mut reads = 0;
        while source.read(&mut frame).unwrap() == ReadOutcome::Frame {
            reads += 1;
        }
        assert_eq!(reads, 3);
        assert!(source.eof());
    }
}
