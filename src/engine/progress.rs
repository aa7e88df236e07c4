//! Per-GOP diagnostics and pass timing

use std::time::{Duration, Instant};

use tracing::info;

use crate::domain::model::{GopSummary, PictureRecord};

/// Running bit and error totals since the last GOP boundary.
///
/// Side channel only: nothing here feeds back into scheduling or weighting.
#[derive(Debug, Default)]
pub struct GopAccumulator {
    next_index: usize,
    first_picture: Option<usize>,
    pictures: usize,
    bits: u64,
    error: u64,
}

impl GopAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin accumulating a GOP whose I picture has presentation index `first_picture`
    pub fn start(&mut self, first_picture: usize) {
        self.first_picture = Some(first_picture);
        self.pictures = 0;
        self.bits = 0;
        self.error = 0;
    }

    pub fn add(&mut self, record: &PictureRecord) {
        self.pictures += 1;
        self.bits += record.bits;
        self.error += record.error;
    }

    /// Bits accumulated in the open GOP
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Close the open GOP, if any, and log its totals
    pub fn close(&mut self, gop_size: usize) -> Option<GopSummary> {
        let first_picture = self.first_picture.take()?;
        let summary = GopSummary {
            index: self.next_index,
            first_picture,
            pictures: self.pictures,
            bits: self.bits,
            error: self.error,
            complete: self.pictures == gop_size,
        };
        self.next_index += 1;
        self.pictures = 0;
        self.bits = 0;
        self.error = 0;

        info!(
            gop = summary.index,
            pictures = summary.pictures,
            error = summary.error,
            complete = summary.complete,
            "GOP: {}, GOP-bits: {}",
            summary.index,
            summary.bits
        );
        Some(summary)
    }
}

/// Wall-clock timing of one pass
#[derive(Debug)]
pub struct PassTimer {
    start: Instant,
}

impl PassTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Pictures per second for `frames` pictures, 0 when no time has passed
    pub fn throughput(&self, frames: usize) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            frames as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ModeCounts, PictureType};

    fn record(index: usize, bits: u64, error: u64) -> PictureRecord {
        PictureRecord::new(index, PictureType::P, error, ModeCounts::default(), bits)
    }

    #[test]
    fn test_close_without_start_is_none() {
        let mut acc = GopAccumulator::new();
        assert!(acc.close(4).is_none());
    }

    #[test]
    fn test_totals_reset_between_gops() {
        let mut acc = GopAccumulator::new();
        acc.start(0);
        acc.add(&record(0, 100, 10));
        acc.add(&record(1, 50, 5));
        assert_eq!(acc.bits(), 150);

        let first = acc.close(2).unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.bits, 150);
        assert_eq!(first.error, 15);
        assert!(first.complete);

        acc.start(2);
        acc.add(&record(2, 7, 1));
        let second = acc.close(2).unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.first_picture, 2);
        assert_eq!(second.bits, 7);
        assert!(!second.complete);
    }

    #[test]
    fn test_throughput_non_negative() {
        let timer = PassTimer::start();
        assert!(timer.throughput(10) >= 0.0);
    }
}
