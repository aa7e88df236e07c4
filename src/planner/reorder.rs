//! Presentation-order reconstruction for scored pictures.
//!
//! The analyzer scores a P picture before the B pictures it closes, so
//! records arrive in processing order:
//! - Processing order:   I(0), P(3), B(1), B(2), P(6), B(4), B(5)
//! - Presentation order: I(0), B(1), B(2), P(3), B(4), B(5), P(6)
//!
//! One held anchor is enough to restore presentation order: a new I/P record
//! releases the previously held anchor and takes its place, while B records
//! pass straight through.

use crate::domain::model::PictureRecord;

/// Single-slot holdback for anchor records
#[derive(Debug, Default)]
pub struct ReorderBuffer {
    held: Option<PictureRecord>,
}

impl ReorderBuffer {
    pub fn new() -> Self {
        Self { held: None }
    }

    /// Submit a record in processing order.
    ///
    /// Returns the record that is now ready for output, if any.
    pub fn push(&mut self, record: PictureRecord) -> Option<PictureRecord> {
        if record.picture_type.is_anchor() {
            self.held.replace(record)
        } else {
            Some(record)
        }
    }

    /// Release the held anchor at end of stream
    pub fn finish(&mut self) -> Option<PictureRecord> {
        self.held.take()
    }
}
