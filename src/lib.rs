//! GOP complexity analyzer library
//!
//! Single-pass frame scheduler that assigns I/P/B roles within fixed GOPs,
//! drives a motion-field engine over a recycled ring of padded frame buffers,
//! and reports per-picture error and weighted bit estimates in presentation
//! order.

pub mod adapters;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod frame;
pub mod output;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{AnalysisReport, Dimension, GopSummary, PictureRecord, PictureType};
pub use engine::ComplexityAnalyzer;
pub use error::{AnalyzerError, AnalyzerResult};
pub use planner::GopParams;
pub use ports::{FrameSource, MotionField, ReadOutcome};
