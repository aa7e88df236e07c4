//! Analysis engine: the frame scheduler and its GOP diagnostics

pub mod analyzer;
pub mod progress;

pub use analyzer::ComplexityAnalyzer;
pub use progress::{GopAccumulator, PassTimer};
