//! Error handling module for the complexity analyzer

use thiserror::Error;

/// Main error type for analysis operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Invalid analysis or frame parameters
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Buffer or scratch allocation failed
    #[error("Not enough memory ({bytes} bytes) for {purpose}")]
    Allocation { bytes: usize, purpose: String },

    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Input container or pixel layout not supported
    #[error("Unsupported input format: {message}")]
    UnsupportedFormat { message: String },

    /// YUV4MPEG2 stream could not be decoded
    #[error("Y4M decode error: {message}")]
    Y4mDecode { message: String },

    /// Configuration file or value error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Output file write error
    #[error("Failed to write output: {message}")]
    OutputError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Shorthand for parameter validation failures
    pub fn invalid(message: impl Into<String>) -> Self {
        AnalyzerError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Whether the error is a fatal allocation failure
    pub fn is_allocation(&self) -> bool {
        matches!(self, AnalyzerError::Allocation { .. })
    }
}

/// Result type alias for analysis operations
pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;
