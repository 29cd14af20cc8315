// Error handling for the scope capture pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScopeError>;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {input:?}: {reason}")]
    ParseError { input: String, reason: String },

    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("Invalid sample rate: {0} (must be > 0)")]
    InvalidRate(f64),

    #[error("Invalid channel: {0} (supported: 1..=4)")]
    InvalidChannel(u8),

    #[error("No waveform data was captured")]
    NoChannelsCaptured,

    #[error("Instrument error: {0}")]
    Instrument(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Failures while slicing a definite-length block out of a raw response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("block marker not found")]
    MissingMarker,

    #[error("invalid length field {0:?}")]
    InvalidLength(String),

    #[error("truncated block: declared {declared} bytes, {available} available")]
    Truncated { declared: usize, available: usize },
}

impl ScopeError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        ScopeError::ParseError {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
