use thiserror::Error;

/// Failure of a single pipeline run. The frame is consumed; no partial
/// result is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("expected {expected} bytes for {width}x{height} RGBA, got {actual}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {stage} parameter: {reason}")]
    InvalidParameter { stage: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
