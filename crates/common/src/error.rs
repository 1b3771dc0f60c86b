//! Error types shared across Framesight crates.

use std::path::PathBuf;

/// Top-level error type for Framesight operations.
#[derive(Debug, thiserror::Error)]
pub enum FramesightError {
    /// The pixel buffer does not hold exactly `width * height * 4` bytes.
    #[error("Malformed buffer: {width}x{height} RGBA needs {expected} bytes, got {actual}")]
    MalformedBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Insight unavailable: {message}")]
    InsightUnavailable { message: String },

    #[error("Frame source error: {message}")]
    FrameSource { message: String },

    #[error("Analysis error: {message}")]
    Analysis { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FramesightError.
pub type FramesightResult<T> = Result<T, FramesightError>;

impl FramesightError {
    pub fn malformed_buffer(width: u32, height: u32, expected: usize, actual: usize) -> Self {
        Self::MalformedBuffer {
            width,
            height,
            expected,
            actual,
        }
    }

    pub fn insight_unavailable(msg: impl Into<String>) -> Self {
        Self::InsightUnavailable {
            message: msg.into(),
        }
    }

    pub fn frame_source(msg: impl Into<String>) -> Self {
        Self::FrameSource {
            message: msg.into(),
        }
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    /// Whether this error only affects the request that raised it.
    ///
    /// Every variant is request-scoped except configuration problems,
    /// which invalidate the engine itself.
    pub fn is_request_scoped(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_buffer_message_names_sizes() {
        let err = FramesightError::malformed_buffer(2, 2, 16, 15);
        let msg = err.to_string();
        assert!(msg.contains("2x2"));
        assert!(msg.contains("16"));
        assert!(msg.contains("15"));
        assert!(err.is_request_scoped());
    }

    #[test]
    fn config_errors_are_not_request_scoped() {
        assert!(!FramesightError::config("grid size must be positive").is_request_scoped());
    }
}
